use super::{ProcessId, Scheduler, SimState, Time};
use crate::core::{EventKind, Process};

/// `(wait + service) / service` at time `now`.
pub fn response_ratio(process: &Process, now: Time) -> f64 {
    ((now - process.arrival_time) + process.service_time) / process.service_time
}

/// Highest-response-ratio-next. Non-preemptive; the ratio is re-evaluated
/// over every waiter each time the CPU frees up.
#[derive(Debug, Default)]
pub struct HrrnScheduler {
    waiting: Vec<ProcessId>,
}

impl HrrnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waiting(&self) -> &[ProcessId] {
        &self.waiting
    }

    /// Removes and returns the waiter with the highest ratio. The earliest
    /// queued waiter wins ties.
    pub fn select_next(&mut self, state: &SimState) -> Option<ProcessId> {
        let now = state.now();
        let mut best: Option<(usize, f64)> = None;
        for (index, &id) in self.waiting.iter().enumerate() {
            let ratio = response_ratio(state.process(id), now);
            if best.is_none_or(|(_, top)| ratio > top) {
                best = Some((index, ratio));
            }
        }

        best.map(|(index, _)| self.waiting.remove(index))
    }

    fn begin_service(state: &mut SimState, id: ProcessId) {
        let now = state.now();
        let process = state.process_mut(id);
        process.completion_time = now + process.service_time;
        let completion = process.completion_time;

        state.set_running(id);
        state.schedule(EventKind::Departure, completion, id);
    }
}

impl Scheduler for HrrnScheduler {
    fn name(&self) -> &'static str {
        "HRRN"
    }

    fn on_arrival(&mut self, state: &mut SimState, process: ProcessId) {
        if state.cpu_is_idle() {
            Self::begin_service(state, process);
        } else {
            state.mark_ready(process);
            self.waiting.push(process);
        }
    }

    fn on_departure(&mut self, state: &mut SimState, process: ProcessId) {
        let service = state.process(process).service_time;
        state.charge(service);
        state.depart(process, self.waiting.len());

        if let Some(next) = self.select_next(state) {
            log::debug!(
                "t={} hrrn picked pid {} out of {}",
                state.now(),
                state.pid(next),
                self.waiting.len() + 1
            );
            Self::begin_service(state, next);
        }
    }

    fn ready_len(&self) -> usize {
        self.waiting.len()
    }
}
