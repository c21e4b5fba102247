use std::collections::VecDeque;

use super::{ProcessId, Scheduler, SimState};
use crate::core::EventKind;

/// First-come-first-served; a started process keeps the CPU until it departs.
#[derive(Debug, Default)]
pub struct FcfsScheduler {
    ready: VecDeque<ProcessId>,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin_service(&self, state: &mut SimState, id: ProcessId) {
        let now = state.now();
        let process = state.process_mut(id);
        let service = process.service_time;
        process.completion_time = now + service;

        state.charge(service);
        state.set_running(id);
        state.schedule(EventKind::Departure, now + service, id);
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn on_arrival(&mut self, state: &mut SimState, process: ProcessId) {
        if state.cpu_is_idle() {
            self.begin_service(state, process);
        } else {
            state.mark_ready(process);
            self.ready.push_back(process);
        }
    }

    fn on_departure(&mut self, state: &mut SimState, process: ProcessId) {
        state.depart(process, self.ready.len());

        if let Some(next) = self.ready.pop_front() {
            self.begin_service(state, next);
        }
    }

    fn ready_len(&self) -> usize {
        self.ready.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SchedEvent;

    fn arrive(state: &mut SimState, sched: &mut FcfsScheduler, at: f64, service: f64) -> ProcessId {
        let id = state.admit(at, service);
        state.events.pop_min();
        state.advance_to(at);
        sched.on_arrival(state, id);
        id
    }

    #[test]
    fn idle_cpu_starts_arrival_and_charges_service() {
        let mut state = SimState::new();
        let mut sched = FcfsScheduler::new();
        let id = arrive(&mut state, &mut sched, 0.0, 2.0);

        assert_eq!(state.running(), Some(id));
        assert_eq!(state.stats.busy_time(), 2.0);
        let departure = state.events.pop_min().unwrap();
        assert_eq!(departure.kind, EventKind::Departure);
        assert_eq!(departure.time, 2.0);
    }

    #[test]
    fn waiters_are_served_in_arrival_order() {
        let mut state = SimState::new();
        let mut sched = FcfsScheduler::new();
        let first = arrive(&mut state, &mut sched, 0.0, 5.0);
        let second = arrive(&mut state, &mut sched, 1.0, 1.0);
        let third = arrive(&mut state, &mut sched, 2.0, 0.5);
        assert_eq!(sched.ready_len(), 2);

        let departure = state.events.pop_min().unwrap();
        state.advance_to(departure.time);
        sched.on_departure(&mut state, first);

        assert_eq!(state.running(), Some(second));
        assert_eq!(sched.ready_len(), 1);
        assert_eq!(state.process(second).completion_time, 6.0);
        assert_eq!(state.stats.busy_time(), 6.0);

        let departure = state.events.pop_min().unwrap();
        state.advance_to(departure.time);
        sched.on_departure(&mut state, second);
        assert_eq!(state.running(), Some(third));

        let notes = state.drain_notifications();
        assert!(notes.contains(&SchedEvent::Departed {
            pid: 0,
            turnaround: 5.0
        }));
        assert!(notes.contains(&SchedEvent::Departed {
            pid: 1,
            turnaround: 5.0
        }));
    }

    #[test]
    fn last_departure_idles_cpu() {
        let mut state = SimState::new();
        let mut sched = FcfsScheduler::new();
        let id = arrive(&mut state, &mut sched, 0.0, 1.0);
        state.advance_to(1.0);
        sched.on_departure(&mut state, id);

        assert!(state.cpu_is_idle());
        assert_eq!(state.stats.completed(), 1);
    }
}
