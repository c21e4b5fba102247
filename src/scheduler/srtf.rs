use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;

use super::{ProcessId, Scheduler, SimState, Time};
use crate::core::EventKind;

/// Heap priority: least remaining time first, earlier insertion on ties.
#[derive(Debug, Clone, Copy)]
pub struct Remaining {
    pub time: Time,
    seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop the ordering
impl Ord for Remaining {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Remaining {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Remaining {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Remaining {}

/// Shortest-remaining-time-first. An arrival preempts the running process
/// only when it needs strictly less time than the incumbent has left.
#[derive(Debug)]
pub struct SrtfScheduler {
    waiting: KeyedPriorityQueue<ProcessId, Remaining>,
    next_seq: u64,
}

impl Default for SrtfScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SrtfScheduler {
    pub fn new() -> Self {
        Self {
            waiting: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    /// Remaining times of every waiting process.
    pub fn waiting_remaining(&self) -> impl Iterator<Item = Time> + '_ {
        self.waiting.iter().map(|(_, r)| r.time)
    }

    fn park(&mut self, state: &mut SimState, id: ProcessId) {
        state.mark_ready(id);
        let time = state.process(id).remaining_time;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.waiting.push(id, Remaining { time, seq });
    }

    fn run_to_completion(state: &mut SimState, id: ProcessId) {
        state.set_running(id);
        let completion = state.process(id).completion_time;
        state.schedule(EventKind::Departure, completion, id);
    }
}

impl Scheduler for SrtfScheduler {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn on_arrival(&mut self, state: &mut SimState, process: ProcessId) {
        let Some(current) = state.running() else {
            Self::run_to_completion(state, process);
            return;
        };

        let now = state.now();
        let incumbent = state.process_mut(current);
        incumbent.remaining_time = incumbent.completion_time - now;
        let incumbent_left = incumbent.remaining_time;

        if state.process(process).remaining_time >= incumbent_left {
            self.park(state, process);
        } else {
            state.preempt(current);
            self.park(state, current);
            Self::run_to_completion(state, process);
        }
    }

    fn on_departure(&mut self, state: &mut SimState, process: ProcessId) {
        let service = state.process(process).service_time;
        state.charge(service);
        state.depart(process, self.waiting.len());

        if let Some((next, _)) = self.waiting.pop() {
            let now = state.now();
            let resumed = state.process_mut(next);
            resumed.completion_time = now + resumed.remaining_time;
            Self::run_to_completion(state, next);
        }
    }

    fn ready_len(&self) -> usize {
        self.waiting.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SchedEvent;

    fn arrive(state: &mut SimState, sched: &mut SrtfScheduler, at: f64, service: f64) -> ProcessId {
        let id = state.admit(at, service);
        state.events.pop_min();
        state.advance_to(at);
        sched.on_arrival(state, id);
        id
    }

    // Pops events until a live departure, the way the driver would
    fn next_departure(state: &mut SimState, sched: &mut SrtfScheduler) -> ProcessId {
        loop {
            let event = state.events.pop_min().expect("event queue drained");
            state.advance_to(event.time);
            if event.kind == EventKind::Departure && state.is_live(&event) {
                sched.on_departure(state, event.process);
                return event.process;
            }
        }
    }

    #[test]
    fn shorter_arrival_preempts() {
        let mut state = SimState::new();
        let mut sched = SrtfScheduler::new();
        let long = arrive(&mut state, &mut sched, 0.0, 10.0);
        let short = arrive(&mut state, &mut sched, 2.0, 3.0);

        assert_eq!(state.running(), Some(short));
        assert_eq!(state.process(long).remaining_time, 8.0);
        assert_eq!(sched.ready_len(), 1);
        assert!(state.drain_notifications().contains(&SchedEvent::Preempted {
            pid: 0,
            remaining: 8.0
        }));
    }

    #[test]
    fn tie_keeps_incumbent() {
        let mut state = SimState::new();
        let mut sched = SrtfScheduler::new();
        let first = arrive(&mut state, &mut sched, 0.0, 6.0);
        arrive(&mut state, &mut sched, 2.0, 4.0);

        assert_eq!(state.running(), Some(first));
        assert_eq!(sched.ready_len(), 1);
    }

    #[test]
    fn stale_departure_is_skipped_and_preempted_process_resumes() {
        let mut state = SimState::new();
        let mut sched = SrtfScheduler::new();
        let long = arrive(&mut state, &mut sched, 0.0, 10.0);
        let short = arrive(&mut state, &mut sched, 2.0, 3.0);

        assert_eq!(next_departure(&mut state, &mut sched), short);
        assert_eq!(state.now(), 5.0);
        assert_eq!(state.running(), Some(long));
        assert_eq!(state.process(long).completion_time, 13.0);

        // The departure scheduled at t=10 before preemption must not fire
        assert_eq!(next_departure(&mut state, &mut sched), long);
        assert_eq!(state.now(), 13.0);
        assert_eq!(state.stats.completed(), 2);
        assert_eq!(state.stats.busy_time(), 13.0);
    }

    #[test]
    fn resumes_least_remaining_first() {
        let mut state = SimState::new();
        let mut sched = SrtfScheduler::new();
        arrive(&mut state, &mut sched, 0.0, 1.0);
        let big = arrive(&mut state, &mut sched, 0.5, 9.0);
        let small = arrive(&mut state, &mut sched, 0.6, 4.0);
        assert_eq!(sched.waiting_remaining().count(), 2);

        next_departure(&mut state, &mut sched);
        assert_eq!(state.running(), Some(small));
        assert_eq!(state.process(big).state, crate::core::ProcessState::Ready);
    }
}
