use std::collections::VecDeque;

use super::{ProcessId, Scheduler, SimState, Time};
use crate::core::{EventKind, SchedEvent};

/// Round-robin with a fixed quantum. CPU time is charged when a slice is
/// granted.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    quantum: Time,
    ready: VecDeque<ProcessId>,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Time) -> Self {
        debug_assert!(quantum > 0.0, "round robin needs a positive quantum");
        Self {
            quantum,
            ready: VecDeque::new(),
        }
    }

    // Grants the running process its next turn: the whole remainder if it
    // fits within a quantum, otherwise exactly one quantum.
    fn grant_slice(&self, state: &mut SimState, id: ProcessId) {
        let now = state.now();
        let process = state.process_mut(id);
        let length = if process.remaining_time < self.quantum {
            let rest = process.remaining_time;
            process.remaining_time = 0.0;
            rest
        } else {
            process.remaining_time -= self.quantum;
            self.quantum
        };
        process.completion_time = now + length;
        let pid = process.pid;

        state.charge(length);
        state.notify(SchedEvent::SliceGranted { pid, length });
        state.schedule(EventKind::TimeSlice, now + length, id);
    }

    fn dispatch(&self, state: &mut SimState, id: ProcessId) {
        state.set_running(id);
        self.grant_slice(state, id);
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn on_arrival(&mut self, state: &mut SimState, process: ProcessId) {
        if state.cpu_is_idle() {
            self.dispatch(state, process);
        } else {
            state.mark_ready(process);
            self.ready.push_back(process);
        }
    }

    fn on_departure(&mut self, state: &mut SimState, process: ProcessId) {
        state.depart(process, self.ready.len());

        if let Some(next) = self.ready.pop_front() {
            self.dispatch(state, next);
        }
    }

    fn on_time_slice(&mut self, state: &mut SimState, process: ProcessId) {
        if state.process(process).remaining_time == 0.0 {
            let now = state.now();
            state.schedule(EventKind::Departure, now, process);
            return;
        }

        match self.ready.pop_front() {
            None => self.grant_slice(state, process),
            Some(next) => {
                state.preempt(process);
                self.ready.push_back(process);
                self.dispatch(state, next);
            }
        }
    }

    fn ready_len(&self) -> usize {
        self.ready.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;

    fn arrive(state: &mut SimState, sched: &mut RoundRobinScheduler, at: f64, service: f64) -> ProcessId {
        let id = state.admit(at, service);
        state.events.pop_min();
        state.advance_to(at);
        sched.on_arrival(state, id);
        id
    }

    fn pop(state: &mut SimState) -> Event {
        let event = state.events.pop_min().expect("event queue drained");
        state.advance_to(event.time);
        event
    }

    #[test]
    fn short_job_gets_single_slice_then_departs() {
        let mut state = SimState::new();
        let mut sched = RoundRobinScheduler::new(2.0);
        let id = arrive(&mut state, &mut sched, 0.0, 1.5);
        assert_eq!(state.stats.busy_time(), 1.5);

        let slice = pop(&mut state);
        assert_eq!((slice.kind, slice.time), (EventKind::TimeSlice, 1.5));
        sched.on_time_slice(&mut state, id);

        let departure = pop(&mut state);
        assert_eq!((departure.kind, departure.time), (EventKind::Departure, 1.5));
        assert!(state.is_live(&departure));
        sched.on_departure(&mut state, id);
        assert!(state.cpu_is_idle());
        assert_eq!(state.stats.completed(), 1);
    }

    #[test]
    fn lone_process_keeps_cpu_across_slices() {
        let mut state = SimState::new();
        let mut sched = RoundRobinScheduler::new(2.0);
        let id = arrive(&mut state, &mut sched, 0.0, 5.0);

        pop(&mut state);
        sched.on_time_slice(&mut state, id);
        assert_eq!(state.running(), Some(id));
        assert_eq!(state.process(id).remaining_time, 1.0);

        pop(&mut state);
        sched.on_time_slice(&mut state, id);
        assert_eq!(state.process(id).remaining_time, 0.0);
        assert_eq!(state.process(id).completion_time, 5.0);
        assert_eq!(state.stats.busy_time(), 5.0);
    }

    #[test]
    fn expired_slice_rotates_to_back_of_queue() {
        let mut state = SimState::new();
        let mut sched = RoundRobinScheduler::new(2.0);
        let a = arrive(&mut state, &mut sched, 0.0, 5.0);
        let b = arrive(&mut state, &mut sched, 1.0, 3.0);
        assert_eq!(sched.ready_len(), 1);

        pop(&mut state);
        sched.on_time_slice(&mut state, a);
        assert_eq!(state.running(), Some(b));
        assert_eq!(sched.ready_len(), 1);
        assert_eq!(state.process(b).remaining_time, 1.0);

        let notes = state.drain_notifications();
        assert!(notes.contains(&SchedEvent::Preempted { pid: 0, remaining: 3.0 }));
        assert!(notes.contains(&SchedEvent::SliceGranted { pid: 1, length: 2.0 }));
    }
}
