use rustc_hash::FxHashSet;

use super::{
    event::SchedEvent,
    state::{Pid, ProcessState, SimState, Time},
};

/// Checks run-wide invariants after every driver step.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    stale: u64,
    last_clock: Time,
    departed: FxHashSet<Pid>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, state: &SimState, notes: &[SchedEvent], target: u64) {
        self.step += 1;

        debug_assert!(
            state.now >= self.last_clock,
            "clock went backwards at step {}: {} -> {}",
            self.step,
            self.last_clock,
            state.now
        );
        self.last_clock = state.now;

        if let Some(id) = state.cpu {
            let process = state.process(id);
            debug_assert_eq!(
                process.state,
                ProcessState::Running,
                "cpu process {} must be Running",
                process.pid
            );
        }
        for (id, process) in &state.processes {
            if process.state == ProcessState::Running {
                debug_assert_eq!(
                    state.cpu,
                    Some(id),
                    "process {} Running while off the CPU",
                    process.pid
                );
            }
        }

        for note in notes {
            match note {
                SchedEvent::Departed { pid, .. } if cfg!(debug_assertions) => {
                    let fresh = self.departed.insert(*pid);
                    debug_assert!(fresh, "process {pid} departed twice");
                }
                SchedEvent::StaleDiscarded { .. } => self.stale += 1,
                _ => {}
            }
        }

        debug_assert!(
            state.stats.completed() <= target,
            "completed {} exceeds target {target}",
            state.stats.completed()
        );
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn stale_events(&self) -> u64 {
        self.stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departed(pid: Pid) -> SchedEvent {
        SchedEvent::Departed {
            pid,
            turnaround: 1.0,
        }
    }

    #[test]
    fn counts_steps_and_stale_events() {
        let state = SimState::new();
        let mut observer = Observer::new();
        observer.observe(&state, &[departed(0)], 10);
        observer.observe(
            &state,
            &[SchedEvent::StaleDiscarded {
                kind: crate::core::EventKind::Departure,
            }],
            10,
        );

        assert_eq!(observer.steps(), 2);
        assert_eq!(observer.stale_events(), 1);
    }

    #[test]
    fn departed_set_is_debug_only() {
        let state = SimState::new();
        let mut observer = Observer::new();
        observer.observe(&state, &[departed(0), departed(1)], 10);
        let expected = if cfg!(debug_assertions) { 2 } else { 0 };
        assert_eq!(observer.departed.len(), expected);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "departed twice")]
    fn double_departure_is_caught() {
        let state = SimState::new();
        let mut observer = Observer::new();
        observer.observe(&state, &[departed(3)], 10);
        observer.observe(&state, &[departed(3)], 10);
    }
}
