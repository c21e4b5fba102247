use super::workload::Workload;
use crate::{
    core::{EventKind, Observer, Report, SchedEvent, SimState, Time},
    scheduler::Scheduler,
};

/// Event loop for one run: pop, advance the clock, dispatch, repeat until
/// `target` processes have departed.
pub struct Sim<S: Scheduler> {
    pub state: SimState,
    pub scheduler: S,
    workload: Workload,
    observer: Observer,
    target: u64,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(scheduler: S, mut workload: Workload, target: u64) -> Self {
        assert!(target > 0, "Simulation requires a positive completion target");
        let mut state = SimState::new();

        // The first process arrives at time zero; its inter-arrival delay is unused
        let first = workload.draw();
        state.admit(0.0, first.service_time);

        Self {
            state,
            scheduler,
            workload,
            observer: Observer::new(),
            target,
        }
    }

    /// Handles the earliest pending event and returns what it caused.
    pub fn step(&mut self) -> Vec<SchedEvent> {
        let event = self
            .state
            .events
            .pop_min()
            .expect("Event queue drained while the run is active");
        self.state.advance_to(event.time);
        log::trace!("t={} {:?}", event.time, event.kind);

        if !self.state.is_live(&event) {
            self.state.notify(SchedEvent::StaleDiscarded { kind: event.kind });
        } else {
            match event.kind {
                EventKind::Arrival => {
                    self.state.mark_arrived(event.process);
                    self.scheduler.on_arrival(&mut self.state, event.process);
                    self.schedule_next_arrival();
                }
                EventKind::Departure => {
                    self.scheduler.on_departure(&mut self.state, event.process);
                    if self.state.cpu_is_idle() {
                        self.state.notify(SchedEvent::CpuIdle);
                    }
                }
                EventKind::TimeSlice => {
                    self.scheduler.on_time_slice(&mut self.state, event.process);
                }
            }
        }

        let notes = self.state.drain_notifications();
        self.observer.observe(&self.state, &notes, self.target);
        notes
    }

    // Keeps the arrival stream self-perpetuating
    fn schedule_next_arrival(&mut self) {
        let (arrival, service) = self.workload.next_after(self.state.now());
        self.state.admit(arrival, service);
    }

    pub fn finished(&self) -> bool {
        self.state.stats.completed() >= self.target
    }

    pub fn run(&mut self) -> Report {
        log::info!(
            "running {} until {} processes complete",
            self.scheduler.name(),
            self.target
        );
        while !self.finished() {
            self.step();
        }
        let report = self.report();
        log::info!(
            "finished at t={} after {} events ({} stale)",
            self.now(),
            self.observer.steps(),
            self.observer.stale_events()
        );
        report
    }

    pub fn report(&self) -> Report {
        self.state.stats.finalize(self.now(), self.target)
    }

    pub fn now(&self) -> Time {
        self.state.now()
    }
}
