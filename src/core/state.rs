use slotmap::{SlotMap, new_key_type};

use super::{
    event::{Event, EventKind, EventQueue, SchedEvent},
    stats::Accumulator,
};

// Logical simulation time
pub type Time = f64;
// Serial number handed out in arrival order; stable across the run for reporting
pub type Pid = u64;
new_key_type! {
    pub struct ProcessId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    // Arrival event still pending
    Arriving,
    Ready,
    Running,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub state: ProcessState,
    pub service_time: Time,
    pub arrival_time: Time,
    pub remaining_time: Time,
    // Provisional until the process departs
    pub completion_time: Time,
    pub epoch: u64,
}

/// Everything a scheduling policy may read or mutate while handling an event.
#[derive(Debug)]
pub struct SimState {
    pub now: Time,
    pub processes: SlotMap<ProcessId, Process>,
    pub cpu: Option<ProcessId>,
    pub events: EventQueue,
    pub stats: Accumulator,
    notifications: Vec<SchedEvent>,

    // Increment upon process creation
    next_pid: Pid,
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimState {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            processes: SlotMap::with_key(),
            cpu: None,
            events: EventQueue::new(),
            stats: Accumulator::new(),
            notifications: Vec::new(),
            next_pid: 0,
        }
    }

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn advance_to(&mut self, time: Time) {
        debug_assert!(
            time >= self.now,
            "clock moving backwards: {} -> {time}",
            self.now
        );
        self.now = time;
    }

    /// Creates a process and schedules its arrival.
    pub fn admit(&mut self, arrival_time: Time, service_time: Time) -> ProcessId {
        let pid = self.next_pid;
        self.next_pid += 1;

        let id = self.processes.insert(Process {
            pid,
            state: ProcessState::Arriving,
            service_time,
            arrival_time,
            remaining_time: service_time,
            completion_time: arrival_time + service_time,
            epoch: 0,
        });
        self.schedule(EventKind::Arrival, arrival_time, id);
        id
    }

    pub fn process(&self, id: ProcessId) -> &Process {
        self.processes
            .get(id)
            .expect("Process missing from process table")
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut Process {
        self.processes
            .get_mut(id)
            .expect("Process missing from process table")
    }

    pub fn pid(&self, id: ProcessId) -> Pid {
        self.process(id).pid
    }

    pub fn running(&self) -> Option<ProcessId> {
        self.cpu
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.cpu.is_none()
    }

    /// Queues an event for `process` at `time`.
    ///
    /// Departure and time-slice events bump the process's epoch, so any CPU
    /// event scheduled for it earlier becomes stale.
    pub fn schedule(&mut self, kind: EventKind, time: Time, id: ProcessId) {
        debug_assert!(
            time >= self.now,
            "{kind:?} scheduled in the past ({time} < {})",
            self.now
        );
        let process = self.process_mut(id);
        if kind != EventKind::Arrival {
            process.epoch += 1;
        }
        let epoch = process.epoch;
        self.events.push(time, kind, id, epoch);
    }

    /// Whether `event` still describes the process's next transition.
    pub fn is_live(&self, event: &Event) -> bool {
        let Some(process) = self.processes.get(event.process) else {
            return false;
        };
        match event.kind {
            EventKind::Arrival => process.state == ProcessState::Arriving,
            EventKind::Departure | EventKind::TimeSlice => {
                self.cpu == Some(event.process) && process.epoch == event.epoch
            }
        }
    }

    pub fn mark_arrived(&mut self, id: ProcessId) {
        let process = self.process(id);
        let (pid, service_time) = (process.pid, process.service_time);
        self.notify(SchedEvent::Arrived { pid, service_time });
    }

    pub fn mark_ready(&mut self, id: ProcessId) {
        debug_assert_ne!(self.cpu, Some(id), "Ready process must not hold the CPU");
        self.process_mut(id).state = ProcessState::Ready;
    }

    pub fn set_running(&mut self, id: ProcessId) {
        debug_assert!(
            self.cpu.is_none(),
            "CPU already running process {:?}",
            self.cpu
        );
        self.cpu = Some(id);
        let process = self.process_mut(id);
        process.state = ProcessState::Running;
        let pid = process.pid;
        self.notify(SchedEvent::Dispatched { pid });
    }

    /// Takes the running process off the CPU and invalidates its pending event.
    pub fn preempt(&mut self, id: ProcessId) {
        debug_assert_eq!(self.cpu, Some(id), "Only the running process can be preempted");
        self.cpu = None;
        let process = self.process_mut(id);
        process.state = ProcessState::Ready;
        process.epoch += 1;
        let (pid, remaining) = (process.pid, process.remaining_time);
        log::debug!("t={} preempted pid {pid} with {remaining} remaining", self.now);
        self.notify(SchedEvent::Preempted { pid, remaining });
    }

    /// Releases the running process for good and records its statistics.
    ///
    /// `ready_len` is the number of processes waiting at this instant.
    pub fn depart(&mut self, id: ProcessId, ready_len: usize) {
        debug_assert_eq!(self.cpu, Some(id), "Departing process must hold the CPU");
        self.cpu = None;
        let mut process = self
            .processes
            .remove(id)
            .expect("Departing process missing from process table");
        process.completion_time = self.now;

        let turnaround = process.completion_time - process.arrival_time;
        self.stats.record_departure(turnaround, ready_len);
        self.notify(SchedEvent::Departed {
            pid: process.pid,
            turnaround,
        });
    }

    pub fn charge(&mut self, busy: Time) {
        self.stats.charge(busy);
    }

    pub fn notify(&mut self, event: SchedEvent) {
        self.notifications.push(event);
    }

    pub fn drain_notifications(&mut self) -> Vec<SchedEvent> {
        std::mem::take(&mut self.notifications)
    }
}
