pub mod fcfs;
pub mod hrrn;
pub mod rr;
pub mod srtf;

use crate::core::{ProcessId, SimState, Time};
pub use fcfs::FcfsScheduler;
pub use hrrn::HrrnScheduler;
pub use rr::RoundRobinScheduler;
pub use srtf::SrtfScheduler;

/// Behaviour shared by every discipline. Handlers run to completion and may
/// enqueue further events through `state`.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    fn on_arrival(&mut self, state: &mut SimState, process: ProcessId);

    fn on_departure(&mut self, state: &mut SimState, process: ProcessId);

    // Only disciplines that hand out time slices ever schedule these
    fn on_time_slice(&mut self, _state: &mut SimState, _process: ProcessId) {
        log::warn!("{} ignoring a time slice it never scheduled", self.name());
        debug_assert!(false, "{} does not schedule time slices", self.name());
    }

    /// Number of processes currently waiting for the CPU.
    fn ready_len(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fcfs,
    Srtf,
    Hrrn,
    RoundRobin,
}

impl TryFrom<u8> for PolicyKind {
    type Error = u8;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            1 => Ok(Self::Fcfs),
            2 => Ok(Self::Srtf),
            3 => Ok(Self::Hrrn),
            4 => Ok(Self::RoundRobin),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::Srtf => write!(f, "SRTF"),
            Self::Hrrn => write!(f, "HRRN"),
            Self::RoundRobin => write!(f, "RR"),
        }
    }
}

/// The discipline chosen for a run, fixed at startup.
#[derive(Debug)]
pub enum Policy {
    Fcfs(FcfsScheduler),
    Srtf(SrtfScheduler),
    Hrrn(HrrnScheduler),
    RoundRobin(RoundRobinScheduler),
}

impl Policy {
    pub fn new(kind: PolicyKind, quantum: Time) -> Self {
        match kind {
            PolicyKind::Fcfs => Self::Fcfs(FcfsScheduler::new()),
            PolicyKind::Srtf => Self::Srtf(SrtfScheduler::new()),
            PolicyKind::Hrrn => Self::Hrrn(HrrnScheduler::new()),
            PolicyKind::RoundRobin => Self::RoundRobin(RoundRobinScheduler::new(quantum)),
        }
    }

    fn inner(&mut self) -> &mut dyn Scheduler {
        match self {
            Self::Fcfs(s) => s,
            Self::Srtf(s) => s,
            Self::Hrrn(s) => s,
            Self::RoundRobin(s) => s,
        }
    }

    fn inner_ref(&self) -> &dyn Scheduler {
        match self {
            Self::Fcfs(s) => s,
            Self::Srtf(s) => s,
            Self::Hrrn(s) => s,
            Self::RoundRobin(s) => s,
        }
    }
}

impl Scheduler for Policy {
    fn name(&self) -> &'static str {
        self.inner_ref().name()
    }

    fn on_arrival(&mut self, state: &mut SimState, process: ProcessId) {
        self.inner().on_arrival(state, process)
    }

    fn on_departure(&mut self, state: &mut SimState, process: ProcessId) {
        self.inner().on_departure(state, process)
    }

    fn on_time_slice(&mut self, state: &mut SimState, process: ProcessId) {
        self.inner().on_time_slice(state, process)
    }

    fn ready_len(&self) -> usize {
        self.inner_ref().ready_len()
    }
}
