pub mod event;
pub mod observer;
pub mod state;
pub mod stats;

pub use event::{Event, EventKind, EventQueue, SchedEvent};
pub use observer::Observer;
pub use state::{Pid, Process, ProcessId, ProcessState, SimState, Time};
pub use stats::{Accumulator, Report};
