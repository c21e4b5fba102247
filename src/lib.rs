pub mod config;
pub mod core;
pub mod scheduler;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use crate::core::Report;
pub use scheduler::{Policy, PolicyKind, Scheduler};
pub use sim::{Sim, Workload};

/// Runs one simulation to completion with the discipline named in `config`.
pub fn simulate(config: &SimConfig) -> Report {
    let mut sim = config.build();
    sim.run()
}
