//! Command line surface and validated run configuration.
//!
//! ```bash
//! cpu_sched_sim 4 2 0.3 0.05 --processes 5000 --seed 42 --output rr.data
//! ```

use std::{fmt, path::PathBuf};

use clap::Parser;
use rand::prelude::*;

use crate::{
    core::Time,
    scheduler::{Policy, PolicyKind},
    sim::{Sim, Workload},
};

pub const DEFAULT_TARGET: u64 = 10_000;

/// Single-CPU scheduling simulator
#[derive(Debug, Clone, Parser)]
#[command(name = "cpu_sched_sim")]
#[command(about = "Simulate FCFS, SRTF, HRRN or RR on one CPU with exponential arrivals")]
pub struct Cli {
    /// Scheduler: 1 = FCFS, 2 = SRTF, 3 = HRRN, 4 = RR
    pub policy: u8,

    /// Average arrival rate (processes per unit time)
    pub lambda: u32,

    /// Average service time
    pub service_time: f64,

    /// Time slice length, used by RR
    pub quantum: f64,

    /// Stop after this many processes have completed
    #[arg(short = 'n', long = "processes", default_value_t = DEFAULT_TARGET)]
    pub processes: u64,

    /// Seed for the workload generator (OS entropy when absent)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// File receiving the comma separated result record
    #[arg(short, long, default_value = "sim.data")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownPolicy(u8),
    ArrivalRate(f64),
    ServiceTime(f64),
    Quantum(f64),
    ZeroQuantumForRoundRobin,
    ZeroTarget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPolicy(p) => write!(
                f,
                "scheduler must be 1-4 (1 FCFS, 2 SRTF, 3 HRRN, 4 RR), got {p}"
            ),
            Self::ArrivalRate(l) => write!(f, "average arrival rate must be at least 1, got {l}"),
            Self::ServiceTime(s) => {
                write!(f, "average service time must be positive and finite, got {s}")
            }
            Self::Quantum(q) => write!(f, "quantum cannot be negative or non-finite, got {q}"),
            Self::ZeroQuantumForRoundRobin => write!(f, "round robin needs a positive quantum"),
            Self::ZeroTarget => write!(f, "at least one process must complete"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated inputs of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub policy: PolicyKind,
    pub arrival_rate: f64,
    pub mean_service_time: Time,
    pub quantum: Time,
    pub target: u64,
    pub seed: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> Result<SimConfig, ConfigError> {
        let policy =
            PolicyKind::try_from(self.policy).map_err(ConfigError::UnknownPolicy)?;
        if self.lambda < 1 {
            return Err(ConfigError::ArrivalRate(f64::from(self.lambda)));
        }

        let config = SimConfig {
            policy,
            arrival_rate: f64::from(self.lambda),
            mean_service_time: self.service_time,
            quantum: self.quantum,
            target: self.processes,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl SimConfig {
    pub fn new(policy: PolicyKind, arrival_rate: f64, mean_service_time: Time, quantum: Time) -> Self {
        Self {
            policy,
            arrival_rate,
            mean_service_time,
            quantum,
            target: DEFAULT_TARGET,
            seed: None,
        }
    }

    pub fn with_target(mut self, target: u64) -> Self {
        self.target = target;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arrival_rate >= 1.0 && self.arrival_rate.is_finite()) {
            return Err(ConfigError::ArrivalRate(self.arrival_rate));
        }
        if !(self.mean_service_time > 0.0 && self.mean_service_time.is_finite()) {
            return Err(ConfigError::ServiceTime(self.mean_service_time));
        }
        if !(self.quantum >= 0.0 && self.quantum.is_finite()) {
            return Err(ConfigError::Quantum(self.quantum));
        }
        if self.policy == PolicyKind::RoundRobin && self.quantum == 0.0 {
            return Err(ConfigError::ZeroQuantumForRoundRobin);
        }
        if self.target == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        Ok(())
    }

    pub fn workload(&self) -> Workload {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Workload::new(self.arrival_rate, self.mean_service_time, rng)
    }

    pub fn build(&self) -> Sim<Policy> {
        Sim::new(
            Policy::new(self.policy, self.quantum),
            self.workload(),
            self.target,
        )
    }
}
