use rand::prelude::*;

use crate::core::Time;

/// Inter-arrival delay and service demand of one synthetic process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    pub inter_arrival: Time,
    pub service_time: Time,
}

/// Exponential workload source driven by inverse-transform sampling.
///
/// Both quantities of a draw come from the same uniform sample, so delay and
/// service demand are perfectly rank-correlated within one process.
#[derive(Debug, Clone)]
pub struct Workload {
    arrival_rate: f64,
    mean_service_time: f64,
    rng: StdRng,
}

impl Workload {
    pub fn new(arrival_rate: f64, mean_service_time: f64, rng: StdRng) -> Self {
        debug_assert!(arrival_rate > 0.0, "arrival rate must be positive");
        Self {
            arrival_rate,
            mean_service_time,
            rng,
        }
    }

    pub fn seeded(arrival_rate: f64, mean_service_time: f64, seed: u64) -> Self {
        Self::new(arrival_rate, mean_service_time, StdRng::seed_from_u64(seed))
    }

    /// Uniform sample strictly inside (0, 1).
    pub fn uniform(&mut self) -> f64 {
        open_unit(&mut self.rng)
    }

    pub fn draw(&mut self) -> Draw {
        let u = self.uniform();
        from_uniform(u, self.arrival_rate, self.mean_service_time)
    }

    /// Arrival time and service demand of the next process following `anchor`.
    pub fn next_after(&mut self, anchor: Time) -> (Time, Time) {
        let draw = self.draw();
        (anchor + draw.inter_arrival, draw.service_time)
    }
}

/// Redraws until the sample is neither 0 nor 1.
pub fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u = rng.random::<f64>();
        if u > 0.0 && u < 1.0 {
            return u;
        }
    }
}

/// `Δ = -(1/λ)·ln(1-u)` and `s = -(1/μ)·ln(1-u)`.
pub fn from_uniform(u: f64, arrival_rate: f64, mean_service_time: f64) -> Draw {
    let tail = (1.0 - u).ln();
    Draw {
        inter_arrival: -(1.0 / arrival_rate) * tail,
        service_time: -mean_service_time * tail,
    }
}
