use average::{Estimate, Max, Variance};

use super::state::Time;

/// Running totals for one simulation run.
#[derive(Debug, Clone)]
pub struct Accumulator {
    turnaround_sum: f64,
    ready_len_sum: f64,
    busy_time: Time,
    completed: u64,
    turnaround: Variance,
    peak_ready_len: Max,
}

/// Aggregate results of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub mean_turnaround: f64,
    pub mean_ready_queue: f64,
    pub utilization: f64,
    pub throughput: f64,
    pub turnaround_std_dev: f64,
    pub max_ready_queue: usize,
    pub completed: u64,
    pub clock: Time,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            turnaround_sum: 0.0,
            ready_len_sum: 0.0,
            busy_time: 0.0,
            completed: 0,
            turnaround: Variance::new(),
            peak_ready_len: Max::new(),
        }
    }

    pub fn record_departure(&mut self, turnaround: Time, ready_len: usize) {
        self.turnaround_sum += turnaround;
        self.ready_len_sum += ready_len as f64;
        self.completed += 1;
        self.turnaround.add(turnaround);
        self.peak_ready_len.add(ready_len as f64);
    }

    pub fn charge(&mut self, busy: Time) {
        debug_assert!(busy >= 0.0, "negative CPU charge {busy}");
        self.busy_time += busy;
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn busy_time(&self) -> Time {
        self.busy_time
    }

    /// Derives the final rates. Callers guarantee a positive clock and process count.
    pub fn finalize(&self, total_clock: Time, total_processes: u64) -> Report {
        let n = total_processes as f64;
        let max_ready_queue = if self.completed == 0 {
            0
        } else {
            self.peak_ready_len.max() as usize
        };

        Report {
            mean_turnaround: self.turnaround_sum / n,
            mean_ready_queue: self.ready_len_sum / n,
            utilization: self.busy_time / total_clock,
            throughput: n / total_clock,
            turnaround_std_dev: self.turnaround.sample_variance().sqrt(),
            max_ready_queue,
            completed: self.completed,
            clock: total_clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_divides_sums() {
        let mut acc = Accumulator::new();
        acc.record_departure(2.0, 0);
        acc.record_departure(4.0, 3);
        acc.charge(5.0);

        let report = acc.finalize(10.0, 2);
        assert_eq!(report.mean_turnaround, 3.0);
        assert_eq!(report.mean_ready_queue, 1.5);
        assert_eq!(report.utilization, 0.5);
        assert_eq!(report.throughput, 0.2);
        assert_eq!(report.max_ready_queue, 3);
        assert_eq!(report.completed, 2);
        assert!((report.turnaround_std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn departures_feed_spread_and_peak() {
        let mut acc = Accumulator::new();
        for (turnaround, ready_len) in [(1.0, 4), (3.0, 1), (5.0, 7)] {
            acc.record_departure(turnaround, ready_len);
        }

        let report = acc.finalize(9.0, 3);
        assert_eq!(report.completed, 3);
        assert_eq!(report.max_ready_queue, 7);
        assert_eq!(report.mean_turnaround, 3.0);
        assert!((report.turnaround_std_dev - 2.0).abs() < 1e-12);
    }
}
