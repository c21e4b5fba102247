use std::{fmt, fs, io, path::Path};

use crate::core::Report;

const SIGNIFICANT_DIGITS: usize = 6;

impl Report {
    /// `Tq, W, Rho, Throughput` on one line, no trailing newline.
    pub fn record(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            format_g(self.mean_turnaround),
            format_g(self.mean_ready_queue),
            format_g(self.utilization),
            format_g(self.throughput)
        )
    }

    pub fn write_record(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.record())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tq: {}", format_g(self.mean_turnaround))?;
        writeln!(f, "W:  {}", format_g(self.mean_ready_queue))?;
        writeln!(f, "Rho: {}", format_g(self.utilization))?;
        write!(f, "Throughput: {}", format_g(self.throughput))
    }
}

/// Renders `x` the way C's `%g` does with the default precision of six.
pub fn format_g(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to the significant digits
    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
