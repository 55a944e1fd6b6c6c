//! Confidence intervals for a sample mean.
//!
//! Uses a large-sample normal approximation instead of a full t-distribution
//! table: the critical value is 1.96 above 30 samples and a conservative 2.0
//! otherwise. Benchmark run counts and latency sample sets are large enough
//! that this stays close to the exact interval.

use crate::stats;
use serde::{Deserialize, Serialize};

/// Critical value for more than [`LARGE_SAMPLE_THRESHOLD`] samples
pub const LARGE_SAMPLE_CRITICAL: f64 = 1.96;

/// Critical value for small samples
pub const SMALL_SAMPLE_CRITICAL: f64 = 2.0;

/// Sample count above which the normal critical value applies
pub const LARGE_SAMPLE_THRESHOLD: usize = 30;

/// Interval `[low, high]` around a sample mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
    pub margin: f64,
}

impl ConfidenceInterval {
    /// Zero-width interval at `mean`.
    pub fn degenerate(mean: f64) -> Self {
        Self {
            low: mean,
            high: mean,
            margin: 0.0,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Critical value used for a sample of size `n`.
pub fn critical_value(n: usize) -> f64 {
    if n > LARGE_SAMPLE_THRESHOLD {
        LARGE_SAMPLE_CRITICAL
    } else {
        SMALL_SAMPLE_CRITICAL
    }
}

/// Compute the confidence interval of the mean of `samples`.
///
/// Fewer than two samples give the degenerate interval `(mean, mean, 0)`,
/// with a mean of zero for an empty set.
///
/// `confidence_level` is carried for callers and reports; the approximation
/// is calibrated for the 95% level and the critical value depends only on the
/// sample count.
pub fn compute_interval(samples: &[f64], _confidence_level: f64) -> ConfidenceInterval {
    let n = samples.len();
    let mean = stats::mean(samples);
    if n < 2 {
        return ConfidenceInterval::degenerate(mean);
    }

    let stderr = stats::stddev(samples) / (n as f64).sqrt();
    let margin = critical_value(n) * stderr;

    ConfidenceInterval {
        low: mean - margin,
        high: mean + margin,
        margin,
    }
}
