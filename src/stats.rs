//! # Summary Statistics
//!
//! Computes the summary statistics used throughout the analysis: count,
//! extremes, mean, median, sample standard deviation and the P50/P95/P99
//! percentile ladder.
//!
//! ## Percentile Convention
//!
//! Percentiles are taken by direct index into the ascending-sorted samples,
//! without interpolation:
//!
//! ```text
//! index = min(floor(n * p / 100), n - 1)
//! ```
//!
//! The clamp keeps `p = 100` (and any `p` that rounds past the end) on the
//! last element. Every call site in the crate uses this one convention,
//! including DDL duration statistics.
//!
//! ## Empty Input
//!
//! An empty sample set is valid and yields [`SummaryStatistics::default`],
//! with every field zero, so callers never special-case emptiness.

use serde::{Deserialize, Serialize};

/// Summary statistics over one sample set
///
/// Immutable once computed. `count` always equals the number of samples the
/// statistics were computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl SummaryStatistics {
    /// Whether these statistics were computed from an empty set.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Look up a field by its report name (`mean`, `p95`, `max`, ...).
    pub fn field(&self, name: &str) -> Option<f64> {
        let value = match name {
            "count" => self.count as f64,
            "min" => self.min,
            "max" => self.max,
            "mean" => self.mean,
            "median" => self.median,
            "stddev" => self.stddev,
            "p50" => self.p50,
            "p95" => self.p95,
            "p99" => self.p99,
            _ => return None,
        };
        Some(value)
    }
}

/// Compute summary statistics for a sample set.
///
/// Sample order is irrelevant and duplicates are allowed. `stddev` is the
/// sample standard deviation (Bessel's correction) for more than one sample
/// and zero otherwise.
///
/// ## Examples
///
/// ```rust
/// # use recorder_impact::stats::compute_summary;
/// let summary = compute_summary(&[4.0, 1.0, 3.0, 2.0, 5.0]);
/// assert_eq!(summary.count, 5);
/// assert_eq!(summary.median, 3.0);
/// assert_eq!(summary.p95, 5.0);
/// ```
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::default();
    }

    let sorted = sorted_copy(samples);
    let n = sorted.len();
    let (min, max) = (sorted[0], sorted[n - 1]);

    // Summation error must not leak spread into a constant set.
    let (mean, stddev) = if min == max {
        (min, 0.0)
    } else {
        let mean = mean(&sorted);
        (mean, sample_stddev(&sorted, mean))
    };

    SummaryStatistics {
        count: n,
        min,
        max,
        mean,
        median: median_of_sorted(&sorted),
        stddev,
        p50: percentile_of_sorted(&sorted, 50.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}

/// Index used for percentile `p` in a sorted array of length `len`.
///
/// Returns `None` for an empty array. Negative `p` maps to index 0.
pub fn percentile_index(len: usize, p: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let raw = (len as f64 * p / 100.0).floor();
    let index = if raw <= 0.0 { 0 } else { raw as usize };
    Some(index.min(len - 1))
}

/// Percentile `p` of unsorted samples, zero for an empty set.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    percentile_of_sorted(&sorted_copy(samples), p)
}

/// Arithmetic mean, zero for an empty set.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (n - 1 denominator), zero for fewer than two samples.
pub fn stddev(samples: &[f64]) -> f64 {
    sample_stddev(samples, mean(samples))
}

fn sample_stddev(samples: &[f64], mean: f64) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    percentile_index(sorted.len(), p)
        .map(|i| sorted[i])
        .unwrap_or(0.0)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Empty input yields the all-zero summary
    #[test]
    fn test_empty_summary() {
        let summary = compute_summary(&[]);
        assert_eq!(summary, SummaryStatistics::default());
        assert!(summary.is_empty());
        assert_eq!(summary.p99, 0.0);
    }

    /// Known dataset with hand-checked values
    #[test]
    fn test_compute_summary() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = compute_summary(&values);

        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.median, 3.0);
        // index floor(5 * 0.5) = 2
        assert_eq!(summary.p50, 3.0);
        // index floor(5 * 0.95) = 4
        assert_eq!(summary.p95, 5.0);
        assert_eq!(summary.p99, 5.0);
        // sample stddev of 1..=5 is sqrt(2.5)
        assert!((summary.stddev - 2.5_f64.sqrt()).abs() < 1e-12);
    }

    /// Even-sized sets average the middle pair for the median
    #[test]
    fn test_even_median() {
        let summary = compute_summary(&[10.0, 1.0, 4.0, 2.0]);
        assert_eq!(summary.median, 3.0);
        // index floor(4 * 0.5) = 2 into [1, 2, 4, 10]
        assert_eq!(summary.p50, 4.0);
    }

    /// Identical values collapse every statistic onto that value
    #[test]
    fn test_identical_values() {
        let summary = compute_summary(&[7.5; 40]);
        assert_eq!(summary.min, 7.5);
        assert_eq!(summary.max, 7.5);
        assert_eq!(summary.mean, 7.5);
        assert_eq!(summary.median, 7.5);
        assert_eq!(summary.p50, 7.5);
        assert_eq!(summary.p95, 7.5);
        assert_eq!(summary.p99, 7.5);
        assert_eq!(summary.stddev, 0.0);
    }

    /// p = 100 is clamped onto the last index
    #[test]
    fn test_percentile_index_clamp() {
        assert_eq!(percentile_index(0, 50.0), None);
        assert_eq!(percentile_index(10, 100.0), Some(9));
        assert_eq!(percentile_index(10, 250.0), Some(9));
        assert_eq!(percentile_index(10, 0.0), Some(0));
        assert_eq!(percentile_index(10, -5.0), Some(0));
        assert_eq!(percentile_index(100, 99.0), Some(99));
        assert_eq!(percentile_index(200, 99.0), Some(198));
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 100.0), 3.0);
    }

    /// Single sample has zero spread
    #[test]
    fn test_single_sample() {
        let summary = compute_summary(&[42.0]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.stddev, 0.0);
        assert_eq!(summary.p99, 42.0);
        assert_eq!(summary.median, 42.0);
    }

    /// Named field lookup used by series comparison
    #[test]
    fn test_field_lookup() {
        let summary = compute_summary(&[1.0, 2.0, 3.0]);
        assert_eq!(summary.field("mean"), Some(2.0));
        assert_eq!(summary.field("count"), Some(3.0));
        assert_eq!(summary.field("p999"), None);
    }
}
