//! # Baseline vs. Test Impact
//!
//! Paired comparisons between a baseline run and a run with the recorder
//! enabled. The same [`compare`] applies to throughput, latency percentiles,
//! DDL durations and database counter deltas; [`MetricSource`] lets any of
//! these be compared field by field with [`compare_series`].
//!
//! Counter snapshots are taken from monotonically increasing database
//! counters. A delta below zero means the counter was reset between
//! snapshots and is reported as [`AnalysisError::InconsistentCounter`]
//! instead of being treated as a real regression.

use crate::error::{AnalysisError, Result};
use crate::stats::SummaryStatistics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of named monotonic counters (e.g. `xact_commit`, `blks_hit`)
pub type CounterSnapshot = BTreeMap<String, i64>;

/// Named impact results, ordered by metric name
pub type ImpactSeries = BTreeMap<String, ImpactResult>;

/// Kind of metric being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Transactions per second; a drop is a regression
    Throughput,
    /// Per-transaction latency in ms; a rise is a regression
    Latency,
    /// Delta of a monotonic database counter
    Counter,
    /// Duration of a single operation in ms; a rise is a regression
    Duration,
}

impl MetricKind {
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Throughput => "tps",
            MetricKind::Latency | MetricKind::Duration => "ms",
            MetricKind::Counter => "count",
        }
    }

    /// Percent change oriented so that positive always means "worse".
    ///
    /// Counters have no inherent direction and are returned as-is.
    pub fn degradation_pct(&self, impact: &ImpactResult) -> f64 {
        match self {
            MetricKind::Throughput => -impact.percent_delta,
            MetricKind::Latency | MetricKind::Duration | MetricKind::Counter => {
                impact.percent_delta
            }
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::Throughput => write!(f, "Throughput"),
            MetricKind::Latency => write!(f, "Latency"),
            MetricKind::Counter => write!(f, "Counter"),
            MetricKind::Duration => write!(f, "Duration"),
        }
    }
}

/// Generic paired comparison of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub baseline_value: f64,
    pub test_value: f64,
    pub absolute_delta: f64,
    /// Percent change relative to baseline; zero when the baseline is zero
    pub percent_delta: f64,
}

/// Compare a test value against its baseline.
///
/// ```rust
/// # use recorder_impact::impact::compare;
/// let impact = compare(100.0, 110.0);
/// assert_eq!(impact.absolute_delta, 10.0);
/// assert_eq!(impact.percent_delta, 10.0);
/// ```
pub fn compare(baseline_value: f64, test_value: f64) -> ImpactResult {
    let absolute_delta = test_value - baseline_value;
    let percent_delta = if baseline_value == 0.0 {
        0.0
    } else {
        absolute_delta / baseline_value * 100.0
    };

    ImpactResult {
        baseline_value,
        test_value,
        absolute_delta,
        percent_delta,
    }
}

/// Anything that can supply named scalar metrics for comparison
pub trait MetricSource {
    fn metric(&self, name: &str) -> Option<f64>;
}

impl MetricSource for SummaryStatistics {
    fn metric(&self, name: &str) -> Option<f64> {
        self.field(name)
    }
}

impl MetricSource for BTreeMap<String, f64> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl MetricSource for BTreeMap<String, i64> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).map(|&v| v as f64)
    }
}

/// Apply [`compare`] to each named metric of two sources.
///
/// Fails with [`AnalysisError::UnknownMetric`] if either source lacks a name.
pub fn compare_series<S, N>(baseline: &S, test: &S, metric_names: &[N]) -> Result<ImpactSeries>
where
    S: MetricSource + ?Sized,
    N: AsRef<str>,
{
    let mut series = ImpactSeries::new();
    for name in metric_names {
        let name = name.as_ref();
        let baseline_value = baseline
            .metric(name)
            .ok_or_else(|| AnalysisError::UnknownMetric(name.to_string()))?;
        let test_value = test
            .metric(name)
            .ok_or_else(|| AnalysisError::UnknownMetric(name.to_string()))?;
        series.insert(name.to_string(), compare(baseline_value, test_value));
    }
    Ok(series)
}

/// Delta of one monotonic counter between two snapshots.
///
/// A key absent from either snapshot, or a difference that does not fit in
/// an `i64`, is [`AnalysisError::InvalidCounter`]. A negative delta is
/// [`AnalysisError::InconsistentCounter`].
pub fn counter_delta(start: &CounterSnapshot, end: &CounterSnapshot, key: &str) -> Result<i64> {
    let invalid = |reason: String| AnalysisError::InvalidCounter {
        counter: key.to_string(),
        reason,
    };
    let start_value = *start
        .get(key)
        .ok_or_else(|| invalid("missing from start snapshot".to_string()))?;
    let end_value = *end
        .get(key)
        .ok_or_else(|| invalid("missing from end snapshot".to_string()))?;

    let delta = end_value.checked_sub(start_value).ok_or_else(|| {
        invalid(format!(
            "delta from {} to {} overflows a 64-bit counter",
            start_value, end_value
        ))
    })?;
    if delta < 0 {
        return Err(AnalysisError::InconsistentCounter {
            counter: key.to_string(),
            start: start_value,
            end: end_value,
        });
    }
    Ok(delta)
}

/// Deltas of several counters, keyed by counter name.
pub fn counter_deltas<N: AsRef<str>>(
    start: &CounterSnapshot,
    end: &CounterSnapshot,
    keys: &[N],
) -> Result<CounterSnapshot> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            counter_delta(start, end, key).map(|delta| (key.to_string(), delta))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_summary;

    fn snapshot(pairs: &[(&str, i64)]) -> CounterSnapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Ten percent increase
    #[test]
    fn test_compare_basic() {
        let impact = compare(100.0, 110.0);
        assert_eq!(impact.baseline_value, 100.0);
        assert_eq!(impact.test_value, 110.0);
        assert_eq!(impact.absolute_delta, 10.0);
        assert!((impact.percent_delta - 10.0).abs() < 1e-12);

        let drop = compare(200.0, 150.0);
        assert_eq!(drop.absolute_delta, -50.0);
        assert_eq!(drop.percent_delta, -25.0);
    }

    /// Zero baseline defines percent change as zero
    #[test]
    fn test_compare_zero_baseline() {
        for t in [0.0, 5.0, -3.0, 1e9] {
            let impact = compare(0.0, t);
            assert_eq!(impact.percent_delta, 0.0);
            assert_eq!(impact.absolute_delta, t);
        }
    }

    /// Series comparison over summary statistics
    #[test]
    fn test_compare_series_summary() {
        let baseline = compute_summary(&[1.0, 2.0, 3.0, 4.0]);
        let test = compute_summary(&[2.0, 4.0, 6.0, 8.0]);
        let series = compare_series(&baseline, &test, &["mean", "max"]).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series["mean"].percent_delta, 100.0);
        assert_eq!(series["max"].absolute_delta, 4.0);

        let err = compare_series(&baseline, &test, &["p999"]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownMetric(name) if name == "p999"));
    }

    /// Counter deltas and reset detection
    #[test]
    fn test_counter_delta() {
        let start = snapshot(&[("xact_commit", 100), ("blks_hit", 5000)]);
        let end = snapshot(&[("xact_commit", 350), ("blks_hit", 4000)]);

        assert_eq!(counter_delta(&start, &end, "xact_commit").unwrap(), 250);
        let err = counter_delta(&start, &end, "blks_hit").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InconsistentCounter { start: 5000, end: 4000, .. }
        ));
        assert!(matches!(
            counter_delta(&start, &end, "tup_updated"),
            Err(AnalysisError::InvalidCounter { counter, .. }) if counter == "tup_updated"
        ));
        assert!(matches!(
            counter_delta(&start, &snapshot(&[]), "xact_commit"),
            Err(AnalysisError::InvalidCounter { reason, .. }) if reason.contains("end snapshot")
        ));
    }

    /// Deltas outside the i64 range are rejected instead of wrapping
    #[test]
    fn test_counter_delta_overflow() {
        let start = snapshot(&[("xact_commit", -2)]);
        let end = snapshot(&[("xact_commit", i64::MAX)]);
        let err = counter_delta(&start, &end, "xact_commit").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidCounter { counter, .. } if counter == "xact_commit"
        ));

        let start = snapshot(&[("blks_read", i64::MAX)]);
        let end = snapshot(&[("blks_read", i64::MIN)]);
        assert!(matches!(
            counter_delta(&start, &end, "blks_read"),
            Err(AnalysisError::InvalidCounter { .. })
        ));

        let start = snapshot(&[("blks_hit", 0)]);
        let end = snapshot(&[("blks_hit", i64::MAX)]);
        assert_eq!(counter_delta(&start, &end, "blks_hit").unwrap(), i64::MAX);
    }

    /// Counter delta maps feed series comparison
    #[test]
    fn test_counter_deltas_series() {
        let keys = ["xact_commit", "blks_read"];
        let base = counter_deltas(
            &snapshot(&[("xact_commit", 0), ("blks_read", 10)]),
            &snapshot(&[("xact_commit", 1000), ("blks_read", 60)]),
            &keys,
        )
        .unwrap();
        let test = counter_deltas(
            &snapshot(&[("xact_commit", 0), ("blks_read", 10)]),
            &snapshot(&[("xact_commit", 950), ("blks_read", 110)]),
            &keys,
        )
        .unwrap();

        let series = compare_series(&base, &test, &keys).unwrap();
        assert_eq!(series["xact_commit"].percent_delta, -5.0);
        assert_eq!(series["blks_read"].percent_delta, 100.0);
    }

    /// Degradation orientation per metric kind
    #[test]
    fn test_degradation_orientation() {
        let slower = compare(1000.0, 900.0);
        assert_eq!(MetricKind::Throughput.degradation_pct(&slower), 10.0);
        let longer = compare(10.0, 12.0);
        assert_eq!(MetricKind::Latency.degradation_pct(&longer), 20.0);
        assert_eq!(MetricKind::Duration.unit(), "ms");
    }
}
