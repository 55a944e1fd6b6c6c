//! Property tests for the statistical core.

use proptest::prelude::*;
use recorder_impact::confidence::compute_interval;
use recorder_impact::impact::compare;
use recorder_impact::severity::{classify_overhead, classify_regression, Status, Verdict};
use recorder_impact::stats::{compute_summary, percentile_index};

fn samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6f64..1.0e6, 1..400)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    /// min <= median <= max and p50 <= p95 <= p99 <= max for any non-empty set.
    #[test]
    fn percentile_ladder_is_monotonic(values in samples()) {
        let s = compute_summary(&values);
        prop_assert_eq!(s.count, values.len());
        prop_assert!(s.min <= s.median && s.median <= s.max);
        prop_assert!(s.min <= s.p50);
        prop_assert!(s.p50 <= s.p95);
        prop_assert!(s.p95 <= s.p99);
        prop_assert!(s.p99 <= s.max);
        prop_assert!(s.stddev >= 0.0);
    }

    /// The interval always contains the mean.
    #[test]
    fn interval_contains_mean(values in samples()) {
        let s = compute_summary(&values);
        let ci = compute_interval(&values, 0.95);
        prop_assert!(ci.margin >= 0.0);
        let tolerance = 1e-9 * (1.0 + s.mean.abs());
        prop_assert!(ci.low <= s.mean + tolerance);
        prop_assert!(s.mean <= ci.high + tolerance);
    }

    /// N identical values collapse every statistic onto that value.
    #[test]
    fn identical_values_collapse(v in -1.0e6f64..1.0e6, n in 1usize..200) {
        let values = vec![v; n];
        let s = compute_summary(&values);
        prop_assert_eq!(s.min, v);
        prop_assert_eq!(s.max, v);
        prop_assert_eq!(s.median, v);
        prop_assert_eq!(s.p50, v);
        prop_assert_eq!(s.p95, v);
        prop_assert_eq!(s.p99, v);
        prop_assert_eq!(s.stddev, 0.0);
        prop_assert_eq!(s.mean, v);
    }

    /// Percentile indices never leave the array.
    #[test]
    fn percentile_index_in_bounds(len in 1usize..10_000, p in 0.0f64..=100.0) {
        let index = percentile_index(len, p).unwrap();
        prop_assert!(index < len);
    }

    /// A zero baseline always yields a zero percent change.
    #[test]
    fn zero_baseline_has_zero_percent(t in -1.0e9f64..1.0e9) {
        prop_assert_eq!(compare(0.0, t).percent_delta, 0.0);
    }

    /// Swapping the two overhead signals never changes the tier.
    #[test]
    fn overhead_is_symmetric(a in -50.0f64..50.0, b in -50.0f64..50.0) {
        prop_assert_eq!(classify_overhead(a, b), classify_overhead(b, a));
    }

    /// The verdict is FAIL exactly when a status is CRITICAL.
    #[test]
    fn verdict_tracks_worst_status(
        tps in -10.0f64..10.0,
        pct in -20.0f64..40.0,
        ms in -5.0f64..20.0,
    ) {
        let a = classify_regression(tps, pct, ms);
        let worst = a.tps_status.max(a.latency_status);
        let expected = match worst {
            Status::Ok => Verdict::Pass,
            Status::Warning => Verdict::Warning,
            Status::Critical => Verdict::Fail,
        };
        prop_assert_eq!(a.overall, expected);
        if ms <= 2.0 {
            prop_assert_eq!(a.latency_status, Status::Ok);
        }
    }
}
