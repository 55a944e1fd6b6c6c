//! # Single Run Comparison
//!
//! Compares one baseline benchmark run against one run with the recorder
//! enabled: throughput, the latency ladder and database counter deltas over
//! the run, then grades the overall overhead.

use crate::defaults;
use crate::error::{AnalysisError, Result};
use crate::impact::{self, CounterSnapshot, ImpactResult, ImpactSeries};
use crate::severity::{self, Conclusion, ImpactBand, OverheadSeverity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub tps: f64,
}

/// Database counters sampled at the start and end of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub start: CounterSnapshot,
    pub end: CounterSnapshot,
}

/// One benchmark run as written by the harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRun {
    pub scenario: String,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub clients: Option<u32>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub throughput: Throughput,
    /// Latency ladder in ms keyed by `mean`, `p50`, `p95`, `p99`, `max`
    pub latency_ms: BTreeMap<String, f64>,
    pub database_stats: DatabaseStats,
}

/// Plain-language reading of the headline metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub throughput: ImpactBand,
    pub latency_p95: ImpactBand,
    pub conclusion: Conclusion,
}

/// Result of comparing a baseline run with a test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunComparison {
    pub scenario: String,
    pub throughput: ImpactResult,
    pub latency: ImpactSeries,
    pub database_stats: ImpactSeries,
    pub severity: OverheadSeverity,
    pub interpretation: Interpretation,
    /// Non-fatal problems such as a scenario mismatch
    pub warnings: Vec<String>,
}

/// Compare a baseline run with a test run.
///
/// A scenario mismatch is logged and recorded as a warning; the comparison
/// still proceeds. A missing latency metric or counter, or a counter that went
/// backwards, fails the comparison.
pub fn compare_runs(baseline: &BenchmarkRun, test: &BenchmarkRun) -> Result<RunComparison> {
    let mut warnings = Vec::new();
    if baseline.scenario != test.scenario {
        let mismatch = AnalysisError::ConfigurationMismatch {
            baseline: baseline.scenario.clone(),
            test: test.scenario.clone(),
        };
        warn!("{}", mismatch);
        warnings.push(mismatch.to_string());
    }

    let throughput = impact::compare(baseline.throughput.tps, test.throughput.tps);
    let latency = impact::compare_series(
        &baseline.latency_ms,
        &test.latency_ms,
        &defaults::LATENCY_METRICS,
    )?;

    let baseline_deltas = impact::counter_deltas(
        &baseline.database_stats.start,
        &baseline.database_stats.end,
        &defaults::DATABASE_COUNTERS,
    )?;
    let test_deltas = impact::counter_deltas(
        &test.database_stats.start,
        &test.database_stats.end,
        &defaults::DATABASE_COUNTERS,
    )?;
    let database_stats =
        impact::compare_series(&baseline_deltas, &test_deltas, &defaults::DATABASE_COUNTERS)?;

    let p95_pct = latency
        .get("p95")
        .map(|p95| p95.percent_delta)
        .unwrap_or(0.0);
    let severity = severity::classify_overhead(throughput.percent_delta, p95_pct);

    Ok(RunComparison {
        scenario: baseline.scenario.clone(),
        throughput,
        latency,
        database_stats,
        severity,
        interpretation: Interpretation {
            throughput: severity::classify_band(-throughput.percent_delta),
            latency_p95: severity::classify_band(p95_pct),
            conclusion: severity.conclusion(),
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(scenario: &str, tps: f64, p95: f64, commits: i64) -> BenchmarkRun {
        let counters = |offset: i64| -> CounterSnapshot {
            defaults::DATABASE_COUNTERS
                .iter()
                .map(|k| (k.to_string(), offset))
                .collect()
        };
        let mut end = counters(1_000);
        end.insert("xact_commit".to_string(), commits);

        BenchmarkRun {
            scenario: scenario.to_string(),
            duration_seconds: Some(300),
            clients: Some(16),
            start_time: None,
            end_time: None,
            throughput: Throughput { tps },
            latency_ms: [
                ("mean", 1.0),
                ("p50", 0.9),
                ("p95", p95),
                ("p99", 3.0),
                ("max", 9.0),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
            database_stats: DatabaseStats {
                start: counters(0),
                end,
            },
        }
    }

    /// Small differences grade as negligible
    #[test]
    fn test_compare_runs_negligible() {
        let baseline = run("tpcb", 1000.0, 2.0, 300_000);
        let test = run("tpcb", 990.0, 2.02, 297_000);
        let comparison = compare_runs(&baseline, &test).unwrap();

        assert!((comparison.throughput.percent_delta - -1.0).abs() < 1e-9);
        assert_eq!(comparison.severity, OverheadSeverity::Negligible);
        assert_eq!(comparison.interpretation.conclusion, Conclusion::Acceptable);
        assert_eq!(comparison.interpretation.throughput, ImpactBand::Negligible);
        assert_eq!(comparison.database_stats.len(), defaults::DATABASE_COUNTERS.len());
        assert!((comparison.database_stats["xact_commit"].percent_delta - -1.0).abs() < 1e-9);
        assert!(comparison.warnings.is_empty());
    }

    /// P95 growth dominates the severity
    #[test]
    fn test_compare_runs_latency_dominates() {
        let baseline = run("tpcb", 1000.0, 2.0, 300_000);
        let test = run("tpcb", 1000.0, 2.5, 300_000);
        let comparison = compare_runs(&baseline, &test).unwrap();

        assert_eq!(comparison.severity, OverheadSeverity::Severe);
        assert_eq!(comparison.interpretation.latency_p95, ImpactBand::Significant);
        assert_eq!(comparison.interpretation.conclusion, Conclusion::Caution);
    }

    /// Only throughput drops count toward the degradation bands
    #[test]
    fn test_throughput_band_direction() {
        let baseline = run("tpcb", 1000.0, 2.0, 300_000);

        let faster = compare_runs(&baseline, &run("tpcb", 1080.0, 2.0, 300_000)).unwrap();
        assert!((faster.throughput.percent_delta - 8.0).abs() < 1e-9);
        assert_eq!(faster.interpretation.throughput, ImpactBand::Negligible);

        let slower = compare_runs(&baseline, &run("tpcb", 920.0, 2.0, 300_000)).unwrap();
        assert_eq!(slower.interpretation.throughput, ImpactBand::Significant);

        let slightly = compare_runs(&baseline, &run("tpcb", 970.0, 2.0, 300_000)).unwrap();
        assert_eq!(slightly.interpretation.throughput, ImpactBand::Moderate);
    }

    /// Scenario mismatch warns but does not fail
    #[test]
    fn test_compare_runs_scenario_mismatch() {
        let baseline = run("tpcb", 1000.0, 2.0, 300_000);
        let test = run("select_only", 1000.0, 2.0, 300_000);
        let comparison = compare_runs(&baseline, &test).unwrap();
        assert_eq!(comparison.warnings.len(), 1);
        assert!(comparison.warnings[0].contains("select_only"));
    }

    /// Counter reset surfaces as an error
    #[test]
    fn test_compare_runs_counter_reset() {
        let baseline = run("tpcb", 1000.0, 2.0, 300_000);
        let test = run("tpcb", 1000.0, 2.0, -5);
        assert!(matches!(
            compare_runs(&baseline, &test),
            Err(AnalysisError::InconsistentCounter { .. })
        ));
    }

    /// Runs deserialize from the harness JSON layout
    #[test]
    fn test_benchmark_run_from_json() {
        let value = json!({
            "scenario": "tpcb",
            "duration_seconds": 60,
            "clients": 8,
            "start_time": "2024-05-01T10:00:00Z",
            "end_time": "2024-05-01T10:01:00Z",
            "throughput": {"tps": 1234.5},
            "latency_ms": {"mean": 1.0, "p50": 1.0, "p95": 2.0, "p99": 3.0, "max": 4.0},
            "database_stats": {
                "start": {"xact_commit": 1},
                "end": {"xact_commit": 2}
            }
        });
        let run: BenchmarkRun = serde_json::from_value(value).unwrap();
        assert_eq!(run.throughput.tps, 1234.5);
        assert_eq!(run.clients, Some(8));
        assert_eq!(run.database_stats.end["xact_commit"], 2);
    }
}
