//! # Per-Workload Analysis
//!
//! Each workload (a named transaction mix such as `oltp_read_write`) is run
//! several times with and without the recorder. The external parser turns
//! every run's summary into a [`RunRecord`] and the per-transaction log into
//! latency samples in milliseconds.
//!
//! Workloads are analyzed independently: a workload lacking valid runs on
//! either side yields [`WorkloadOutcome::InsufficientData`] while the others
//! are still analyzed.

use crate::confidence::{self, ConfidenceInterval};
use crate::defaults;
use crate::error::{AnalysisError, Result};
use crate::impact::{self, ImpactResult, ImpactSeries};
use crate::severity::{self, RegressionAssessment};
use crate::stats::{self, SummaryStatistics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One benchmark run summary as extracted by the parser
///
/// Every field is optional here; a field the parser could not find is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub tps: Option<f64>,
    pub latency_mean_ms: Option<f64>,
    pub latency_stddev_ms: Option<f64>,
    pub transactions: Option<u64>,
    pub duration_seconds: Option<f64>,
}

/// Validated run summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub tps: f64,
    pub latency_mean_ms: f64,
    pub latency_stddev_ms: Option<f64>,
    pub transactions: Option<u64>,
    pub duration_seconds: Option<f64>,
}

impl RunStats {
    /// Validate a parser record; `index` locates it in error messages.
    pub fn from_record(index: usize, record: &RunRecord) -> Result<Self> {
        let tps = required(index, "tps", record.tps)?;
        let latency_mean_ms = required(index, "latency_mean_ms", record.latency_mean_ms)?;
        Ok(Self {
            tps,
            latency_mean_ms,
            latency_stddev_ms: record.latency_stddev_ms,
            transactions: record.transactions,
            duration_seconds: record.duration_seconds,
        })
    }
}

impl TryFrom<&RunRecord> for RunStats {
    type Error = AnalysisError;

    fn try_from(record: &RunRecord) -> Result<Self> {
        Self::from_record(0, record)
    }
}

fn required(index: usize, field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(AnalysisError::malformed(
            index,
            format!("field '{}' is not finite: {}", field, v),
        )),
        None => Err(AnalysisError::malformed(
            index,
            format!("missing required field '{}'", field),
        )),
    }
}

/// Raw inputs for one workload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadInput {
    #[serde(default)]
    pub baseline_runs: Vec<RunRecord>,
    #[serde(default, alias = "enabled_runs")]
    pub test_runs: Vec<RunRecord>,
    #[serde(default)]
    pub baseline_latencies_ms: Vec<f64>,
    #[serde(default, alias = "enabled_latencies_ms")]
    pub test_latencies_ms: Vec<f64>,
}

/// Throughput across the runs of one side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpsSummary {
    pub mean: f64,
    pub stddev: f64,
    pub ci: ConfidenceInterval,
    pub samples: usize,
}

impl TpsSummary {
    fn from_runs(runs: &[RunStats], confidence_level: f64) -> Self {
        let tps: Vec<f64> = runs.iter().map(|r| r.tps).collect();
        Self {
            mean: stats::mean(&tps),
            stddev: stats::stddev(&tps),
            ci: confidence::compute_interval(&tps, confidence_level),
            samples: tps.len(),
        }
    }
}

/// Baseline vs. test throughput
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpsComparison {
    pub baseline: TpsSummary,
    pub test: TpsSummary,
    pub impact: ImpactResult,
}

/// Complete analysis of one workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadAnalysis {
    pub tps: TpsComparison,
    pub baseline_latency: SummaryStatistics,
    pub test_latency: SummaryStatistics,
    /// Impact per latency metric (`mean`, `p50`, `p95`, `p99`, `max`)
    pub latency: ImpactSeries,
    pub assessment: RegressionAssessment,
    /// Run records rejected during validation
    pub rejected_runs: usize,
}

/// Result for one workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkloadOutcome {
    Analyzed(WorkloadAnalysis),
    InsufficientData { reason: String },
}

impl WorkloadOutcome {
    pub fn analysis(&self) -> Option<&WorkloadAnalysis> {
        match self {
            WorkloadOutcome::Analyzed(analysis) => Some(analysis),
            WorkloadOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Validate run records, keeping the valid ones and counting the rest.
fn validate_runs(workload: &str, side: &str, records: &[RunRecord]) -> (Vec<RunStats>, usize) {
    let mut runs = Vec::with_capacity(records.len());
    let mut rejected = 0;
    for (index, record) in records.iter().enumerate() {
        match RunStats::from_record(index, record) {
            Ok(run) => runs.push(run),
            Err(e) => {
                warn!("{}: skipping {} run: {}", workload, side, e);
                rejected += 1;
            }
        }
    }
    (runs, rejected)
}

fn finite_samples(workload: &str, side: &str, samples: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() != samples.len() {
        warn!(
            "{}: dropped {} non-finite {} latency samples",
            workload,
            samples.len() - finite.len(),
            side
        );
    }
    finite
}

/// Analyze one workload.
///
/// Fails with [`AnalysisError::InsufficientData`] when either side has no
/// valid run. Missing latency samples are not an error: the corresponding
/// summary is all zeros and the latency impacts are zero.
pub fn analyze_workload(
    name: &str,
    input: &WorkloadInput,
    confidence_level: f64,
) -> Result<WorkloadAnalysis> {
    let (baseline_runs, baseline_rejected) = validate_runs(name, "baseline", &input.baseline_runs);
    let (test_runs, test_rejected) = validate_runs(name, "test", &input.test_runs);

    if baseline_runs.is_empty() || test_runs.is_empty() {
        return Err(AnalysisError::insufficient(
            name,
            format!(
                "{} valid baseline runs, {} valid test runs",
                baseline_runs.len(),
                test_runs.len()
            ),
        ));
    }

    let baseline_tps = TpsSummary::from_runs(&baseline_runs, confidence_level);
    let test_tps = TpsSummary::from_runs(&test_runs, confidence_level);
    let tps_impact = impact::compare(baseline_tps.mean, test_tps.mean);

    let baseline_latency =
        stats::compute_summary(&finite_samples(name, "baseline", &input.baseline_latencies_ms));
    let test_latency =
        stats::compute_summary(&finite_samples(name, "test", &input.test_latencies_ms));
    let latency = impact::compare_series(
        &baseline_latency,
        &test_latency,
        &defaults::LATENCY_METRICS,
    )?;

    let (p99_pct, p99_ms) = latency
        .get("p99")
        .map(|p99| (p99.percent_delta, p99.absolute_delta))
        .unwrap_or((0.0, 0.0));
    let assessment = severity::classify_regression(tps_impact.percent_delta, p99_pct, p99_ms);

    debug!(
        "{}: tps {:+.2}%, p99 {:+.2}% ({:+.2}ms) -> {}",
        name, tps_impact.percent_delta, p99_pct, p99_ms, assessment.overall
    );

    Ok(WorkloadAnalysis {
        tps: TpsComparison {
            baseline: baseline_tps,
            test: test_tps,
            impact: tps_impact,
        },
        baseline_latency,
        test_latency,
        latency,
        assessment,
        rejected_runs: baseline_rejected + test_rejected,
    })
}

/// Analyze every workload independently.
///
/// Insufficient data degrades only the affected workload; any other error
/// is returned.
pub fn analyze_workloads(
    workloads: &BTreeMap<String, WorkloadInput>,
    confidence_level: f64,
) -> Result<BTreeMap<String, WorkloadOutcome>> {
    let mut outcomes = BTreeMap::new();
    for (name, input) in workloads {
        let outcome = match analyze_workload(name, input, confidence_level) {
            Ok(analysis) => WorkloadOutcome::Analyzed(analysis),
            Err(AnalysisError::InsufficientData { reason, .. }) => {
                info!("{}: insufficient data ({})", name, reason);
                WorkloadOutcome::InsufficientData { reason }
            }
            Err(e) => return Err(e),
        };
        outcomes.insert(name.clone(), outcome);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::{Status, Verdict};

    fn run(tps: f64) -> RunRecord {
        RunRecord {
            tps: Some(tps),
            latency_mean_ms: Some(2.0),
            latency_stddev_ms: None,
            transactions: Some(60_000),
            duration_seconds: Some(60.0),
        }
    }

    fn latencies(base: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| base + (i % 10) as f64).collect()
    }

    /// Required fields are enforced, optional ones pass through
    #[test]
    fn test_run_stats_validation() {
        let stats = RunStats::try_from(&run(1000.0)).unwrap();
        assert_eq!(stats.tps, 1000.0);
        assert_eq!(stats.latency_stddev_ms, None);

        let missing = RunRecord {
            latency_mean_ms: None,
            ..run(1000.0)
        };
        let err = RunStats::from_record(2, &missing).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { index: 2, .. }));

        let nan = RunRecord {
            tps: Some(f64::NAN),
            ..run(1.0)
        };
        assert!(RunStats::try_from(&nan).is_err());
    }

    /// Clear throughput and tail-latency regression
    #[test]
    fn test_analyze_workload_regression() {
        let input = WorkloadInput {
            baseline_runs: vec![run(1000.0), run(1010.0), run(990.0)],
            test_runs: vec![run(950.0), run(960.0), run(940.0)],
            baseline_latencies_ms: latencies(10.0, 1000),
            test_latencies_ms: latencies(20.0, 1000),
        };
        let analysis = analyze_workload("oltp_read_write", &input, 0.95).unwrap();

        assert_eq!(analysis.tps.baseline.samples, 3);
        assert!((analysis.tps.impact.percent_delta - -5.0).abs() < 1e-9);
        assert_eq!(analysis.latency.len(), 5);
        assert_eq!(analysis.latency["p99"].absolute_delta, 10.0);
        assert_eq!(analysis.assessment.tps_status, Status::Critical);
        assert_eq!(analysis.assessment.latency_status, Status::Critical);
        assert_eq!(analysis.assessment.overall, Verdict::Fail);
        assert!(analysis.tps.baseline.ci.contains(analysis.tps.baseline.mean));
    }

    /// Latency samples are optional
    #[test]
    fn test_analyze_workload_without_latencies() {
        let input = WorkloadInput {
            baseline_runs: vec![run(500.0)],
            test_runs: vec![run(499.0)],
            ..Default::default()
        };
        let analysis = analyze_workload("oltp_read_only", &input, 0.95).unwrap();
        assert!(analysis.baseline_latency.is_empty());
        assert_eq!(analysis.latency["p99"].percent_delta, 0.0);
        assert_eq!(analysis.assessment.overall, Verdict::Pass);
        assert_eq!(analysis.tps.baseline.ci.margin, 0.0);
    }

    /// A zero baseline latency keeps the absolute delta but no percent change
    #[test]
    fn test_zero_baseline_latency() {
        let input = WorkloadInput {
            baseline_runs: vec![run(500.0)],
            test_runs: vec![run(500.0)],
            baseline_latencies_ms: Vec::new(),
            test_latencies_ms: latencies(10.0, 100),
        };
        let analysis = analyze_workload("oltp_read_only", &input, 0.95).unwrap();

        let p99 = &analysis.latency["p99"];
        assert_eq!(p99.baseline_value, 0.0);
        assert_eq!(p99.test_value, 19.0);
        assert_eq!(p99.absolute_delta, 19.0);
        assert_eq!(p99.percent_delta, 0.0);
        assert_eq!(analysis.assessment.latency_status, Status::Ok);
        assert_eq!(analysis.assessment.overall, Verdict::Pass);
    }

    /// Missing runs on one side only degrade that workload
    #[test]
    fn test_analyze_workloads_isolates_insufficient_data() {
        let mut workloads = BTreeMap::new();
        workloads.insert(
            "oltp_good".to_string(),
            WorkloadInput {
                baseline_runs: vec![run(100.0), run(100.0)],
                test_runs: vec![run(100.0), run(100.0)],
                ..Default::default()
            },
        );
        workloads.insert(
            "oltp_broken".to_string(),
            WorkloadInput {
                baseline_runs: vec![run(100.0)],
                test_runs: vec![RunRecord::default()],
                ..Default::default()
            },
        );

        let outcomes = analyze_workloads(&workloads, 0.95).unwrap();
        assert!(outcomes["oltp_good"].analysis().is_some());
        assert!(matches!(
            outcomes["oltp_broken"],
            WorkloadOutcome::InsufficientData { .. }
        ));
    }

    /// Invalid records are skipped and counted
    #[test]
    fn test_rejected_runs_counted() {
        let input = WorkloadInput {
            baseline_runs: vec![run(100.0), RunRecord::default()],
            test_runs: vec![run(100.0)],
            baseline_latencies_ms: vec![1.0, f64::NAN, 2.0],
            test_latencies_ms: vec![1.0, 2.0],
        };
        let analysis = analyze_workload("oltp_mixed", &input, 0.95).unwrap();
        assert_eq!(analysis.rejected_runs, 1);
        assert_eq!(analysis.baseline_latency.count, 2);
    }

    /// Outcome serializes with a status tag
    #[test]
    fn test_outcome_serialization() {
        let outcome = WorkloadOutcome::InsufficientData {
            reason: "0 valid baseline runs".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["reason"], "0 valid baseline runs");
    }
}
