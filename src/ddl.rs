//! # DDL Blocking Analysis
//!
//! Measures how often schema-changing and maintenance operations (ALTER,
//! CREATE INDEX, VACUUM, ...) wait on a lock held by the recorder, and what
//! that costs in duration.
//!
//! Operation records arrive as untyped JSON from the harness. They are
//! validated one by one at [`ingest_operations`]; a malformed record is
//! skipped and reported without affecting the rest of the set. Optional
//! attributes (`blocked_by`, `lock_wait_ms`) stay `None` when absent.

use crate::collision::{self, CollisionProjection, ModeEstimate, RateEstimate};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::severity::{self, BlockingRisk};
use crate::stats::{self, SummaryStatistics};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// DDL rates (operations per hour) projected in every report
pub const PROJECTED_DDL_RATES: [u32; 3] = [10, 50, 100];

/// One timed DDL operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdlOperation {
    #[serde(alias = "operation_id")]
    pub id: u64,
    #[serde(alias = "type")]
    pub ddl_type: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_ms: f64,
    pub was_blocked: bool,
    /// Description of the blocking backend, if the harness identified one
    #[serde(default, alias = "blocked_by")]
    pub blocked_by_agent: Option<String>,
    #[serde(default)]
    pub lock_wait_ms: Option<f64>,
}

impl DdlOperation {
    /// Validate one untyped record.
    pub fn from_record(index: usize, record: &Value) -> Result<Self> {
        let operation: DdlOperation = serde_json::from_value(record.clone())
            .map_err(|e| AnalysisError::malformed(index, e.to_string()))?;

        if !operation.duration_ms.is_finite() || operation.duration_ms < 0.0 {
            return Err(AnalysisError::malformed(
                index,
                format!("invalid duration_ms {}", operation.duration_ms),
            ));
        }
        if let Some(wait) = operation.lock_wait_ms {
            if !wait.is_finite() || wait < 0.0 {
                return Err(AnalysisError::malformed(
                    index,
                    format!("invalid lock_wait_ms {}", wait),
                ));
            }
        }
        Ok(operation)
    }

    /// Whether the operation waited on the recorder identified by `token`.
    pub fn is_blocked_by_recorder(&self, token: &str) -> bool {
        if !self.was_blocked {
            return false;
        }
        let token = token.to_lowercase();
        self.blocked_by_agent
            .as_deref()
            .map(|agent| agent.to_lowercase().contains(&token))
            .unwrap_or(false)
    }
}

/// Accepted operations plus the records rejected on the way in
#[derive(Debug, Default)]
pub struct IngestedOperations {
    pub operations: Vec<DdlOperation>,
    pub rejected: Vec<AnalysisError>,
}

/// Validate every record, skipping (and logging) the malformed ones.
pub fn ingest_operations(records: &[Value]) -> IngestedOperations {
    let mut ingested = IngestedOperations::default();
    for (index, record) in records.iter().enumerate() {
        match DdlOperation::from_record(index, record) {
            Ok(operation) => ingested.operations.push(operation),
            Err(e) => {
                warn!("Skipping DDL record: {}", e);
                ingested.rejected.push(e);
            }
        }
    }
    debug!(
        "Ingested {} DDL operations ({} rejected)",
        ingested.operations.len(),
        ingested.rejected.len()
    );
    ingested
}

/// Blocked-operation counts and their duration statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockingAnalysis {
    pub total_blocked: usize,
    pub total_blocked_pct: f64,
    pub recorder_blocked: usize,
    pub recorder_blocked_pct: f64,
    pub blocked_stats: SummaryStatistics,
    pub recorder_blocked_stats: SummaryStatistics,
}

/// Per-DDL-type statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub count: usize,
    pub blocked_count: usize,
    pub blocked_pct: f64,
    pub recorder_blocked_count: usize,
    pub recorder_blocked_pct: f64,
    pub duration_stats: SummaryStatistics,
    /// `None` when no operation of this type was blocked
    pub blocked_duration_stats: Option<SummaryStatistics>,
}

/// Complete DDL analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdlReport {
    pub total_operations: usize,
    pub rejected_records: usize,
    pub duration_stats: SummaryStatistics,
    pub blocking: BlockingAnalysis,
    /// Mean duration of recorder-blocked operations minus the overall mean
    pub recorder_delay_ms: Option<f64>,
    /// Recorder collisions expected per 1,000 DDL operations
    pub collisions_per_thousand_operations: f64,
    pub type_breakdown: BTreeMap<String, TypeBreakdown>,
    /// Per-operation collisions per day at the configured DDL rate
    pub estimated_collisions_per_day: f64,
    pub rate_estimates: Vec<RateEstimate>,
    pub mode_estimates: Vec<ModeEstimate>,
    /// Per-collection projection, an upper bound
    pub collision: CollisionProjection,
    pub rate_projections: Vec<CollisionProjection>,
    pub interval_projections: Vec<CollisionProjection>,
    pub risk: BlockingRisk,
}

/// Analyzer over a validated set of DDL operations
pub struct DdlAnalyzer {
    operations: Vec<DdlOperation>,
    recorder_token: String,
}

impl DdlAnalyzer {
    pub fn new(operations: Vec<DdlOperation>, recorder_token: impl Into<String>) -> Self {
        Self {
            operations,
            recorder_token: recorder_token.into(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.operations.len()
    }

    /// Duration statistics over all operations.
    pub fn duration_stats(&self) -> SummaryStatistics {
        duration_stats(self.operations.iter())
    }

    fn recorder_blocked(&self) -> impl Iterator<Item = &DdlOperation> {
        self.operations
            .iter()
            .filter(move |op| op.is_blocked_by_recorder(&self.recorder_token))
    }

    /// Share of operations blocked by the recorder, in percent.
    pub fn recorder_block_rate_pct(&self) -> f64 {
        pct(self.recorder_blocked().count(), self.total_count())
    }

    /// Mean duration of recorder-blocked operations, zero if there are none.
    pub fn average_recorder_delay_ms(&self) -> f64 {
        let durations: Vec<f64> = self.recorder_blocked().map(|op| op.duration_ms).collect();
        stats::mean(&durations)
    }

    pub fn blocking_analysis(&self) -> BlockingAnalysis {
        let blocked: Vec<&DdlOperation> =
            self.operations.iter().filter(|op| op.was_blocked).collect();
        let recorder_blocked: Vec<&DdlOperation> = self.recorder_blocked().collect();
        let total = self.total_count();

        BlockingAnalysis {
            total_blocked: blocked.len(),
            total_blocked_pct: pct(blocked.len(), total),
            recorder_blocked: recorder_blocked.len(),
            recorder_blocked_pct: pct(recorder_blocked.len(), total),
            blocked_stats: duration_stats(blocked.into_iter()),
            recorder_blocked_stats: duration_stats(recorder_blocked.into_iter()),
        }
    }

    /// Statistics per DDL type, ordered by type name.
    pub fn type_breakdown(&self) -> BTreeMap<String, TypeBreakdown> {
        let mut groups: BTreeMap<&str, Vec<&DdlOperation>> = BTreeMap::new();
        for op in &self.operations {
            groups.entry(op.ddl_type.as_str()).or_default().push(op);
        }

        groups
            .into_iter()
            .map(|(ddl_type, ops)| {
                let blocked: Vec<&DdlOperation> =
                    ops.iter().copied().filter(|op| op.was_blocked).collect();
                let recorder_blocked_count = ops
                    .iter()
                    .filter(|op| op.is_blocked_by_recorder(&self.recorder_token))
                    .count();
                let breakdown = TypeBreakdown {
                    count: ops.len(),
                    blocked_count: blocked.len(),
                    blocked_pct: pct(blocked.len(), ops.len()),
                    recorder_blocked_count,
                    recorder_blocked_pct: pct(recorder_blocked_count, ops.len()),
                    duration_stats: duration_stats(ops.iter().copied()),
                    blocked_duration_stats: if blocked.is_empty() {
                        None
                    } else {
                        Some(duration_stats(blocked.into_iter()))
                    },
                };
                (ddl_type.to_string(), breakdown)
            })
            .collect()
    }

    pub fn collision_projection(
        &self,
        interval_seconds: u32,
        operations_per_hour: u32,
    ) -> Result<CollisionProjection> {
        collision::project(
            self.recorder_block_rate_pct(),
            interval_seconds,
            operations_per_hour,
        )
    }

    pub fn risk_assessment(&self) -> BlockingRisk {
        severity::classify_blocking_risk(
            self.recorder_block_rate_pct(),
            self.average_recorder_delay_ms(),
        )
    }

    /// Run the full analysis.
    ///
    /// An empty operation set is [`AnalysisError::InsufficientData`].
    pub fn analyze(&self, config: &AnalysisConfig) -> Result<DdlReport> {
        if self.operations.is_empty() {
            return Err(AnalysisError::insufficient(
                "ddl",
                "no valid DDL operations recorded",
            ));
        }

        let duration_stats = self.duration_stats();
        let blocking = self.blocking_analysis();
        let recorder_delay_ms = (blocking.recorder_blocked > 0)
            .then(|| blocking.recorder_blocked_stats.mean - duration_stats.mean);
        let rate = self.recorder_block_rate_pct();

        let rate_projections = PROJECTED_DDL_RATES
            .iter()
            .map(|&ops| collision::project(rate, config.interval_seconds, ops))
            .collect::<Result<Vec<_>>>()?;

        Ok(DdlReport {
            total_operations: self.total_count(),
            rejected_records: 0,
            duration_stats,
            collisions_per_thousand_operations: blocking.recorder_blocked_pct * 10.0,
            blocking,
            recorder_delay_ms,
            type_breakdown: self.type_breakdown(),
            estimated_collisions_per_day: collision::operation_collisions_per_day(
                rate,
                config.operations_per_hour,
            ),
            rate_estimates: collision::estimate_rates(rate, &PROJECTED_DDL_RATES),
            mode_estimates: collision::estimate_modes(rate, config.operations_per_hour),
            collision: self
                .collision_projection(config.interval_seconds, config.operations_per_hour)?,
            rate_projections,
            interval_projections: collision::project_intervals(
                rate,
                &config.projection_intervals,
                config.operations_per_hour,
            )?,
            risk: self.risk_assessment(),
        })
    }
}

/// Ingest raw records and analyze the accepted operations.
pub fn analyze_records(records: &[Value], config: &AnalysisConfig) -> Result<DdlReport> {
    let ingested = ingest_operations(records);
    let rejected = ingested.rejected.len();
    let analyzer = DdlAnalyzer::new(ingested.operations, config.recorder_token.clone());
    let mut report = analyzer.analyze(config)?;
    report.rejected_records = rejected;
    Ok(report)
}

fn duration_stats<'a>(ops: impl Iterator<Item = &'a DdlOperation>) -> SummaryStatistics {
    let durations: Vec<f64> = ops.map(|op| op.duration_ms).collect();
    stats::compute_summary(&durations)
}

fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
