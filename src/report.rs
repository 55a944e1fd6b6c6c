use crate::comparison::RunComparison;
use crate::ddl::DdlReport;
use crate::error::Result;
use crate::workload::WorkloadOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source of the report timestamp
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant, for reproducible reports
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub tool: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
}

/// Everything an external renderer needs from one analysis invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<RunComparison>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub workloads: BTreeMap<String, WorkloadOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddl: Option<DdlReport>,
}

impl AnalysisReport {
    /// Number of workloads that could not be analyzed
    pub fn insufficient_workloads(&self) -> usize {
        self.workloads
            .values()
            .filter(|outcome| outcome.analysis().is_none())
            .count()
    }
}

/// Assembles an [`AnalysisReport`] from the individual analyses
pub struct ReportBuilder<C: Clock = SystemClock> {
    clock: C,
    comparison: Option<RunComparison>,
    workloads: BTreeMap<String, WorkloadOutcome>,
    ddl: Option<DdlReport>,
}

impl ReportBuilder<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ReportBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ReportBuilder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            comparison: None,
            workloads: BTreeMap::new(),
            ddl: None,
        }
    }

    pub fn comparison(mut self, comparison: RunComparison) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn workload(mut self, name: impl Into<String>, outcome: WorkloadOutcome) -> Self {
        self.workloads.insert(name.into(), outcome);
        self
    }

    pub fn workloads(mut self, outcomes: BTreeMap<String, WorkloadOutcome>) -> Self {
        self.workloads.extend(outcomes);
        self
    }

    pub fn ddl(mut self, report: DdlReport) -> Self {
        self.ddl = Some(report);
        self
    }

    pub fn build(self) -> AnalysisReport {
        AnalysisReport {
            metadata: ReportMetadata {
                tool: env!("CARGO_PKG_NAME").to_string(),
                version: crate::VERSION.to_string(),
                generated_at: self.clock.now(),
            },
            comparison: self.comparison,
            workloads: self.workloads,
            ddl: self.ddl,
        }
    }
}

/// Writes reports as pretty-printed JSON
pub struct ReportWriter {
    output_file: PathBuf,
}

impl ReportWriter {
    pub fn new(output_file: &Path) -> Self {
        Self {
            output_file: output_file.to_path_buf(),
        }
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn write(&self, report: &AnalysisReport) -> Result<()> {
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.output_file, json)?;
        debug!("Report size: {} workloads", report.workloads.len());
        info!("Report written to: {:?}", self.output_file);
        Ok(())
    }
}
