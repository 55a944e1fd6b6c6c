//! # Recorder Impact Analysis Library
//!
//! Quantifies the performance overhead of a database flight recorder by
//! statistically comparing baseline benchmark runs with runs where the
//! recorder is enabled, and grading the result into actionable risk tiers.
//!
//! ## Architecture Overview
//!
//! The numeric core is pure and deterministic; it never performs I/O:
//!
//! - `stats`: summary statistics and the percentile convention
//! - `confidence`: confidence intervals for a sample mean
//! - `impact`: baseline vs. test deltas, including monotonic counter deltas
//! - `severity`: overhead, regression and blocking-risk tiers
//! - `collision`: projection of recorder/DDL lock collisions
//!
//! Built on top of the core:
//!
//! - `workload`: repeated-run analysis per named workload
//! - `comparison`: single baseline/test run comparison
//! - `ddl`: DDL blocking analysis over timed operations
//! - `report`: the structured result handed to a renderer
//!
//! ## Usage Example
//!
//! ```rust
//! use recorder_impact::{classify_overhead, compare, compute_summary, OverheadSeverity};
//!
//! let baseline = compute_summary(&[1.0, 1.2, 1.1, 1.3]);
//! let test = compute_summary(&[1.0, 1.25, 1.1, 1.3]);
//! let p95 = compare(baseline.p95, test.p95);
//! let tps = compare(1000.0, 995.0);
//!
//! assert_eq!(
//!     classify_overhead(tps.percent_delta, p95.percent_delta),
//!     OverheadSeverity::Negligible
//! );
//! ```

/// Command-line interface
///
/// Subcommands for the three analyses and the shared projection options.
pub mod cli;

/// Collision projection for periodic recorder collections
pub mod collision;

/// Single baseline vs. test run comparison
pub mod comparison;

/// Confidence intervals for a sample mean
pub mod confidence;

/// Analysis parameters shared across one invocation
pub mod config;

/// DDL blocking analysis
///
/// Validates timed DDL operation records and measures how often and how long
/// they wait on the recorder.
pub mod ddl;

/// Error taxonomy for analysis and ingestion
pub mod error;

/// Baseline vs. test impact computation
pub mod impact;

/// Colorized tracing output
pub mod logging;

/// Structured report assembly and JSON output
pub mod report;

/// Overhead, regression and blocking-risk classification
pub mod severity;

/// Summary statistics and percentiles
pub mod stats;

pub mod utils;

/// Per-workload repeated-run analysis
pub mod workload;

pub use collision::{
    estimate_modes, estimate_rates, project, CollectionMode, CollisionProjection, ModeEstimate,
    RateEstimate,
};
pub use confidence::{compute_interval, ConfidenceInterval};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use impact::{compare, compare_series, counter_delta, ImpactResult, MetricKind, MetricSource};
pub use report::{AnalysisReport, Clock, FixedClock, ReportBuilder, SystemClock};
pub use severity::{
    classify_blocking_risk, classify_overhead, classify_regression, OverheadSeverity, Status,
    Verdict,
};
pub use stats::{compute_summary, SummaryStatistics};

/// The current version of the analysis tool
///
/// Populated from Cargo.toml and recorded in every report.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Token matched against a DDL operation's blocking agent
    pub const RECORDER_TOKEN: &str = "flight_recorder";

    /// Normal recorder collection interval
    pub const COLLECTION_INTERVAL_SECS: u32 = 180;

    /// Emergency-mode collection interval
    ///
    /// The longer interval the recorder falls back to under load; projected
    /// alongside the configured interval for comparison.
    pub const EMERGENCY_INTERVAL_SECS: u32 = 300;

    /// Assumed DDL rate for collision projection
    pub const OPERATIONS_PER_HOUR: u32 = 100;

    pub const CONFIDENCE_LEVEL: f64 = 0.95;

    /// Latency ladder compared between baseline and test
    pub const LATENCY_METRICS: [&str; 5] = ["mean", "p50", "p95", "p99", "max"];

    /// Database counters whose deltas are compared
    pub const DATABASE_COUNTERS: [&str; 8] = [
        "xact_commit",
        "xact_rollback",
        "blks_read",
        "blks_hit",
        "tup_returned",
        "tup_fetched",
        "tup_inserted",
        "tup_updated",
    ];

    /// Default output file name
    pub const OUTPUT_FILE: &str = "impact_report.json";
}
