//! Error types for overhead analysis.

use thiserror::Error;

/// Errors raised by the analysis engine and its ingestion boundary.
///
/// The numeric core (`stats`, `confidence`, `impact::compare`, `severity`)
/// never produces these; they come from record validation, counter deltas,
/// parameter checks and report output.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Too few valid runs or samples to compute a meaningful result
    #[error("insufficient data for {scope}: {reason}")]
    InsufficientData { scope: String, reason: String },

    /// A monotonic counter went backwards between snapshots (reset or restart)
    #[error("counter '{counter}' decreased from {start} to {end}; counter reset suspected")]
    InconsistentCounter { counter: String, start: i64, end: i64 },

    /// A counter snapshot that cannot produce a delta: the key is absent or
    /// the values are out of range
    #[error("counter '{counter}': {reason}")]
    InvalidCounter { counter: String, reason: String },

    /// Baseline and test runs were taken against different scenarios
    #[error("scenario mismatch: baseline '{baseline}' vs test '{test}'")]
    ConfigurationMismatch { baseline: String, test: String },

    /// An input record is missing a required field or carries an invalid value
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A metric name that the source does not provide
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// An analysis parameter outside its valid range
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// I/O error while writing a report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Shorthand for an insufficient-data error scoped to one workload or set.
    pub fn insufficient(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            scope: scope.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a malformed-record error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Whether the caller may skip the affected record or workload and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. }
                | Self::MalformedRecord { .. }
                | Self::ConfigurationMismatch { .. }
        )
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
