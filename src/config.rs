use crate::cli::Args;
use crate::defaults;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Parameters shared by every analysis in one invocation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Identity token matched (case-insensitively) against `blocked_by`
    pub recorder_token: String,
    /// Recorder collection interval used for collision projection
    pub interval_seconds: u32,
    /// Assumed DDL rate for collision projection
    pub operations_per_hour: u32,
    pub confidence_level: f64,
    /// Intervals compared side by side in the DDL report
    pub projection_intervals: Vec<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recorder_token: defaults::RECORDER_TOKEN.to_string(),
            interval_seconds: defaults::COLLECTION_INTERVAL_SECS,
            operations_per_hour: defaults::OPERATIONS_PER_HOUR,
            confidence_level: defaults::CONFIDENCE_LEVEL,
            projection_intervals: vec![
                defaults::COLLECTION_INTERVAL_SECS,
                defaults::EMERGENCY_INTERVAL_SECS,
            ],
        }
    }
}

impl From<&Args> for AnalysisConfig {
    fn from(args: &Args) -> Self {
        let mut projection_intervals = vec![args.interval];
        if args.interval != defaults::EMERGENCY_INTERVAL_SECS {
            projection_intervals.push(defaults::EMERGENCY_INTERVAL_SECS);
        }
        Self {
            recorder_token: args.recorder_token.clone(),
            interval_seconds: args.interval,
            operations_per_hour: args.ops_per_hour,
            confidence_level: defaults::CONFIDENCE_LEVEL,
            projection_intervals,
        }
    }
}

impl AnalysisConfig {
    /// Reject parameters the analysis cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.recorder_token.trim().is_empty() {
            return Err(AnalysisError::InvalidParameter {
                name: "recorder_token",
                reason: "token must not be empty".to_string(),
            });
        }
        if self.interval_seconds == 0 || self.projection_intervals.contains(&0) {
            return Err(AnalysisError::InvalidParameter {
                name: "interval_seconds",
                reason: "collection interval must be at least one second".to_string(),
            });
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "confidence_level",
                reason: format!("{} is outside (0, 1)", self.confidence_level),
            });
        }
        Ok(())
    }
}
