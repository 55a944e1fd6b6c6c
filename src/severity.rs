//! # Severity Classification
//!
//! Maps impact percentages onto discrete risk tiers. Three threshold tables
//! are used:
//!
//! - **Overhead** (5 tiers): absolute throughput and P95 latency change
//!   against nested bounds of 2/5/10/20%. The worse of the two signals wins.
//! - **Regression** (3 tiers): TPS drop beyond -1/-3%, and P99 latency
//!   gated on both relative and absolute growth so that small latencies with
//!   large relative swings do not raise alarms.
//! - **Blocking risk** (4 tiers): share of DDL operations blocked by the
//!   recorder against 1/3/5%, with a high-delay qualifier above 100ms.

use serde::{Deserialize, Serialize};

/// Upper bounds (exclusive, absolute %) for NEGLIGIBLE, LOW, MODERATE and HIGH
pub const OVERHEAD_BOUNDS_PCT: [f64; 4] = [2.0, 5.0, 10.0, 20.0];

/// TPS change below which the throughput status is WARNING
pub const TPS_WARNING_PCT: f64 = -1.0;
/// TPS change below which the throughput status is CRITICAL
pub const TPS_CRITICAL_PCT: f64 = -3.0;

/// P99 growth (% and ms) that must both be exceeded for WARNING
pub const P99_WARNING: (f64, f64) = (5.0, 2.0);
/// P99 growth (% and ms) that must both be exceeded for CRITICAL
pub const P99_CRITICAL: (f64, f64) = (15.0, 5.0);

/// Recorder block-rate bounds (exclusive, %) for LOW, MODERATE, MODERATE_HIGH
pub const BLOCK_RATE_BOUNDS_PCT: [f64; 3] = [1.0, 3.0, 5.0];
/// Average delay above which a blocking risk is qualified as high-delay
pub const HIGH_DELAY_MS: f64 = 100.0;

/// Bounds for interpreting a single degradation: moderate above, significant above
pub const BAND_MODERATE_PCT: f64 = 2.0;
pub const BAND_SIGNIFICANT_PCT: f64 = 5.0;

/// Overall recorder overhead tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverheadSeverity {
    Negligible,
    Low,
    Moderate,
    High,
    Severe,
}

impl OverheadSeverity {
    fn for_magnitude(pct: f64) -> Self {
        let magnitude = pct.abs();
        let tiers = [
            OverheadSeverity::Negligible,
            OverheadSeverity::Low,
            OverheadSeverity::Moderate,
            OverheadSeverity::High,
        ];
        OVERHEAD_BOUNDS_PCT
            .iter()
            .zip(tiers)
            .find(|(bound, _)| magnitude < **bound)
            .map(|(_, tier)| tier)
            .unwrap_or(OverheadSeverity::Severe)
    }

    /// Whether the overhead is acceptable without further review
    pub fn is_acceptable(&self) -> bool {
        matches!(self, OverheadSeverity::Negligible | OverheadSeverity::Low)
    }

    pub fn conclusion(&self) -> Conclusion {
        match self {
            OverheadSeverity::Negligible | OverheadSeverity::Low => Conclusion::Acceptable,
            OverheadSeverity::Moderate => Conclusion::Monitor,
            OverheadSeverity::High | OverheadSeverity::Severe => Conclusion::Caution,
        }
    }
}

impl std::fmt::Display for OverheadSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverheadSeverity::Negligible => write!(f, "NEGLIGIBLE (<2% impact)"),
            OverheadSeverity::Low => write!(f, "LOW (<5% impact)"),
            OverheadSeverity::Moderate => write!(f, "MODERATE (<10% impact)"),
            OverheadSeverity::High => write!(f, "HIGH (<20% impact)"),
            OverheadSeverity::Severe => write!(f, "SEVERE (>20% impact)"),
        }
    }
}

/// Recommended course of action derived from the overhead tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conclusion {
    /// Acceptable overhead for this workload
    Acceptable,
    /// Acceptable for troubleshooting; monitor in production
    Monitor,
    /// Significant overhead; use with caution or switch to emergency mode
    Caution,
}

/// Classify overall overhead from throughput and P95 latency change.
///
/// Each signal is placed in a tier by its absolute value; the result is the
/// worse of the two.
pub fn classify_overhead(throughput_impact_pct: f64, latency_p95_impact_pct: f64) -> OverheadSeverity {
    OverheadSeverity::for_magnitude(throughput_impact_pct)
        .max(OverheadSeverity::for_magnitude(latency_p95_impact_pct))
}

/// Regression check status, ordered `Ok < Warning < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

/// Overall regression verdict derived from the worst status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    Warning,
    Fail,
}

impl From<Status> for Verdict {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => Verdict::Pass,
            Status::Warning => Verdict::Warning,
            Status::Critical => Verdict::Fail,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Warning => write!(f, "WARNING"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Outcome of a regression check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegressionAssessment {
    pub tps_status: Status,
    pub latency_status: Status,
    pub overall: Verdict,
}

/// Classify TPS and P99 latency regressions.
///
/// A negative `tps_impact_pct` is a throughput loss. Latency escalates only
/// when both the relative and the absolute P99 growth exceed the tier bound.
pub fn classify_regression(
    tps_impact_pct: f64,
    p99_impact_pct: f64,
    p99_impact_ms: f64,
) -> RegressionAssessment {
    let tps_status = if tps_impact_pct < TPS_CRITICAL_PCT {
        Status::Critical
    } else if tps_impact_pct < TPS_WARNING_PCT {
        Status::Warning
    } else {
        Status::Ok
    };

    let exceeds = |(pct, ms): (f64, f64)| p99_impact_pct > pct && p99_impact_ms > ms;
    let latency_status = if exceeds(P99_CRITICAL) {
        Status::Critical
    } else if exceeds(P99_WARNING) {
        Status::Warning
    } else {
        Status::Ok
    };

    RegressionAssessment {
        tps_status,
        latency_status,
        overall: tps_status.max(latency_status).into(),
    }
}

/// Base tier for recorder-induced DDL blocking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    ModerateHigh,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Moderate => write!(f, "MODERATE"),
            RiskLevel::ModerateHigh => write!(f, "MODERATE-HIGH"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Stable recommendation key for a blocking risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    SafeForHighDdlWorkloads,
    MonitorAboveFiftyDdlPerHour,
    ConsiderEmergencyMode,
    UseEmergencyModeOrReschedule,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::SafeForHighDdlWorkloads => {
                "Safe for production use with high DDL workloads"
            }
            Recommendation::MonitorAboveFiftyDdlPerHour => {
                "Safe for typical workloads. Monitor if >50 DDL ops/hour"
            }
            Recommendation::ConsiderEmergencyMode => {
                "Consider emergency mode (300s) during DDL-heavy periods"
            }
            Recommendation::UseEmergencyModeOrReschedule => {
                "Use emergency mode (300s) or schedule DDL during low-traffic windows"
            }
        }
    }
}

/// Blocking risk with its recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockingRisk {
    pub risk_level: RiskLevel,
    /// Average recorder-induced delay exceeded [`HIGH_DELAY_MS`]
    pub high_delay: bool,
    pub average_delay_ms: f64,
    pub recommendation: Recommendation,
}

impl BlockingRisk {
    /// Tier label including the high-delay qualifier, e.g. `MODERATE (HIGH DELAY)`.
    pub fn label(&self) -> String {
        if self.high_delay {
            format!("{} (HIGH DELAY)", self.risk_level)
        } else {
            self.risk_level.to_string()
        }
    }

    /// Recommendation text including the delay note when qualified.
    pub fn recommendation_text(&self) -> String {
        let mut text = self.recommendation.message().to_string();
        if self.high_delay {
            text.push_str(&format!(
                "\nAverage delay {:.1}ms is concerning for latency-sensitive applications",
                self.average_delay_ms
            ));
        }
        text
    }
}

/// Classify DDL blocking risk from the recorder block rate and its average delay.
pub fn classify_blocking_risk(recorder_blocked_pct: f64, avg_delay_ms: f64) -> BlockingRisk {
    let [low, moderate, moderate_high] = BLOCK_RATE_BOUNDS_PCT;
    let (risk_level, recommendation) = if recorder_blocked_pct < low {
        (RiskLevel::Low, Recommendation::SafeForHighDdlWorkloads)
    } else if recorder_blocked_pct < moderate {
        (RiskLevel::Moderate, Recommendation::MonitorAboveFiftyDdlPerHour)
    } else if recorder_blocked_pct < moderate_high {
        (RiskLevel::ModerateHigh, Recommendation::ConsiderEmergencyMode)
    } else {
        (RiskLevel::High, Recommendation::UseEmergencyModeOrReschedule)
    };

    BlockingRisk {
        risk_level,
        high_delay: avg_delay_ms > HIGH_DELAY_MS,
        average_delay_ms: avg_delay_ms,
        recommendation,
    }
}

/// Interpretation of a single degradation figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactBand {
    Negligible,
    Moderate,
    Significant,
}

/// Band a degradation percentage (positive = worse).
pub fn classify_band(degradation_pct: f64) -> ImpactBand {
    if degradation_pct > BAND_SIGNIFICANT_PCT {
        ImpactBand::Significant
    } else if degradation_pct > BAND_MODERATE_PCT {
        ImpactBand::Moderate
    } else {
        ImpactBand::Negligible
    }
}
