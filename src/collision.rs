//! # Collision Projection
//!
//! Projects how often the recorder's periodic collection collides with a
//! stream of DDL operations:
//!
//! ```text
//! collections_per_day        = 86400 div interval_seconds
//! expected_collisions_per_day = collections_per_day
//!                             * (measured_block_rate_pct / 100)
//!                             * operations_per_hour * 24
//! ```
//!
//! The block rate is already a per-operation probability measured over the
//! whole benchmark window, so multiplying it by both the collection count and
//! the daily operation volume counts each collision once per collection.
//! Projections are therefore an upper bound; see DESIGN.md.
//!
//! The figures shown to users come from the per-operation estimate instead,
//! `measured_block_rate_pct / 100 * operations_per_hour * 24`, tabulated per
//! DDL rate ([`estimate_rates`]) and per collection mode ([`estimate_modes`]).

use crate::defaults;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_DAY: u32 = 86_400;
pub const HOURS_PER_DAY: f64 = 24.0;

/// Projected collision volume for one collection interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionProjection {
    pub interval_seconds: u32,
    pub collections_per_day: u32,
    pub operations_per_hour: u32,
    pub measured_collision_rate_pct: f64,
    pub expected_collisions_per_day: f64,
    pub expected_collisions_per_hour: f64,
}

/// Project daily collisions for a measured block rate.
///
/// Fails with [`AnalysisError::InvalidParameter`] when `interval_seconds` is zero.
///
/// ```rust
/// # use recorder_impact::collision::project;
/// let projection = project(2.0, 180, 100).unwrap();
/// assert_eq!(projection.collections_per_day, 480);
/// assert!((projection.expected_collisions_per_day - 23_040.0).abs() < 1e-6);
/// ```
pub fn project(
    measured_block_rate_pct: f64,
    interval_seconds: u32,
    operations_per_hour: u32,
) -> Result<CollisionProjection> {
    if interval_seconds == 0 {
        return Err(AnalysisError::InvalidParameter {
            name: "interval_seconds",
            reason: "collection interval must be at least one second".to_string(),
        });
    }

    let collections_per_day = SECONDS_PER_DAY / interval_seconds;
    let daily_operations = operations_per_hour as f64 * HOURS_PER_DAY;
    let expected_collisions_per_day =
        collections_per_day as f64 * (measured_block_rate_pct / 100.0) * daily_operations;

    Ok(CollisionProjection {
        interval_seconds,
        collections_per_day,
        operations_per_hour,
        measured_collision_rate_pct: measured_block_rate_pct,
        expected_collisions_per_day,
        expected_collisions_per_hour: expected_collisions_per_day / HOURS_PER_DAY,
    })
}

/// Project the same block rate across several collection intervals.
pub fn project_intervals(
    measured_block_rate_pct: f64,
    interval_seconds: &[u32],
    operations_per_hour: u32,
) -> Result<Vec<CollisionProjection>> {
    interval_seconds
        .iter()
        .map(|&interval| project(measured_block_rate_pct, interval, operations_per_hour))
        .collect()
}

/// Collisions per day when each DDL operation collides with probability
/// `measured_block_rate_pct / 100`.
pub fn operation_collisions_per_day(
    measured_block_rate_pct: f64,
    operations_per_hour: u32,
) -> f64 {
    measured_block_rate_pct * operations_per_hour as f64 * HOURS_PER_DAY / 100.0
}

/// Per-operation estimate for one DDL rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    pub operations_per_hour: u32,
    pub collisions_per_day: f64,
}

/// Per-operation estimates for several DDL rates.
pub fn estimate_rates(
    measured_block_rate_pct: f64,
    operations_per_hour: &[u32],
) -> Vec<RateEstimate> {
    operations_per_hour
        .iter()
        .map(|&ops| RateEstimate {
            operations_per_hour: ops,
            collisions_per_day: operation_collisions_per_day(measured_block_rate_pct, ops),
        })
        .collect()
}

/// Recorder collection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionMode {
    Normal,
    Light,
    Emergency,
}

impl CollectionMode {
    pub const ALL: [CollectionMode; 3] = [Self::Normal, Self::Light, Self::Emergency];

    pub fn interval_seconds(&self) -> u32 {
        match self {
            Self::Normal | Self::Light => defaults::COLLECTION_INTERVAL_SECS,
            Self::Emergency => defaults::EMERGENCY_INTERVAL_SECS,
        }
    }

    /// Scale applied to the measured block rate in this mode.
    ///
    /// Emergency mode collects 180/300 as often as normal mode.
    pub fn rate_factor(&self) -> f64 {
        match self {
            Self::Normal | Self::Light => 1.0,
            Self::Emergency => 0.6,
        }
    }
}

impl fmt::Display for CollectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Light => write!(f, "Light"),
            Self::Emergency => write!(f, "Emergency"),
        }
    }
}

/// Per-operation estimate for one collection mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeEstimate {
    pub mode: CollectionMode,
    pub interval_seconds: u32,
    pub collections_per_day: u32,
    pub operations_per_hour: u32,
    pub collisions_per_day: f64,
}

/// Per-operation estimates for every collection mode at one DDL rate.
pub fn estimate_modes(measured_block_rate_pct: f64, operations_per_hour: u32) -> Vec<ModeEstimate> {
    CollectionMode::ALL
        .iter()
        .map(|&mode| {
            let interval_seconds = mode.interval_seconds();
            ModeEstimate {
                mode,
                interval_seconds,
                collections_per_day: SECONDS_PER_DAY / interval_seconds,
                operations_per_hour,
                collisions_per_day: operation_collisions_per_day(
                    measured_block_rate_pct * mode.rate_factor(),
                    operations_per_hour,
                ),
            }
        })
        .collect()
}
