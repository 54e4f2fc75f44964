//! crates/eco_tracker_core/src/progress.rs
//!
//! Folds a newly estimated CO2e value into a user's running totals.

use crate::domain::{UserProgress, BADGE_TIERS};

/// Flat points granted for every logged action.
const BASE_POINTS: f64 = 10.0;
/// Additional points per kilogram of CO2e attributed to the action.
const POINTS_PER_KG: f64 = 5.0;
/// Point totals must fit a signed 64-bit column.
pub const MAX_POINTS: u64 = i64::MAX as u64;

/// Inputs the accumulator refuses to fold into a user's progress.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressError {
    #[error("CO2e must be a finite number, got {0}")]
    NonFiniteCo2e(f64),
    #[error("point total would exceed {max}", max = MAX_POINTS)]
    PointsOverflow,
}

/// The result of applying one action to a user's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// The new snapshot to persist.
    pub progress: UserProgress,
    pub points_awarded: u64,
    /// Badges unlocked by this action only, in ascending threshold order.
    pub new_badges: Vec<String>,
}

/// Points awarded for an action with the given CO2e.
pub fn points_for(co2e: f64) -> Result<u64, ProgressError> {
    if !co2e.is_finite() {
        return Err(ProgressError::NonFiniteCo2e(co2e));
    }
    // Negative inputs saturate to zero rather than taking points away.
    let points = (co2e * POINTS_PER_KG + BASE_POINTS).round().max(0.0);
    if points >= MAX_POINTS as f64 {
        return Err(ProgressError::PointsOverflow);
    }
    Ok(points as u64)
}

/// Applies one action's CO2e to `current` and returns the updated snapshot.
///
/// Badges are only ever added. Every tier whose threshold the new point total
/// reaches is unioned into the set; badges already held are left alone.
/// Non-finite CO2e and point totals past `MAX_POINTS` are rejected, leaving
/// `current` untouched.
pub fn apply_action(current: &UserProgress, co2e: f64) -> Result<ProgressUpdate, ProgressError> {
    let total_co2e = current.total_co2e + co2e;
    if !total_co2e.is_finite() {
        return Err(ProgressError::NonFiniteCo2e(total_co2e));
    }
    let points_awarded = points_for(co2e)?;
    let points = current
        .points
        .checked_add(points_awarded)
        .filter(|total| *total <= MAX_POINTS)
        .ok_or(ProgressError::PointsOverflow)?;

    let mut badges = current.badges.clone();
    let mut new_badges = Vec::new();
    for tier in BADGE_TIERS.iter().filter(|tier| points >= tier.threshold) {
        if badges.insert(tier.name.to_string()) {
            new_badges.push(tier.name.to_string());
        }
    }

    Ok(ProgressUpdate {
        progress: UserProgress {
            total_co2e,
            points,
            badges,
        },
        points_awarded,
        new_badges,
    })
}
