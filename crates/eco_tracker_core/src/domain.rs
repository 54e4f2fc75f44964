//! crates/eco_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Action Categories and Details
//=========================================================================================

/// The three kinds of sustainability-relevant events a user can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    Diet,
    Travel,
    Energy,
}

impl ActionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Diet => "diet",
            ActionCategory::Travel => "travel",
            ActionCategory::Energy => "energy",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diet" => Ok(ActionCategory::Diet),
            "travel" => Ok(ActionCategory::Travel),
            "energy" => Ok(ActionCategory::Energy),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// Rejections raised while turning a raw payload into `ActionDetails`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown action category '{0}'")]
    UnknownCategory(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{0}' must be a positive number")]
    NotPositive(&'static str),
    #[error("field '{0}' must not exceed {max}", max = MAX_QUANTITY)]
    OutOfRange(&'static str),
}

/// Largest servings count or distance in kilometres a single action may carry.
pub const MAX_QUANTITY: f64 = 10_000.0;

/// The untyped detail fields as they arrive from a caller, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub meal_type: Option<String>,
    pub servings: Option<f64>,
    pub mode: Option<String>,
    pub distance: Option<f64>,
    pub action: Option<String>,
}

/// Category-specific details of a logged action.
///
/// The variant carries the category, so an `ActionDetails` value can never
/// disagree with the category it was logged under.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionDetails {
    Diet { meal_type: String, servings: Option<f64> },
    Travel { mode: String, distance: Option<f64> },
    Energy { action: String },
}

impl ActionDetails {
    /// Validates raw detail fields against the given category.
    ///
    /// Only structural problems are rejected. Unrecognized meal types, travel
    /// modes and energy actions are accepted and estimated at the low rate.
    pub fn parse(category: &str, fields: DetailFields) -> Result<Self, ValidationError> {
        match category.parse::<ActionCategory>()? {
            ActionCategory::Diet => Ok(ActionDetails::Diet {
                meal_type: required(fields.meal_type, "mealType")?,
                servings: positive(fields.servings, "servings")?,
            }),
            ActionCategory::Travel => Ok(ActionDetails::Travel {
                mode: required(fields.mode, "mode")?,
                distance: positive(fields.distance, "distance")?,
            }),
            ActionCategory::Energy => Ok(ActionDetails::Energy {
                action: required(fields.action, "action")?,
            }),
        }
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            ActionDetails::Diet { .. } => ActionCategory::Diet,
            ActionDetails::Travel { .. } => ActionCategory::Travel,
            ActionDetails::Energy { .. } => ActionCategory::Energy,
        }
    }

    /// The human-readable description stored alongside the action.
    pub fn describe(&self) -> String {
        match self {
            ActionDetails::Diet { meal_type, servings } => {
                format!("{} serving(s) of {}", quantity_or_one(*servings), meal_type)
            }
            ActionDetails::Travel { mode, distance } => {
                format!("{} km by {}", quantity_or_one(*distance), mode)
            }
            ActionDetails::Energy { action } => action.clone(),
        }
    }
}

/// Servings and distances fall back to 1 when absent or unusable and are
/// capped at `MAX_QUANTITY`.
pub(crate) fn quantity_or_one(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.min(MAX_QUANTITY),
        _ => 1.0,
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn positive(value: Option<f64>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(ValidationError::NotPositive(field)),
        Some(v) if v > MAX_QUANTITY => Err(ValidationError::OutOfRange(field)),
        other => Ok(other),
    }
}

//=========================================================================================
// Actions and Users
//=========================================================================================

/// A single logged event. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: ActionCategory,
    pub description: String,
    /// Kilograms of CO2e attributed to the action.
    pub co2e: f64,
    pub timestamp: DateTime<Utc>,
}

/// The cumulative per-user gamification state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProgress {
    pub total_co2e: f64,
    pub points: u64,
    pub badges: BTreeSet<String>,
}

// Represents a user profile - created on first sign-in
#[derive(Debug, Clone)]
pub struct EcoUser {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub progress: UserProgress,
}

//=========================================================================================
// Badges
//=========================================================================================

/// A permanent achievement unlocked once a user's points reach `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeTier {
    pub threshold: u64,
    pub name: &'static str,
}

/// Badge tiers in ascending threshold order.
pub const BADGE_TIERS: [BadgeTier; 3] = [
    BadgeTier { threshold: 100, name: "Seedling Starter" },
    BadgeTier { threshold: 500, name: "Green Giant" },
    BadgeTier { threshold: 1000, name: "Eco-Hero" },
];

/// The lowest tier `points` has not reached yet, with the points still missing.
pub fn next_badge(points: u64) -> Option<(BadgeTier, u64)> {
    BADGE_TIERS
        .iter()
        .find(|tier| points < tier.threshold)
        .map(|tier| (*tier, tier.threshold - points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diet(meal: &str, servings: Option<f64>) -> DetailFields {
        DetailFields {
            meal_type: Some(meal.to_string()),
            servings,
            ..Default::default()
        }
    }

    #[test]
    fn parse_accepts_each_category() {
        let details = ActionDetails::parse("diet", diet("Beef", Some(2.0))).unwrap();
        assert_eq!(details.category(), ActionCategory::Diet);

        let travel = DetailFields {
            mode: Some("Bus".into()),
            distance: Some(12.5),
            ..Default::default()
        };
        assert_eq!(
            ActionDetails::parse("Travel", travel).unwrap(),
            ActionDetails::Travel { mode: "Bus".into(), distance: Some(12.5) }
        );

        let energy = DetailFields {
            action: Some("Air-dried laundry".into()),
            ..Default::default()
        };
        assert_eq!(
            ActionDetails::parse("energy", energy).unwrap().category(),
            ActionCategory::Energy
        );
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let err = ActionDetails::parse("shopping", DetailFields::default()).unwrap_err();
        assert_eq!(err, ValidationError::UnknownCategory("shopping".into()));
    }

    #[test]
    fn parse_rejects_missing_required_detail() {
        let err = ActionDetails::parse("travel", DetailFields::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("mode"));

        let blank = DetailFields {
            action: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(
            ActionDetails::parse("energy", blank).unwrap_err(),
            ValidationError::MissingField("action")
        );
    }

    #[test]
    fn parse_rejects_non_positive_quantities() {
        assert_eq!(
            ActionDetails::parse("diet", diet("Beef", Some(0.0))).unwrap_err(),
            ValidationError::NotPositive("servings")
        );
        assert_eq!(
            ActionDetails::parse("diet", diet("Beef", Some(f64::NAN))).unwrap_err(),
            ValidationError::NotPositive("servings")
        );
    }

    #[test]
    fn parse_rejects_quantities_above_the_cap() {
        assert_eq!(
            ActionDetails::parse("diet", diet("Beef", Some(1e308))).unwrap_err(),
            ValidationError::OutOfRange("servings")
        );

        let far = DetailFields {
            mode: Some("Car".into()),
            distance: Some(1e19),
            ..Default::default()
        };
        let err = ActionDetails::parse("travel", far).unwrap_err();
        assert_eq!(err, ValidationError::OutOfRange("distance"));
        assert_eq!(err.to_string(), "field 'distance' must not exceed 10000");

        assert!(ActionDetails::parse("diet", diet("Beef", Some(MAX_QUANTITY))).is_ok());
    }

    #[test]
    fn unrecognized_meal_type_is_accepted() {
        let details = ActionDetails::parse("diet", diet("Tofu", None)).unwrap();
        assert_eq!(details.describe(), "1 serving(s) of Tofu");
    }

    #[test]
    fn descriptions_follow_category() {
        let beef = ActionDetails::Diet { meal_type: "Beef".into(), servings: Some(2.0) };
        assert_eq!(beef.describe(), "2 serving(s) of Beef");

        let car = ActionDetails::Travel { mode: "Car".into(), distance: Some(12.5) };
        assert_eq!(car.describe(), "12.5 km by Car");

        let thermostat = ActionDetails::Energy { action: "Lowered Thermostat".into() };
        assert_eq!(thermostat.describe(), "Lowered Thermostat");
    }

    #[test]
    fn next_badge_reports_remaining_points() {
        let (tier, missing) = next_badge(95).unwrap();
        assert_eq!(tier.name, "Seedling Starter");
        assert_eq!(missing, 5);

        let (tier, _) = next_badge(100).unwrap();
        assert_eq!(tier.name, "Green Giant");

        assert!(next_badge(1000).is_none());
    }
}
