//! crates/eco_tracker_core/src/estimator.rs
//!
//! Maps a logged action to a CO2e quantity in kilograms using fixed
//! per-category rates. No lookup leaves the process.

use crate::domain::{quantity_or_one, ActionDetails};

/// kg CO2e per serving.
const BEEF_PER_SERVING: f64 = 3.0;
const CHICKEN_PER_SERVING: f64 = 1.5;
const OTHER_MEAL_PER_SERVING: f64 = 0.5;

/// kg CO2e per kilometre.
const CAR_PER_KM: f64 = 0.2;
const BUS_PER_KM: f64 = 0.1;

/// Flat kg CO2e per energy action.
const LOWERED_THERMOSTAT: f64 = 1.0;
const OTHER_ENERGY_ACTION: f64 = 0.5;

/// Estimates the CO2e of an action.
///
/// Total and deterministic: unrecognized meal types, modes and energy actions
/// fall through to the lowest rate of their category instead of failing.
/// The result is never negative and never exceeds the rate at `MAX_QUANTITY`.
pub fn estimate_co2e(details: &ActionDetails) -> f64 {
    match details {
        ActionDetails::Diet { meal_type, servings } => {
            let rate = match meal_type.as_str() {
                "Beef" => BEEF_PER_SERVING,
                "Chicken" => CHICKEN_PER_SERVING,
                _ => OTHER_MEAL_PER_SERVING,
            };
            rate * quantity_or_one(*servings)
        }
        ActionDetails::Travel { mode, distance } => {
            let rate = match mode.as_str() {
                "Car" => CAR_PER_KM,
                "Bus" => BUS_PER_KM,
                // Bike and anything else we can't price.
                _ => return 0.0,
            };
            rate * quantity_or_one(*distance)
        }
        ActionDetails::Energy { action } => match action.as_str() {
            "Lowered Thermostat" => LOWERED_THERMOSTAT,
            _ => OTHER_ENERGY_ACTION,
        },
    }
}
