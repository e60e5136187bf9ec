//! Plant health derived from soil readings and the water reservoir.
//!
//! Health starts from [`BASE_HEALTH`], gains a bonus for every reading in
//! its good range, loses points for readings that actively harm the crop,
//! and is clamped to `[0, 100]`.
//!
//! | Condition                      | Change |
//! |--------------------------------|--------|
//! | pH in 5.5..=6.5                | +10    |
//! | humidity in 60..=80            | +10    |
//! | temperature in 15..=22         | +10    |
//! | nitrogen >= 80                 | +5     |
//! | phosphorus >= 60               | +5     |
//! | potassium >= 100               | +5     |
//! | organic matter >= 3            | +10    |
//! | water level in 60..=80         | +10    |
//! | pH < 5.0 or > 7.0              | -15    |
//! | humidity < 40 or > 90          | -10    |
//! | water level < 30               | -15    |

use tuberfield_types::SoilState;

use crate::bounds;

/// Health before any bonus or penalty.
pub const BASE_HEALTH: f64 = 50.0;

/// Compute plant health. Pure: identical inputs give identical output.
pub fn calculate_plant_health(soil: &SoilState, water_level: f64) -> f64 {
    let mut health = BASE_HEALTH;

    if (5.5..=6.5).contains(&soil.ph) {
        health += 10.0;
    }
    if (60.0..=80.0).contains(&soil.humidity) {
        health += 10.0;
    }
    if (15.0..=22.0).contains(&soil.temperature) {
        health += 10.0;
    }
    if soil.nitrogen >= 80.0 {
        health += 5.0;
    }
    if soil.phosphorus >= 60.0 {
        health += 5.0;
    }
    if soil.potassium >= 100.0 {
        health += 5.0;
    }
    if soil.organic_matter >= 3.0 {
        health += 10.0;
    }
    if (60.0..=80.0).contains(&water_level) {
        health += 10.0;
    }

    if soil.ph < 5.0 || soil.ph > 7.0 {
        health -= 15.0;
    }
    if soil.humidity < 40.0 || soil.humidity > 90.0 {
        health -= 10.0;
    }
    if water_level < 30.0 {
        health -= 15.0;
    }

    bounds::PLANT_HEALTH.clamp(health)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn ideal_soil() -> SoilState {
        SoilState {
            ph: 6.0,
            humidity: 70.0,
            temperature: 18.0,
            nitrogen: 100.0,
            phosphorus: 75.0,
            potassium: 120.0,
            organic_matter: 4.0,
            electrical_conductivity: 1.5,
        }
    }

    #[test]
    fn initial_field_scores_base_health() {
        // Temperature bonus offsets the dry-soil penalty.
        let health = calculate_plant_health(&SoilState::initial(), 35.0);
        assert!((health - 50.0).abs() < EPS);
    }

    #[test]
    fn ideal_field_reaches_full_health() {
        let health = calculate_plant_health(&ideal_soil(), 70.0);
        assert!((health - 100.0).abs() < EPS);
    }

    #[test]
    fn hostile_field_is_clamped_at_zero_or_above() {
        let soil = SoilState {
            ph: 4.0,
            humidity: 0.0,
            temperature: 35.0,
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            organic_matter: 0.0,
            electrical_conductivity: 0.0,
        };
        let health = calculate_plant_health(&soil, 0.0);
        assert!((health - 10.0).abs() < EPS);
        assert!(health >= 0.0);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let soil = SoilState {
            ph: 5.5,
            humidity: 80.0,
            temperature: 22.0,
            ..ideal_soil()
        };
        let health = calculate_plant_health(&soil, 60.0);
        assert!((health - 100.0).abs() < EPS);
    }

    #[test]
    fn low_reservoir_is_penalized() {
        let full = calculate_plant_health(&SoilState::initial(), 50.0);
        let dry = calculate_plant_health(&SoilState::initial(), 20.0);
        assert!((full - dry - 15.0).abs() < EPS);
    }

    #[test]
    fn health_is_deterministic() {
        let soil = SoilState {
            ph: 6.1,
            humidity: 55.0,
            ..SoilState::initial()
        };
        let a = calculate_plant_health(&soil, 42.0);
        let b = calculate_plant_health(&soil, 42.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
