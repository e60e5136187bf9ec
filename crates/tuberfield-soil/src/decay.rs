//! Daily resource decay applied on every tick.

use tuberfield_types::SoilState;

use crate::bounds;

/// Humidity lost per simulated day.
pub const HUMIDITY_DECAY: f64 = 3.0;
/// Water reservoir drained per simulated day.
pub const WATER_DECAY: f64 = 4.0;
/// Nitrogen consumed per simulated day.
pub const NITROGEN_DECAY: f64 = 2.0;
/// Phosphorus consumed per simulated day.
pub const PHOSPHORUS_DECAY: f64 = 1.5;
/// Potassium consumed per simulated day.
pub const POTASSIUM_DECAY: f64 = 2.0;

/// Apply one day of evaporation and nutrient uptake. Values stop at zero.
pub fn apply_daily_decay(soil: &mut SoilState, water_level: &mut f64) {
    soil.humidity = bounds::HUMIDITY.clamp(soil.humidity - HUMIDITY_DECAY);
    *water_level = bounds::WATER_LEVEL.clamp(*water_level - WATER_DECAY);
    soil.nitrogen = bounds::NITROGEN.clamp(soil.nitrogen - NITROGEN_DECAY);
    soil.phosphorus = bounds::PHOSPHORUS.clamp(soil.phosphorus - PHOSPHORUS_DECAY);
    soil.potassium = bounds::POTASSIUM.clamp(soil.potassium - POTASSIUM_DECAY);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn one_day_from_initial_soil() {
        let mut soil = SoilState::initial();
        let mut water = 35.0;
        apply_daily_decay(&mut soil, &mut water);
        assert!((soil.humidity - 32.0).abs() < EPS);
        assert!((water - 31.0).abs() < EPS);
        assert!((soil.nitrogen - 38.0).abs() < EPS);
        assert!((soil.phosphorus - 23.5).abs() < EPS);
        assert!((soil.potassium - 28.0).abs() < EPS);
        assert!((soil.ph - 5.2).abs() < EPS);
        assert!((soil.temperature - 18.0).abs() < EPS);
    }

    #[test]
    fn decay_stops_at_zero() {
        let mut soil = SoilState::initial();
        let mut water = 35.0;
        for _ in 0..100 {
            apply_daily_decay(&mut soil, &mut water);
        }
        assert!(soil.humidity.abs() < EPS);
        assert!(water.abs() < EPS);
        assert!(soil.nitrogen.abs() < EPS);
        assert!(soil.phosphorus.abs() < EPS);
        assert!(soil.potassium.abs() < EPS);
        assert!((soil.organic_matter - 1.5).abs() < EPS);
    }
}
