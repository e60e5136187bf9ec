//! Weather perturbation and environmental events.
//!
//! Two sources of weather touch the soil:
//!
//! - **Weather shifts** are rolled on every player action. With a fixed
//!   probability one of three shifts (hot, cold, rainy) is drawn uniformly
//!   and applied before the action itself.
//! - **Environmental events** arrive from the sky simulator whenever rain or
//!   the day/night cycle changes.
//!
//! | Shift  | Temperature | Humidity |
//! |--------|-------------|----------|
//! | Hot    | +3          | -5       |
//! | Cold   | -3          |          |
//! | Rainy  | -1          | +10      |
//!
//! Every action additionally jitters pH and temperature by a small uniform
//! amount. Shifts and jitter clamp temperature to
//! [`ACTION_TEMPERATURE`](crate::bounds::ACTION_TEMPERATURE); events use the
//! wider [`EVENT_TEMPERATURE`](crate::bounds::EVENT_TEMPERATURE).

use tuberfield_types::{EnvironmentalEffects, SoilState, WeatherShift};

use crate::bounds;
use crate::noise::NoiseSource;

/// Probability that an action is preceded by a weather shift.
pub const WEATHER_SHIFT_CHANCE: f64 = 0.2;

/// Maximum pH jitter applied on every action.
pub const PH_JITTER: f64 = 0.3;

/// Maximum temperature jitter applied on every action (°C).
pub const TEMPERATURE_JITTER: f64 = 0.8;

/// Roll whether a weather shift happens and, if so, which one.
pub fn roll_weather_shift(noise: &mut dyn NoiseSource) -> Option<WeatherShift> {
    if !noise.chance(WEATHER_SHIFT_CHANCE) {
        return None;
    }
    let index = noise.pick(WeatherShift::ALL.len());
    WeatherShift::ALL.get(index).copied()
}

/// Apply a weather shift to the soil.
pub fn apply_weather_shift(soil: &mut SoilState, shift: WeatherShift) {
    match shift {
        WeatherShift::Hot => {
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature + 3.0);
            soil.humidity = bounds::HUMIDITY.clamp(soil.humidity - 5.0);
        }
        WeatherShift::Cold => {
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature - 3.0);
        }
        WeatherShift::Rainy => {
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature - 1.0);
            soil.humidity = bounds::HUMIDITY.clamp(soil.humidity + 10.0);
        }
    }
}

/// Apply the per-action pH and temperature jitter.
pub fn apply_jitter(soil: &mut SoilState, noise: &mut dyn NoiseSource) {
    soil.ph = bounds::PH.clamp(soil.ph + noise.spread(PH_JITTER));
    soil.temperature =
        bounds::ACTION_TEMPERATURE.clamp(soil.temperature + noise.spread(TEMPERATURE_JITTER));
}

/// Apply one environmental signal to the soil and water reservoir.
///
/// Rain takes precedence over the day/night cycle: a rainy step never also
/// applies the night cooling or day warming.
pub fn apply_environmental_event(
    soil: &mut SoilState,
    water_level: &mut f64,
    effects: EnvironmentalEffects,
) {
    if effects.is_raining {
        soil.humidity = bounds::HUMIDITY.clamp(soil.humidity + 5.0);
        soil.temperature = bounds::EVENT_TEMPERATURE.clamp(soil.temperature - 1.0);
        *water_level = bounds::WATER_LEVEL.clamp(*water_level + 10.0);
    } else if effects.is_day_time {
        soil.temperature = bounds::EVENT_TEMPERATURE.clamp(soil.temperature + 1.0);
    } else {
        soil.temperature = bounds::EVENT_TEMPERATURE.clamp(soil.temperature - 2.0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::noise::{RngNoise, StillNoise};

    const EPS: f64 = 1e-9;

    /// Always triggers a shift and always picks the given index.
    struct Forced(usize);

    impl NoiseSource for Forced {
        fn chance(&mut self, _probability: f64) -> bool {
            true
        }
        fn pick(&mut self, _len: usize) -> usize {
            self.0
        }
        fn spread(&mut self, amplitude: f64) -> f64 {
            amplitude
        }
        fn between(&mut self, _low: u32, high: u32) -> u32 {
            high
        }
    }

    #[test]
    fn still_noise_never_shifts_weather() {
        assert_eq!(roll_weather_shift(&mut StillNoise), None);
    }

    #[test]
    fn forced_noise_selects_each_shift() {
        assert_eq!(roll_weather_shift(&mut Forced(0)), Some(WeatherShift::Hot));
        assert_eq!(roll_weather_shift(&mut Forced(1)), Some(WeatherShift::Cold));
        assert_eq!(roll_weather_shift(&mut Forced(2)), Some(WeatherShift::Rainy));
    }

    #[test]
    fn hot_shift_warms_and_dries() {
        let mut soil = SoilState::initial();
        apply_weather_shift(&mut soil, WeatherShift::Hot);
        assert!((soil.temperature - 21.0).abs() < EPS);
        assert!((soil.humidity - 30.0).abs() < EPS);
    }

    #[test]
    fn rainy_shift_cools_and_wets() {
        let mut soil = SoilState::initial();
        apply_weather_shift(&mut soil, WeatherShift::Rainy);
        assert!((soil.temperature - 17.0).abs() < EPS);
        assert!((soil.humidity - 45.0).abs() < EPS);
    }

    #[test]
    fn cold_shift_stops_at_action_floor() {
        let mut soil = SoilState {
            temperature: 11.0,
            ..SoilState::initial()
        };
        apply_weather_shift(&mut soil, WeatherShift::Cold);
        assert!((soil.temperature - 10.0).abs() < EPS);
    }

    #[test]
    fn jitter_is_bounded() {
        let mut noise = RngNoise::new(StdRng::seed_from_u64(3));
        let start = SoilState::initial();
        for _ in 0..500 {
            let mut soil = start;
            apply_jitter(&mut soil, &mut noise);
            assert!((soil.ph - start.ph).abs() <= PH_JITTER + EPS);
            assert!((soil.temperature - start.temperature).abs() <= TEMPERATURE_JITTER + EPS);
        }
    }

    #[test]
    fn jitter_respects_limits() {
        let mut soil = SoilState {
            ph: 8.0,
            temperature: 30.0,
            ..SoilState::initial()
        };
        apply_jitter(&mut soil, &mut Forced(0));
        assert!((soil.ph - 8.0).abs() < EPS);
        assert!((soil.temperature - 30.0).abs() < EPS);
    }

    #[test]
    fn rain_event_wets_soil_and_fills_reservoir() {
        let mut soil = SoilState::initial();
        let mut water = 35.0;
        apply_environmental_event(
            &mut soil,
            &mut water,
            EnvironmentalEffects {
                is_raining: true,
                is_day_time: true,
            },
        );
        assert!((soil.humidity - 40.0).abs() < EPS);
        assert!((soil.temperature - 17.0).abs() < EPS);
        assert!((water - 45.0).abs() < EPS);
    }

    #[test]
    fn night_and_day_events_move_temperature() {
        let mut soil = SoilState::initial();
        let mut water = 35.0;
        apply_environmental_event(
            &mut soil,
            &mut water,
            EnvironmentalEffects {
                is_raining: false,
                is_day_time: false,
            },
        );
        assert!((soil.temperature - 16.0).abs() < EPS);

        let mut soil = SoilState::initial();
        apply_environmental_event(&mut soil, &mut water, EnvironmentalEffects::default());
        assert!((soil.temperature - 19.0).abs() < EPS);
        assert!((water - 35.0).abs() < EPS);
    }

    #[test]
    fn events_may_leave_action_range() {
        let mut soil = SoilState {
            temperature: 10.0,
            ..SoilState::initial()
        };
        let mut water = 35.0;
        let night = EnvironmentalEffects {
            is_raining: false,
            is_day_time: false,
        };
        for _ in 0..10 {
            apply_environmental_event(&mut soil, &mut water, night);
        }
        assert!((soil.temperature - 5.0).abs() < EPS);
    }
}
