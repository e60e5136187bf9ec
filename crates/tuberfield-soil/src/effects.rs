//! Soil effects of each player action.
//!
//! | Action        | Effect                                                         |
//! |---------------|----------------------------------------------------------------|
//! | `water`       | water +20, humidity +10, pH ±0.1, temperature -0.5             |
//! | `fertilize_n` | nitrogen +20, EC +0.2, pH -0.1                                 |
//! | `fertilize_p` | phosphorus +15, EC +0.15                                       |
//! | `fertilize_k` | potassium +20, EC +0.15                                        |
//! | `compost`     | organic matter +0.5, N +10, P +5, K +10, temperature +0.3      |
//! | `adjust_ph`   | pH moves 30% of the way toward 6.0                             |
//! | `cool_soil`   | temperature -2                                                 |
//! | `warm_soil`   | temperature +2                                                 |
//!
//! Every touched field is clamped to its limits. Temperature uses the
//! action range.

use tuberfield_types::{Action, SoilState};

use crate::bounds;
use crate::noise::NoiseSource;

/// The pH `adjust_ph` steers toward.
pub const PH_TARGET: f64 = 6.0;

/// Fraction of the distance to [`PH_TARGET`] covered by one `adjust_ph`.
pub const PH_ADJUST_RATE: f64 = 0.3;

/// Maximum pH wobble caused by watering.
pub const WATER_PH_JITTER: f64 = 0.1;

/// Apply one action's effect to the soil and water reservoir.
pub fn apply_action_effect(
    soil: &mut SoilState,
    water_level: &mut f64,
    action: Action,
    noise: &mut dyn NoiseSource,
) {
    match action {
        Action::Water => {
            *water_level = bounds::WATER_LEVEL.clamp(*water_level + 20.0);
            soil.humidity = bounds::HUMIDITY.clamp(soil.humidity + 10.0);
            soil.ph = bounds::PH.clamp(soil.ph + noise.spread(WATER_PH_JITTER));
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature - 0.5);
        }
        Action::FertilizeN => {
            soil.nitrogen = bounds::NITROGEN.clamp(soil.nitrogen + 20.0);
            soil.electrical_conductivity =
                bounds::ELECTRICAL_CONDUCTIVITY.clamp(soil.electrical_conductivity + 0.2);
            soil.ph = bounds::PH.clamp(soil.ph - 0.1);
        }
        Action::FertilizeP => {
            soil.phosphorus = bounds::PHOSPHORUS.clamp(soil.phosphorus + 15.0);
            soil.electrical_conductivity =
                bounds::ELECTRICAL_CONDUCTIVITY.clamp(soil.electrical_conductivity + 0.15);
        }
        Action::FertilizeK => {
            soil.potassium = bounds::POTASSIUM.clamp(soil.potassium + 20.0);
            soil.electrical_conductivity =
                bounds::ELECTRICAL_CONDUCTIVITY.clamp(soil.electrical_conductivity + 0.15);
        }
        Action::Compost => {
            soil.organic_matter = bounds::ORGANIC_MATTER.clamp(soil.organic_matter + 0.5);
            soil.nitrogen = bounds::NITROGEN.clamp(soil.nitrogen + 10.0);
            soil.phosphorus = bounds::PHOSPHORUS.clamp(soil.phosphorus + 5.0);
            soil.potassium = bounds::POTASSIUM.clamp(soil.potassium + 10.0);
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature + 0.3);
        }
        Action::AdjustPh => {
            soil.ph = bounds::PH.clamp(soil.ph + (PH_TARGET - soil.ph) * PH_ADJUST_RATE);
        }
        Action::CoolSoil => {
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature - 2.0);
        }
        Action::WarmSoil => {
            soil.temperature = bounds::ACTION_TEMPERATURE.clamp(soil.temperature + 2.0);
        }
    }
}
