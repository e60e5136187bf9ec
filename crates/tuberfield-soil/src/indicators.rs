//! Dashboard projections: per-parameter status and harvest rating.

use serde::{Deserialize, Serialize};
use tuberfield_types::{
    GameState, GrowthStage, HarvestRating, OptimalBand, ParameterStatus, SoilParameter, SoilState,
};

use crate::bounds;

/// Below `min * CRITICAL_LOW_FACTOR` a reading is critical.
pub const CRITICAL_LOW_FACTOR: f64 = 0.7;
/// Above `max * CRITICAL_HIGH_FACTOR` a reading is critical.
pub const CRITICAL_HIGH_FACTOR: f64 = 1.3;

/// One row of the soil indicator panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Which reading this row describes.
    pub parameter: SoilParameter,
    /// Current value.
    pub value: f64,
    /// The band the reading should stay within.
    pub optimal: OptimalBand,
    /// Classification of `value` against `optimal`.
    pub status: ParameterStatus,
}

/// Classify a reading against its optimal band.
pub fn parameter_status(value: f64, band: OptimalBand) -> ParameterStatus {
    if band.contains(value) {
        ParameterStatus::Optimal
    } else if value < band.min * CRITICAL_LOW_FACTOR || value > band.max * CRITICAL_HIGH_FACTOR {
        ParameterStatus::Critical
    } else {
        ParameterStatus::Warning
    }
}

/// Classify plant health.
pub fn health_status(plant_health: f64) -> ParameterStatus {
    if plant_health >= 80.0 {
        ParameterStatus::Optimal
    } else if plant_health >= 50.0 {
        ParameterStatus::Warning
    } else {
        ParameterStatus::Critical
    }
}

/// Build the indicator panel for a soil snapshot.
pub fn soil_indicators(soil: &SoilState) -> Vec<Indicator> {
    bounds::OPTIMAL_BANDS
        .into_iter()
        .map(|(parameter, optimal)| {
            let value = bounds::reading(soil, parameter);
            Indicator {
                parameter,
                value,
                optimal,
                status: parameter_status(value, optimal),
            }
        })
        .collect()
}

/// Rate the session. Only defined once the crop has reached harvest.
pub fn harvest_rating(state: &GameState) -> Option<HarvestRating> {
    if state.stage != GrowthStage::Harvest {
        return None;
    }
    let rating = match (state.score, state.plant_health) {
        (score, health) if score >= 800 && health >= 85.0 => HarvestRating::Exemplary,
        (score, health) if score >= 600 && health >= 70.0 => HarvestRating::NearMiss,
        (score, health) if score >= 400 && health >= 50.0 => HarvestRating::Mediocre,
        _ => HarvestRating::Failed,
    };
    Some(rating)
}

#[cfg(test)]
mod tests {
    use tuberfield_types::SessionId;

    use super::*;

    #[test]
    fn status_classification() {
        let band = OptimalBand::new(60.0, 80.0);
        assert_eq!(parameter_status(70.0, band), ParameterStatus::Optimal);
        assert_eq!(parameter_status(50.0, band), ParameterStatus::Warning);
        assert_eq!(parameter_status(35.0, band), ParameterStatus::Critical);
        assert_eq!(parameter_status(100.0, band), ParameterStatus::Warning);
        assert_eq!(parameter_status(110.0, band), ParameterStatus::Critical);
    }

    #[test]
    fn health_classification() {
        assert_eq!(health_status(80.0), ParameterStatus::Optimal);
        assert_eq!(health_status(50.0), ParameterStatus::Warning);
        assert_eq!(health_status(49.9), ParameterStatus::Critical);
    }

    #[test]
    fn initial_panel() {
        let panel = soil_indicators(&SoilState::initial());
        assert_eq!(panel.len(), SoilParameter::ALL.len());
        let status_of = |parameter| {
            panel
                .iter()
                .find(|row| row.parameter == parameter)
                .map(|row| row.status)
        };
        // pH 5.2 is above 5.5 * 0.7.
        assert_eq!(status_of(SoilParameter::Ph), Some(ParameterStatus::Warning));
        assert_eq!(status_of(SoilParameter::Humidity), Some(ParameterStatus::Critical));
        assert_eq!(status_of(SoilParameter::Temperature), Some(ParameterStatus::Optimal));
        assert_eq!(status_of(SoilParameter::Nitrogen), Some(ParameterStatus::Critical));
    }

    #[test]
    fn no_rating_before_harvest() {
        let state = GameState::initial(SessionId::new());
        assert_eq!(harvest_rating(&state), None);
    }

    #[test]
    fn rating_tiers_at_harvest() {
        let mut state = GameState::initial(SessionId::new());
        state.stage = GrowthStage::Harvest;

        state.score = 850;
        state.plant_health = 90.0;
        assert_eq!(harvest_rating(&state), Some(HarvestRating::Exemplary));

        state.plant_health = 80.0;
        assert_eq!(harvest_rating(&state), Some(HarvestRating::NearMiss));

        state.score = 450;
        assert_eq!(harvest_rating(&state), Some(HarvestRating::Mediocre));

        state.plant_health = 40.0;
        assert_eq!(harvest_rating(&state), Some(HarvestRating::Failed));
    }
}
