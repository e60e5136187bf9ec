//! Core entity structs for the Tuberfield simulation.
//!
//! [`SoilState`] and [`GameState`] are the engine's aggregate; the remaining
//! types are driver-facing projections and signals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Achievement, GrowthStage};
use crate::ids::SessionId;

// ---------------------------------------------------------------------------
// Soil
// ---------------------------------------------------------------------------

/// Chemical and physical soil readings.
///
/// Every field is kept inside its valid range by the rules in
/// `tuberfield-soil`; this struct itself performs no validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SoilState {
    /// Acidity, 4.0 to 8.0.
    pub ph: f64,
    /// Soil moisture percentage, 0 to 100.
    pub humidity: f64,
    /// Soil temperature in degrees Celsius.
    pub temperature: f64,
    /// Nitrogen in kg/ha, 0 to 150.
    pub nitrogen: f64,
    /// Phosphorus in kg/ha, 0 to 120.
    pub phosphorus: f64,
    /// Potassium in kg/ha, 0 to 180.
    pub potassium: f64,
    /// Organic matter percentage, 0 to 6.
    pub organic_matter: f64,
    /// Electrical conductivity in dS/m, 0 to 3.
    pub electrical_conductivity: f64,
}

impl SoilState {
    /// The degraded starting soil every session begins with.
    pub const fn initial() -> Self {
        Self {
            ph: 5.2,
            humidity: 35.0,
            temperature: 18.0,
            nitrogen: 40.0,
            phosphorus: 25.0,
            potassium: 30.0,
            organic_matter: 1.5,
            electrical_conductivity: 0.8,
        }
    }
}

impl Default for SoilState {
    fn default() -> Self {
        Self::initial()
    }
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Plant health at session start.
pub const INITIAL_PLANT_HEALTH: f64 = 50.0;

/// Water reservoir level at session start.
pub const INITIAL_WATER_LEVEL: f64 = 35.0;

/// Complete, internally consistent snapshot of one session.
///
/// Produced by the engine after every action, environmental event, and
/// tick. `plant_health`, `score`, and `achievements` are derived values;
/// they are recomputed on each mutation and never set directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Identifier of the session that produced this state.
    pub session_id: SessionId,
    /// Current growth stage.
    pub stage: GrowthStage,
    /// Simulated days spent in the current stage.
    pub days_in_stage: u32,
    /// Floored score; may drop after poor play.
    pub score: i64,
    /// Soil readings.
    pub soil: SoilState,
    /// Plant health, 0 to 100.
    pub plant_health: f64,
    /// Water reservoir, 0 to 100, separate from soil humidity.
    pub water_level: f64,
    /// Simulated days since the session started.
    pub days_elapsed: u32,
    /// Achievements unlocked so far in this session.
    pub achievements: BTreeSet<Achievement>,
}

impl GameState {
    /// Build the fixed starting state for a new session.
    pub const fn initial(session_id: SessionId) -> Self {
        Self {
            session_id,
            stage: GrowthStage::Preparation,
            days_in_stage: 0,
            score: 0,
            soil: SoilState::initial(),
            plant_health: INITIAL_PLANT_HEALTH,
            water_level: INITIAL_WATER_LEVEL,
            days_elapsed: 0,
            achievements: BTreeSet::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Rain and day/night signal produced by the driver's sky simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnvironmentalEffects {
    /// Whether it is currently raining.
    pub is_raining: bool,
    /// Whether it is currently daytime.
    pub is_day_time: bool,
}

impl Default for EnvironmentalEffects {
    fn default() -> Self {
        Self {
            is_raining: false,
            is_day_time: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Reference data projections
// ---------------------------------------------------------------------------

/// Closed interval a reading should stay within for the crop to thrive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OptimalBand {
    /// Lower edge, inclusive.
    pub min: f64,
    /// Upper edge, inclusive.
    pub max: f64,
}

impl OptimalBand {
    /// Create a band from its edges.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the band.
    pub const fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Serializable row of the growth-stage reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StageInfo {
    /// 0-based position in the sequence.
    pub index: u8,
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Duration in simulated days.
    pub duration_days: u32,
    /// Player guidance.
    pub description: String,
}

impl From<GrowthStage> for StageInfo {
    fn from(stage: GrowthStage) -> Self {
        Self {
            index: stage.index(),
            id: stage.id().to_owned(),
            name: stage.name().to_owned(),
            duration_days: stage.duration_days(),
            description: stage.description().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_starting_field() {
        let state = GameState::initial(SessionId::new());
        assert_eq!(state.stage, GrowthStage::Preparation);
        assert_eq!(state.days_in_stage, 0);
        assert_eq!(state.days_elapsed, 0);
        assert_eq!(state.score, 0);
        assert!(state.achievements.is_empty());
        assert!((state.plant_health - 50.0).abs() < f64::EPSILON);
        assert!((state.water_level - 35.0).abs() < f64::EPSILON);
        assert!((state.soil.ph - 5.2).abs() < f64::EPSILON);
        assert!((state.soil.organic_matter - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let band = OptimalBand::new(5.5, 6.5);
        assert!(band.contains(5.5));
        assert!(band.contains(6.5));
        assert!(!band.contains(6.51));
        assert!(!band.contains(5.49));
    }

    #[test]
    fn game_state_serializes_with_snake_case_fields() {
        let state = GameState::initial(SessionId::new());
        let json = serde_json::to_value(&state).unwrap_or_default();
        assert_eq!(json["stage"], "preparation");
        assert_eq!(json["water_level"], 35.0);
        assert_eq!(json["soil"]["organic_matter"], 1.5);
    }

    #[test]
    fn stage_info_projects_reference_data() {
        let info = StageInfo::from(GrowthStage::Vegetative);
        assert_eq!(info.index, 2);
        assert_eq!(info.id, "vegetative");
        assert_eq!(info.duration_days, 30);
    }
}
