//! Sticky achievements unlocked by good field conditions.
//!
//! Conditions are checked after every mutation. Once an achievement enters
//! the session's set it stays there, even if the condition later lapses.

use tuberfield_types::{Achievement, GameState, SoilState};

/// Whether the condition for `achievement` currently holds.
pub fn condition_met(
    achievement: Achievement,
    soil: &SoilState,
    water_level: f64,
    plant_health: f64,
) -> bool {
    match achievement {
        Achievement::SoilMaster => soil.organic_matter >= 3.0,
        Achievement::WaterWise => (60.0..=80.0).contains(&water_level),
        Achievement::BalancedNutrients => {
            soil.nitrogen >= 80.0 && soil.phosphorus >= 60.0 && soil.potassium >= 100.0
        }
        Achievement::HealthyPlant => plant_health >= 80.0,
        Achievement::PhPerfect => (5.5..=6.5).contains(&soil.ph),
    }
}

/// Add every achievement whose condition now holds to the state's set.
///
/// Returns the achievements unlocked by this call, in display order.
pub fn update_achievements(state: &mut GameState) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    for achievement in Achievement::ALL {
        if state.achievements.contains(&achievement) {
            continue;
        }
        if condition_met(achievement, &state.soil, state.water_level, state.plant_health) {
            state.achievements.insert(achievement);
            unlocked.push(achievement);
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use tuberfield_types::SessionId;

    use super::*;

    #[test]
    fn initial_field_has_no_achievements() {
        let mut state = GameState::initial(SessionId::new());
        assert!(update_achievements(&mut state).is_empty());
        assert!(state.achievements.is_empty());
    }

    #[test]
    fn conditions_unlock_matching_achievements() {
        let mut state = GameState::initial(SessionId::new());
        state.soil.organic_matter = 3.0;
        state.water_level = 70.0;
        let unlocked = update_achievements(&mut state);
        assert_eq!(unlocked, vec![Achievement::SoilMaster, Achievement::WaterWise]);
    }

    #[test]
    fn achievements_are_sticky() {
        let mut state = GameState::initial(SessionId::new());
        state.soil.ph = 6.0;
        let _ = update_achievements(&mut state);
        assert!(state.achievements.contains(&Achievement::PhPerfect));

        state.soil.ph = 4.5;
        let unlocked = update_achievements(&mut state);
        assert!(unlocked.is_empty());
        assert!(state.achievements.contains(&Achievement::PhPerfect));
    }

    #[test]
    fn balanced_nutrients_needs_all_three() {
        let soil = SoilState {
            nitrogen: 80.0,
            phosphorus: 60.0,
            potassium: 99.0,
            ..SoilState::initial()
        };
        assert!(!condition_met(Achievement::BalancedNutrients, &soil, 35.0, 50.0));
        let soil = SoilState {
            potassium: 100.0,
            ..soil
        };
        assert!(condition_met(Achievement::BalancedNutrients, &soil, 35.0, 50.0));
    }

    #[test]
    fn healthy_plant_threshold() {
        let soil = SoilState::initial();
        assert!(!condition_met(Achievement::HealthyPlant, &soil, 35.0, 79.9));
        assert!(condition_met(Achievement::HealthyPlant, &soil, 35.0, 80.0));
    }
}
