//! The field engine: the single owner of a session's [`GameState`].
//!
//! Every mutation goes through one of three entry points, and each runs
//! to completion before returning, so the state is always consistent:
//!
//! 1. **Action** ([`FieldEngine::apply_action`]) -- roll a weather shift,
//!    jitter pH and temperature, apply the action's effect, then recompute
//!    plant health, score, and achievements.
//!
//! 2. **Environmental event** ([`FieldEngine::apply_environmental_event`])
//!    -- apply rain or the day/night swing, then recompute the derived
//!    values. Days and stage are untouched.
//!
//! 3. **Tick** ([`FieldEngine::tick`]) -- one simulated day of decay,
//!    derived-value recompute, day counters, stage transition, and a second
//!    score recompute if the stage advanced.
//!
//! The engine owns no thread or timer; callers decide when to tick. All
//! randomness comes from the injected [`NoiseSource`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tuberfield_soil::{Indicator, NoiseSource};
use tuberfield_types::{
    Achievement, Action, EnvironmentalEffects, GameState, GrowthStage, HarvestRating,
    ParameterStatus, SessionId, WeatherShift,
};

use crate::growth::GrowthClock;

/// Advisory pause between player actions, in milliseconds.
///
/// Reported to drivers in every [`ActionOutcome`]; the engine itself never
/// rejects an action for arriving early.
pub const ACTION_COOLDOWN_MS: u64 = 300;

/// Result of one [`FieldEngine::apply_action`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The identifier the caller submitted.
    pub requested: String,
    /// The recognized action, or `None` for an unknown identifier.
    pub action: Option<Action>,
    /// The weather shift that preceded the action, if one was rolled.
    pub weather_shift: Option<WeatherShift>,
    /// Advisory cool-down before the next action.
    pub cooldown_ms: u64,
    /// Achievements unlocked by this action.
    pub unlocked: Vec<Achievement>,
}

/// Result of one [`FieldEngine::tick`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Days elapsed after this tick.
    pub day: u32,
    /// Stage after this tick.
    pub stage: GrowthStage,
    /// Whether this tick moved the crop into a new stage.
    pub stage_advanced: bool,
    /// Plant health after this tick.
    pub plant_health: f64,
    /// Score after this tick.
    pub score: i64,
    /// Achievements unlocked by this tick.
    pub unlocked: Vec<Achievement>,
}

/// Dashboard view of the current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIndicators {
    /// One row per soil parameter.
    pub soil: Vec<Indicator>,
    /// 0-based position of the current stage in the growth sequence.
    pub stage_index: u8,
    /// Classification of plant health.
    pub health_status: ParameterStatus,
    /// Fraction of the current stage completed.
    pub stage_progress: f64,
    /// Days left in the current stage.
    pub days_remaining: u32,
    /// Final rating, present only at harvest.
    pub harvest_rating: Option<HarvestRating>,
}

/// Deterministic-given-noise simulation of one potato field.
pub struct FieldEngine {
    state: GameState,
    noise: Box<dyn NoiseSource>,
}

impl FieldEngine {
    /// Start a new session with the fixed initial field.
    pub fn new(noise: Box<dyn NoiseSource>) -> Self {
        let state = GameState::initial(SessionId::new());
        info!(session_id = %state.session_id, "Session created");
        Self { state, noise }
    }

    /// Discard the current session and start a fresh one.
    pub fn reset(&mut self) {
        let previous = self.state.session_id;
        self.state = GameState::initial(SessionId::new());
        info!(
            previous_session_id = %previous,
            session_id = %self.state.session_id,
            "Session reset"
        );
    }

    /// Read-only view of the current state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Days spent in the current stage.
    pub const fn days_in_stage(&self) -> u32 {
        self.state.days_in_stage
    }

    /// Apply a player action by identifier.
    ///
    /// Unknown identifiers still receive the weather roll and jitter, but
    /// no action effect.
    pub fn apply_action(&mut self, action_id: &str) -> ActionOutcome {
        let parsed = match action_id.parse::<Action>() {
            Ok(action) => Some(action),
            Err(err) => {
                debug!(error = %err, "Unrecognized action, applying weather only");
                None
            }
        };
        self.perform(action_id.to_owned(), parsed)
    }

    /// Apply a typed player action.
    pub fn apply(&mut self, action: Action) -> ActionOutcome {
        self.perform(action.id().to_owned(), Some(action))
    }

    fn perform(&mut self, requested: String, action: Option<Action>) -> ActionOutcome {
        let weather_shift = tuberfield_soil::roll_weather_shift(self.noise.as_mut());
        if let Some(shift) = weather_shift {
            tuberfield_soil::apply_weather_shift(&mut self.state.soil, shift);
        }
        tuberfield_soil::apply_jitter(&mut self.state.soil, self.noise.as_mut());

        if let Some(action) = action {
            tuberfield_soil::apply_action_effect(
                &mut self.state.soil,
                &mut self.state.water_level,
                action,
                self.noise.as_mut(),
            );
        }

        self.recompute_health_and_score();
        let unlocked = tuberfield_soil::update_achievements(&mut self.state);

        debug!(
            requested = %requested,
            action = ?action,
            weather_shift = ?weather_shift,
            plant_health = self.state.plant_health,
            score = self.state.score,
            "Action applied"
        );
        log_unlocked(&unlocked);

        ActionOutcome {
            requested,
            action,
            weather_shift,
            cooldown_ms: ACTION_COOLDOWN_MS,
            unlocked,
        }
    }

    /// Apply a rain or day/night signal from the sky.
    ///
    /// Returns the achievements this event unlocked.
    pub fn apply_environmental_event(&mut self, effects: EnvironmentalEffects) -> Vec<Achievement> {
        tuberfield_soil::apply_environmental_event(
            &mut self.state.soil,
            &mut self.state.water_level,
            effects,
        );
        self.recompute_health_and_score();
        let unlocked = tuberfield_soil::update_achievements(&mut self.state);

        debug!(
            is_raining = effects.is_raining,
            is_day_time = effects.is_day_time,
            temperature = self.state.soil.temperature,
            plant_health = self.state.plant_health,
            score = self.state.score,
            "Environmental event applied"
        );
        log_unlocked(&unlocked);
        unlocked
    }

    /// Advance one simulated day.
    pub fn tick(&mut self) -> TickSummary {
        tuberfield_soil::apply_daily_decay(&mut self.state.soil, &mut self.state.water_level);
        self.recompute_health_and_score();

        let mut clock = GrowthClock::from_state(&self.state);
        let advanced = clock.advance_day();
        clock.store(&mut self.state);

        if let Some(stage) = advanced {
            self.recompute_score();
            info!(
                session_id = %self.state.session_id,
                day = self.state.days_elapsed,
                stage = stage.id(),
                "Growth stage advanced"
            );
        }

        let unlocked = tuberfield_soil::update_achievements(&mut self.state);
        log_unlocked(&unlocked);

        debug!(
            day = self.state.days_elapsed,
            stage = self.state.stage.id(),
            days_in_stage = self.state.days_in_stage,
            plant_health = self.state.plant_health,
            score = self.state.score,
            "Tick complete"
        );

        TickSummary {
            day: self.state.days_elapsed,
            stage: self.state.stage,
            stage_advanced: advanced.is_some(),
            plant_health: self.state.plant_health,
            score: self.state.score,
            unlocked,
        }
    }

    /// Final rating of the session, defined only at harvest.
    pub fn harvest_rating(&self) -> Option<HarvestRating> {
        tuberfield_soil::harvest_rating(&self.state)
    }

    /// Dashboard indicators for the current state.
    pub fn indicators(&self) -> FieldIndicators {
        let clock = GrowthClock::from_state(&self.state);
        FieldIndicators {
            soil: tuberfield_soil::soil_indicators(&self.state.soil),
            stage_index: self.state.stage.index(),
            health_status: tuberfield_soil::health_status(self.state.plant_health),
            stage_progress: clock.progress(),
            days_remaining: clock.days_remaining(),
            harvest_rating: self.harvest_rating(),
        }
    }

    fn recompute_health_and_score(&mut self) {
        self.state.plant_health =
            tuberfield_soil::calculate_plant_health(&self.state.soil, self.state.water_level);
        self.recompute_score();
    }

    fn recompute_score(&mut self) {
        self.state.score = tuberfield_soil::calculate_score(
            &self.state.soil,
            self.state.plant_health,
            self.state.stage,
        );
    }
}

fn log_unlocked(unlocked: &[Achievement]) {
    for achievement in unlocked {
        info!(achievement = achievement.title(), "Achievement unlocked");
    }
}
