//! Growth clock: simulated days and the stage state machine.
//!
//! The clock tracks three counters: the current [`GrowthStage`], the days
//! spent in it, and the days since the session began. It advances once per
//! engine tick.
//!
//! # Transition rule
//!
//! After the day counters are incremented, if `days_in_stage` has reached
//! the stage's duration and the stage is not terminal, the stage advances
//! by exactly one and `days_in_stage` resets to 0. Stages never move
//! backward or skip. [`GrowthStage::Harvest`] is terminal: days keep
//! accumulating there but nothing further happens.

use tuberfield_types::{GameState, GrowthStage};

/// Temporal state of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthClock {
    /// Current growth stage.
    stage: GrowthStage,
    /// Days spent in the current stage.
    days_in_stage: u32,
    /// Days since the session started.
    days_elapsed: u32,
}

impl GrowthClock {
    /// A clock at day 0 of [`GrowthStage::Preparation`].
    pub const fn new() -> Self {
        Self {
            stage: GrowthStage::Preparation,
            days_in_stage: 0,
            days_elapsed: 0,
        }
    }

    /// Read the temporal fields of a game state.
    pub const fn from_state(state: &GameState) -> Self {
        Self {
            stage: state.stage,
            days_in_stage: state.days_in_stage,
            days_elapsed: state.days_elapsed,
        }
    }

    /// Write the temporal fields back into a game state.
    pub const fn store(&self, state: &mut GameState) {
        state.stage = self.stage;
        state.days_in_stage = self.days_in_stage;
        state.days_elapsed = self.days_elapsed;
    }

    /// Advance one simulated day.
    ///
    /// Returns the new stage if this day completed the previous one.
    pub fn advance_day(&mut self) -> Option<GrowthStage> {
        self.days_elapsed = self.days_elapsed.saturating_add(1);
        self.days_in_stage = self.days_in_stage.saturating_add(1);

        if self.days_in_stage < self.stage.duration_days() {
            return None;
        }
        let next = self.stage.next()?;
        self.stage = next;
        self.days_in_stage = 0;
        Some(next)
    }

    /// Current stage.
    pub const fn stage(&self) -> GrowthStage {
        self.stage
    }

    /// Days spent in the current stage.
    pub const fn days_in_stage(&self) -> u32 {
        self.days_in_stage
    }

    /// Days since the session started.
    pub const fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    /// Days left until the current stage completes, 0 once it has.
    pub const fn days_remaining(&self) -> u32 {
        self.stage.duration_days().saturating_sub(self.days_in_stage)
    }

    /// Fraction of the current stage completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let duration = self.stage.duration_days();
        if duration == 0 {
            return 1.0;
        }
        (f64::from(self.days_in_stage) / f64::from(duration)).clamp(0.0, 1.0)
    }

    /// Total days from session start to the start of harvest.
    pub fn days_to_harvest() -> u32 {
        GrowthStage::ALL
            .iter()
            .take_while(|stage| !stage.is_terminal())
            .fold(0_u32, |total, stage| total.saturating_add(stage.duration_days()))
    }
}

impl Default for GrowthClock {
    fn default() -> Self {
        Self::new()
    }
}
