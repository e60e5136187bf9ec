//! Session callback that feeds the Observer API state.
//!
//! After each mutation, [`ObserverCallback`] replaces the in-memory
//! [`FieldSnapshot`](crate::state::FieldSnapshot) and broadcasts a
//! [`TickBroadcast`] to all connected `WebSocket` clients.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use tuberfield_core::{FieldEngine, SessionCallback, SessionEvent};
use tuberfield_types::{Achievement, EnvironmentalEffects};

use crate::state::{AppState, TickBroadcast, UpdateKind};

/// Callback that bridges the session runner to the Observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
    effects: EnvironmentalEffects,
    skipped: u64,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            effects: EnvironmentalEffects {
                is_raining: false,
                is_day_time: true,
            },
            skipped: 0,
        }
    }

    /// Number of snapshot updates skipped because the lock was busy.
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl SessionCallback for ObserverCallback {
    fn on_update(&mut self, event: SessionEvent<'_>, engine: &FieldEngine) {
        let (kind, unlocked): (UpdateKind, Vec<Achievement>) = match event {
            SessionEvent::Ticked(summary) => (UpdateKind::Tick, summary.unlocked.clone()),
            SessionEvent::ActionApplied(outcome) => {
                (UpdateKind::Action, outcome.unlocked.clone())
            }
            SessionEvent::Environment(effects) => {
                self.effects = effects;
                (UpdateKind::Environment, Vec::new())
            }
            // The sky keeps its phase across a reset.
            SessionEvent::Reset => (UpdateKind::Reset, Vec::new()),
        };

        let update = TickBroadcast::from_state(kind, engine.state(), self.effects, unlocked);
        let receivers = self.state.broadcast(&update);
        debug!(kind = ?kind, day = update.day, receivers, "Field update broadcast");

        // Never block the session loop on a reader. State and indicator
        // reads go to the runner; the cache only backs the page, the
        // WebSocket greeting, and reads after the session ends.
        let Ok(mut snap) = self.state.snapshot.try_write() else {
            self.skipped = self.skipped.saturating_add(1);
            debug!(skipped = self.skipped, "Snapshot busy, update skipped");
            return;
        };
        snap.state = engine.snapshot();
        snap.indicators = engine.indicators();
        snap.effects = self.effects;
        snap.updates = snap.updates.saturating_add(1);
        snap.updated_at = Utc::now();
    }
}
