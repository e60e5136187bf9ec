//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for field updates, the
//! in-memory [`FieldSnapshot`] that the read endpoints serve, and the
//! handles used to reach the running session: a [`SessionHandle`] for
//! mutations and the shared [`OperatorState`] for runtime control.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use tuberfield_core::{FieldEngine, FieldIndicators, OperatorState, SessionHandle};
use tuberfield_types::{Achievement, EnvironmentalEffects, GameState, GrowthStage, SessionId};

use crate::error::ObserverError;

/// Capacity of the broadcast channel for field updates.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// What caused a [`TickBroadcast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// A simulated day passed.
    Tick,
    /// A player action was applied.
    Action,
    /// Rain or the day/night swing was applied.
    Environment,
    /// The session started over.
    Reset,
    /// The current state, sent when a client connects.
    Snapshot,
}

/// JSON-serializable field update pushed over the `WebSocket`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickBroadcast {
    /// What caused this update.
    pub kind: UpdateKind,
    /// Session the update belongs to.
    pub session_id: SessionId,
    /// Days elapsed.
    pub day: u32,
    /// Current growth stage.
    pub stage: GrowthStage,
    /// 0-based position of `stage` in the growth sequence.
    pub stage_index: u8,
    /// Days spent in the current stage.
    pub days_in_stage: u32,
    /// Plant health after the update.
    pub plant_health: f64,
    /// Water reservoir after the update.
    pub water_level: f64,
    /// Score after the update.
    pub score: i64,
    /// Sky conditions last applied.
    pub effects: EnvironmentalEffects,
    /// Achievements unlocked by this update.
    pub unlocked: Vec<Achievement>,
}

impl TickBroadcast {
    /// Project a state into a broadcast message.
    pub fn from_state(
        kind: UpdateKind,
        state: &GameState,
        effects: EnvironmentalEffects,
        unlocked: Vec<Achievement>,
    ) -> Self {
        Self {
            kind,
            session_id: state.session_id,
            day: state.days_elapsed,
            stage: state.stage,
            stage_index: state.stage.index(),
            days_in_stage: state.days_in_stage,
            plant_health: state.plant_health,
            water_level: state.water_level,
            score: state.score,
            effects,
            unlocked,
        }
    }
}

/// In-memory snapshot of the field served by the read endpoints.
///
/// Replaced after every mutation by the session callback. Backs the status
/// page, the `WebSocket` greeting, and reads once no session is running.
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    /// The latest game state.
    pub state: GameState,
    /// Dashboard indicators for [`Self::state`].
    pub indicators: FieldIndicators,
    /// Sky conditions last applied to the field.
    pub effects: EnvironmentalEffects,
    /// Number of updates applied since the snapshot was first captured.
    pub updates: u64,
    /// When the snapshot last changed.
    pub updated_at: DateTime<Utc>,
}

impl FieldSnapshot {
    /// Capture the engine's current state and indicators.
    pub fn capture(engine: &FieldEngine, effects: EnvironmentalEffects) -> Self {
        Self {
            state: engine.snapshot(),
            indicators: engine.indicators(),
            effects,
            updates: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for field update messages.
    pub tx: broadcast::Sender<TickBroadcast>,
    /// The current field snapshot (updated after every mutation).
    pub snapshot: Arc<RwLock<FieldSnapshot>>,
    /// Command handle of the running session, if one is attached.
    pub session: Option<SessionHandle>,
    /// Shared operator control state, if a session is attached.
    pub operator_state: Option<Arc<OperatorState>>,
}

impl AppState {
    /// Create an application state with no session attached.
    pub fn new(snapshot: FieldSnapshot) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(snapshot)),
            session: None,
            operator_state: None,
        }
    }

    /// Create an application state wired to a running session.
    pub fn with_session(
        snapshot: FieldSnapshot,
        session: SessionHandle,
        operator: Arc<OperatorState>,
    ) -> Self {
        Self {
            session: Some(session),
            operator_state: Some(operator),
            ..Self::new(snapshot)
        }
    }

    /// Subscribe to the update broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.tx.subscribe()
    }

    /// Publish an update to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, update: &TickBroadcast) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(update.clone()).unwrap_or(0)
    }

    /// The current game state.
    ///
    /// Asks the running session when one is attached, so a snapshot
    /// update skipped under lock contention is never served. Falls back
    /// to the cached snapshot once the session has ended or when none is
    /// attached.
    pub async fn current_state(&self) -> GameState {
        if let Some(session) = &self.session
            && let Ok(state) = session.snapshot().await
        {
            return state;
        }
        self.snapshot.read().await.state.clone()
    }

    /// The current dashboard indicators, resolved like [`Self::current_state`].
    pub async fn current_indicators(&self) -> FieldIndicators {
        if let Some(session) = &self.session
            && let Ok(indicators) = session.indicators().await
        {
            return indicators;
        }
        self.snapshot.read().await.indicators.clone()
    }

    /// The attached session handle.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Unavailable`] when no session is attached.
    pub fn session(&self) -> Result<&SessionHandle, ObserverError> {
        self.session
            .as_ref()
            .ok_or_else(|| ObserverError::Unavailable("no session attached".to_owned()))
    }

    /// The attached operator state.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Unavailable`] when no session is attached.
    pub fn operator(&self) -> Result<&Arc<OperatorState>, ObserverError> {
        self.operator_state
            .as_ref()
            .ok_or_else(|| ObserverError::Unavailable("operator state not available".to_owned()))
    }
}
