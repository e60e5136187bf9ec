//! Session loop runner with operator controls.
//!
//! [`run_session`] is the only task that mutates a [`FieldEngine`]. It
//! multiplexes five sources with `tokio::select!`:
//!
//! - **Day clock**: one [`FieldEngine::tick`] per tick interval. The
//!   interval is read from [`OperatorState`] before each sleep, so speed
//!   changes apply from the next day. Pausing stops only this source.
//! - **Sky**: one [`SkySimulator::step`] per sky step; changed conditions
//!   become environmental events.
//! - **Commands**: player actions, environment overrides, resets, and
//!   snapshot requests from a [`SessionHandle`], each answered on a
//!   oneshot channel.
//! - **Stop**: the operator's stop request.
//! - **Real-time bound**: a deadline derived from `max_real_time_seconds`.
//!
//! Timers are polled ahead of commands, and a day that is already due runs
//! before the next command is taken, so a busy command stream cannot hold
//! the day clock back.
//!
//! Every mutation runs to completion before the next source is polled, so
//! every state a caller observes is consistent. After each mutation the
//! [`SessionCallback`] sees the new state.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tuberfield_types::{EnvironmentalEffects, GameState};

use crate::engine::{ActionOutcome, FieldEngine, FieldIndicators, TickSummary};
use crate::operator::{OperatorState, SessionEndReason};
use crate::sky::SkySimulator;

/// Default capacity of the command channel.
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

const IDLE_SKY_STEP_MS: u64 = 60_000;

/// Errors returned to a [`SessionHandle`] caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session runner is no longer receiving commands.
    #[error("session is closed")]
    Closed,

    /// The session runner dropped the request without replying.
    #[error("session dropped the reply")]
    Dropped,
}

/// A request to the session runner.
#[derive(Debug)]
pub enum SessionCommand {
    /// Apply a player action by identifier.
    Action {
        /// Action identifier, possibly unknown.
        action_id: String,
        /// Receives the outcome and resulting state.
        reply: oneshot::Sender<ActionReply>,
    },
    /// Apply an environmental event directly, bypassing the sky.
    Environment {
        /// The conditions to apply.
        effects: EnvironmentalEffects,
        /// Receives the resulting state.
        reply: oneshot::Sender<GameState>,
    },
    /// Discard the session and start over.
    Reset {
        /// Receives the fresh state.
        reply: oneshot::Sender<GameState>,
    },
    /// Read the current state.
    Snapshot {
        /// Receives the current state.
        reply: oneshot::Sender<GameState>,
    },
    /// Read the dashboard indicators.
    Indicators {
        /// Receives the current indicators.
        reply: oneshot::Sender<FieldIndicators>,
    },
}

/// Reply to [`SessionCommand::Action`].
#[derive(Debug, Clone)]
pub struct ActionReply {
    /// What the engine did.
    pub outcome: ActionOutcome,
    /// State after the action.
    pub state: GameState,
}

/// Cloneable sender side of a session's command channel.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Create a handle and the receiver to pass to [`run_session`].
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SessionCommand>) {
        let (commands, receiver) = mpsc::channel(capacity.max(1));
        (Self { commands }, receiver)
    }

    /// Apply a player action.
    pub async fn apply_action(&self, action_id: &str) -> Result<ActionReply, SessionError> {
        self.request(|reply| SessionCommand::Action {
            action_id: action_id.to_owned(),
            reply,
        })
        .await
    }

    /// Apply an environmental event.
    pub async fn apply_environment(
        &self,
        effects: EnvironmentalEffects,
    ) -> Result<GameState, SessionError> {
        self.request(|reply| SessionCommand::Environment { effects, reply })
            .await
    }

    /// Reset the session.
    pub async fn reset(&self) -> Result<GameState, SessionError> {
        self.request(|reply| SessionCommand::Reset { reply }).await
    }

    /// Fetch the current state.
    pub async fn snapshot(&self) -> Result<GameState, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Fetch the dashboard indicators.
    pub async fn indicators(&self) -> Result<FieldIndicators, SessionError> {
        self.request(|reply| SessionCommand::Indicators { reply })
            .await
    }

    async fn request<T, F>(&self, build: F) -> Result<T, SessionError>
    where
        F: FnOnce(oneshot::Sender<T>) -> SessionCommand,
    {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_closed| SessionError::Closed)?;
        response.await.map_err(|_dropped| SessionError::Dropped)
    }
}

/// What just happened to the session.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    /// A simulated day passed.
    Ticked(&'a TickSummary),
    /// A player action was applied.
    ActionApplied(&'a ActionOutcome),
    /// An environmental event was applied.
    Environment(EnvironmentalEffects),
    /// The session was reset.
    Reset,
}

/// Callback invoked after each mutation.
///
/// Implementations can use this to update the observer snapshot,
/// broadcast tick summaries, etc.
pub trait SessionCallback: Send {
    /// Called after the engine applied `event`.
    fn on_update(&mut self, event: SessionEvent<'_>, engine: &FieldEngine);
}

/// A no-op callback for testing.
pub struct NoOpCallback;

impl SessionCallback for NoOpCallback {
    fn on_update(&mut self, _event: SessionEvent<'_>, _engine: &FieldEngine) {}
}

/// Result of a session run.
#[derive(Debug)]
pub struct SessionResult {
    /// The reason the run ended.
    pub end_reason: SessionEndReason,
    /// Number of ticks executed by this run.
    pub total_ticks: u64,
    /// State when the run ended.
    pub final_state: GameState,
}

/// Run the session loop until a termination condition is met.
///
/// # Arguments
///
/// * `engine` - The engine to drive; this task is its only writer
/// * `sky` - Optional sky simulator feeding environmental events
/// * `commands` - Receiver created by [`SessionHandle::channel`]
/// * `operator` - Shared operator control state
/// * `callback` - Called after every mutation
pub async fn run_session(
    engine: &mut FieldEngine,
    mut sky: Option<SkySimulator>,
    mut commands: mpsc::Receiver<SessionCommand>,
    operator: &Arc<OperatorState>,
    callback: &mut dyn SessionCallback,
) -> SessionResult {
    let mut total_ticks: u64 = 0;

    info!(
        session_id = %engine.state().session_id,
        max_days = operator.max_days(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        sky_enabled = sky.is_some(),
        "Session starting"
    );

    // The period is irrelevant without a sky: the branch is disabled.
    let sky_period = Duration::from_millis(
        sky.as_ref()
            .map_or(IDLE_SKY_STEP_MS, SkySimulator::step_interval_ms)
            .max(1),
    );
    let mut sky_timer = tokio::time::interval_at(Instant::now() + sky_period, sky_period);
    sky_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let time_limit = real_time_deadline(operator);
    let mut next_tick = tick_deadline(operator);

    let end_reason = loop {
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            break SessionEndReason::OperatorStop;
        }
        if operator.time_limit_reached() {
            log_time_limit(operator);
            break SessionEndReason::MaxRealTimeReached;
        }

        let paused = operator.is_paused();

        // A day that is already due goes before any queued command.
        if !paused && Instant::now() >= next_tick {
            if let Some(reason) = run_day(engine, operator, callback, &mut total_ticks) {
                break reason;
            }
            next_tick = tick_deadline(operator);
            continue;
        }

        tokio::select! {
            biased;

            () = operator.stopped() => {}

            () = sleep_until_limit(time_limit) => {
                log_time_limit(operator);
                break SessionEndReason::MaxRealTimeReached;
            }

            () = tokio::time::sleep_until(next_tick), if !paused => {
                if let Some(reason) = run_day(engine, operator, callback, &mut total_ticks) {
                    break reason;
                }
                next_tick = tick_deadline(operator);
            }

            _ = sky_timer.tick(), if sky.is_some() => {
                if let Some(effects) = sky.as_mut().and_then(SkySimulator::step) {
                    let _ = engine.apply_environmental_event(effects);
                    callback.on_update(SessionEvent::Environment(effects), engine);
                }
            }

            command = commands.recv() => {
                let Some(command) = command else {
                    info!("All session handles dropped");
                    break SessionEndReason::CommandChannelClosed;
                };
                handle_command(engine, command, operator, callback);
            }

            () = operator.wait_if_paused(), if paused => {
                info!("Day clock resumed");
                next_tick = tick_deadline(operator);
            }
        }
    };

    operator.set_end_reason(end_reason).await;
    SessionResult {
        end_reason,
        total_ticks,
        final_state: engine.snapshot(),
    }
}

fn tick_deadline(operator: &OperatorState) -> Instant {
    Instant::now() + Duration::from_millis(operator.tick_interval_ms())
}

/// When the real-time bound expires, or `None` when it is unlimited.
fn real_time_deadline(operator: &OperatorState) -> Option<Instant> {
    let limit = operator.max_real_time_seconds();
    if limit == 0 {
        return None;
    }
    let remaining = limit.saturating_sub(operator.elapsed_seconds());
    Instant::now().checked_add(Duration::from_secs(remaining))
}

async fn sleep_until_limit(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn log_time_limit(operator: &OperatorState) {
    info!(
        max_seconds = operator.max_real_time_seconds(),
        elapsed = operator.elapsed_seconds(),
        "Real-time limit reached"
    );
}

/// Advance one day. Returns the end reason if the day bound was hit.
fn run_day(
    engine: &mut FieldEngine,
    operator: &OperatorState,
    callback: &mut dyn SessionCallback,
    total_ticks: &mut u64,
) -> Option<SessionEndReason> {
    let summary = engine.tick();
    *total_ticks = total_ticks.saturating_add(1);
    callback.on_update(SessionEvent::Ticked(&summary), engine);

    if operator.day_limit_reached(summary.day) {
        info!(
            day = summary.day,
            max_days = operator.max_days(),
            "Day limit reached"
        );
        return Some(SessionEndReason::MaxDaysReached);
    }
    None
}

fn handle_command(
    engine: &mut FieldEngine,
    command: SessionCommand,
    operator: &OperatorState,
    callback: &mut dyn SessionCallback,
) {
    match command {
        SessionCommand::Action { action_id, reply } => {
            let outcome = engine.apply_action(&action_id);
            operator.mark_action();
            callback.on_update(SessionEvent::ActionApplied(&outcome), engine);
            let _ = reply.send(ActionReply {
                outcome,
                state: engine.snapshot(),
            });
        }
        SessionCommand::Environment { effects, reply } => {
            let _ = engine.apply_environmental_event(effects);
            callback.on_update(SessionEvent::Environment(effects), engine);
            let _ = reply.send(engine.snapshot());
        }
        SessionCommand::Reset { reply } => {
            engine.reset();
            callback.on_update(SessionEvent::Reset, engine);
            let _ = reply.send(engine.snapshot());
        }
        SessionCommand::Snapshot { reply } => {
            debug!("Snapshot requested");
            let _ = reply.send(engine.snapshot());
        }
        SessionCommand::Indicators { reply } => {
            let _ = reply.send(engine.indicators());
        }
    }
}

/// Log the session end sequence.
pub fn log_session_end(result: &SessionResult) {
    let state = &result.final_state;
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        session_id = %state.session_id,
        day = state.days_elapsed,
        stage = state.stage.id(),
        score = state.score,
        plant_health = state.plant_health,
        "Session ended"
    );

    if let Some(rating) = tuberfield_soil::harvest_rating(state) {
        info!(rating = ?rating, "Harvest rated");
    } else if result.total_ticks == 0 {
        warn!("Session ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tuberfield_soil::StillNoise;

    use super::*;
    use crate::config::SessionBoundsConfig;

    fn bounded(max_days: u32) -> Arc<OperatorState> {
        let bounds = SessionBoundsConfig {
            max_days,
            max_real_time_seconds: 0,
        };
        Arc::new(OperatorState::new(100, &bounds))
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_by_max_days() {
        let mut engine = FieldEngine::new(Box::new(StillNoise));
        let (_handle, commands) = SessionHandle::channel(8);
        let operator = bounded(5);
        let mut cb = NoOpCallback;

        let result = run_session(&mut engine, None, commands, &operator, &mut cb).await;

        assert_eq!(result.end_reason, SessionEndReason::MaxDaysReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_state.days_elapsed, 5);
        assert_eq!(operator.end_reason().await, Some(SessionEndReason::MaxDaysReached));
    }

    #[tokio::test(start_paused = true)]
    async fn operator_stop_before_first_tick() {
        let mut engine = FieldEngine::new(Box::new(StillNoise));
        let (_handle, commands) = SessionHandle::channel(8);
        let operator = bounded(0);
        operator.request_stop();
        let mut cb = NoOpCallback;

        let result = run_session(&mut engine, None, commands, &operator, &mut cb).await;

        assert_eq!(result.end_reason, SessionEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_every_handle_ends_the_session() {
        let mut engine = FieldEngine::new(Box::new(StillNoise));
        let (handle, commands) = SessionHandle::channel(8);
        drop(handle);
        let operator = bounded(0);
        let mut cb = NoOpCallback;

        let result = run_session(&mut engine, None, commands, &operator, &mut cb).await;

        assert_eq!(result.end_reason, SessionEndReason::CommandChannelClosed);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_sees_every_tick() {
        struct CountCallback {
            ticks: u32,
        }
        impl SessionCallback for CountCallback {
            fn on_update(&mut self, event: SessionEvent<'_>, _engine: &FieldEngine) {
                if matches!(event, SessionEvent::Ticked(_)) {
                    self.ticks = self.ticks.saturating_add(1);
                }
            }
        }

        let mut engine = FieldEngine::new(Box::new(StillNoise));
        let (_handle, commands) = SessionHandle::channel(8);
        let operator = bounded(3);
        let mut cb = CountCallback { ticks: 0 };

        let _ = run_session(&mut engine, None, commands, &operator, &mut cb).await;

        assert_eq!(cb.ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn real_time_bound_ends_an_idle_session() {
        let mut engine = FieldEngine::new(Box::new(StillNoise));
        let (_handle, commands) = SessionHandle::channel(8);
        let bounds = SessionBoundsConfig {
            max_days: 0,
            max_real_time_seconds: 5,
        };
        let operator = Arc::new(OperatorState::new(100, &bounds));
        // Nothing else can wake the loop: no day clock, no sky, no commands.
        operator.pause();
        let mut cb = NoOpCallback;

        let started = Instant::now();
        let result = run_session(&mut engine, None, commands, &operator, &mut cb).await;

        assert_eq!(result.end_reason, SessionEndReason::MaxRealTimeReached);
        assert_eq!(result.total_ticks, 0);
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[test]
    fn unlimited_session_has_no_deadline() {
        assert!(real_time_deadline(&bounded(0)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn due_day_runs_before_queued_commands() {
        let engine = FieldEngine::new(Box::new(StillNoise));
        let (handle, commands) = SessionHandle::channel(16);
        let operator = bounded(1);

        let runner = {
            let operator = Arc::clone(&operator);
            tokio::spawn(async move {
                let mut engine = engine;
                let mut cb = NoOpCallback;
                run_session(&mut engine, None, commands, &operator, &mut cb).await
            })
        };
        // Let the runner settle on its first deadline.
        tokio::task::yield_now().await;

        let mut replies = Vec::new();
        for _ in 0..8 {
            let (reply, response) = oneshot::channel();
            let _ = handle.commands.try_send(SessionCommand::Action {
                action_id: "water".to_owned(),
                reply,
            });
            replies.push(response);
        }
        tokio::time::advance(Duration::from_millis(150)).await;

        let result = runner.await.unwrap();
        assert_eq!(result.end_reason, SessionEndReason::MaxDaysReached);
        assert_eq!(result.total_ticks, 1);
        // At most the command already in hand was applied before the day.
        assert!(result.final_state.water_level <= 51.0 + 1e-9);
        let answered = replies
            .iter_mut()
            .map(oneshot::Receiver::try_recv)
            .filter(Result::is_ok)
            .count();
        assert!(answered <= 1);
    }

    #[tokio::test]
    async fn closed_session_rejects_requests() {
        let (handle, commands) = SessionHandle::channel(1);
        drop(commands);
        assert_eq!(handle.snapshot().await.unwrap_err(), SessionError::Closed);
    }
}
