//! Operator REST API handlers for runtime session control.
//!
//! These endpoints give the operator command authority over the session
//! runner: the day clock can be paused, resumed, sped up, or stopped, and
//! the field can be reset to its initial state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/pause` | Pause the day clock |
//! | `POST` | `/api/operator/resume` | Resume the day clock |
//! | `POST` | `/api/operator/speed` | Set tick interval (ms) |
//! | `POST` | `/api/operator/reset` | Start a fresh session |
//! | `POST` | `/api/operator/stop` | End the session |
//! | `GET` | `/api/operator/status` | Current session status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use tracing::{info, warn};
use tuberfield_core::operator::MIN_TICK_INTERVAL_MS;
use tuberfield_core::{ACTION_COOLDOWN_MS, SessionStatus};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/operator/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New tick interval in milliseconds (minimum 100).
    pub tick_interval_ms: u64,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

impl OperatorResponse {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            ok: true,
            message: message.to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// POST /api/operator/pause
// ---------------------------------------------------------------------------

/// Pause the day clock.
///
/// Actions and environmental events are still applied while paused.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.pause();
    info!("Operator paused the day clock");
    Ok(OperatorResponse::ok("Day clock paused"))
}

// ---------------------------------------------------------------------------
// POST /api/operator/resume
// ---------------------------------------------------------------------------

/// Resume the day clock after a pause.
pub async fn resume(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.resume();
    info!("Operator resumed the day clock");
    Ok(OperatorResponse::ok("Day clock resumed"))
}

// ---------------------------------------------------------------------------
// POST /api/operator/speed
// ---------------------------------------------------------------------------

/// Change the tick interval at runtime.
///
/// The day already scheduled keeps its deadline; the new interval applies
/// from the one after.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetSpeedRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ObserverError> {
    let Json(body) = payload?;
    let operator = state.operator()?;

    let Some(prev) = operator.set_tick_interval_ms(body.tick_interval_ms) else {
        warn!(
            requested = body.tick_interval_ms,
            "Rejected tick interval below minimum"
        );
        return Err(ObserverError::InvalidRequest(format!(
            "tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}"
        )));
    };

    info!(
        previous_ms = prev,
        new_ms = body.tick_interval_ms,
        "Operator changed tick interval"
    );
    Ok(Json(serde_json::json!({
        "ok": true,
        "message": format!("Tick interval changed from {}ms to {}ms", prev, body.tick_interval_ms),
        "previous_interval_ms": prev,
        "new_interval_ms": body.tick_interval_ms,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/operator/reset
// ---------------------------------------------------------------------------

/// Discard the current field and start a fresh session.
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    let fresh = state.session()?.reset().await?;
    info!(session_id = %fresh.session_id, "Operator reset the session");
    Ok(Json(fresh))
}

// ---------------------------------------------------------------------------
// POST /api/operator/stop
// ---------------------------------------------------------------------------

/// End the session.
///
/// The runner finishes whatever it is doing and returns. The HTTP server
/// keeps serving the last snapshot.
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.request_stop();
    info!("Operator requested stop");
    Ok(OperatorResponse::ok("Stop requested"))
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Return the current session status.
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state.operator()?;
    let day = state.current_state().await.days_elapsed;

    Ok(Json(SessionStatus {
        day,
        paused: operator.is_paused(),
        stop_requested: operator.is_stop_requested(),
        processing: operator.is_processing(ACTION_COOLDOWN_MS),
        tick_interval_ms: operator.tick_interval_ms(),
        elapsed_seconds: operator.elapsed_seconds(),
        max_days: operator.max_days(),
        max_real_time_seconds: operator.max_real_time_seconds(),
        end_reason: operator.end_reason().await,
        started_at: operator.started_at().to_rfc3339(),
    }))
}
