//! REST API endpoint handlers for the Observer server.
//!
//! State and indicator reads ask the session runner through its
//! [`SessionHandle`], falling back to the in-memory [`FieldSnapshot`] when
//! no session is running. Mutations go to the runner as well and answer
//! with the state it produced.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/state` | Current game state |
//! | `GET` | `/api/stages` | Growth-stage reference table |
//! | `GET` | `/api/indicators` | Parameter statuses, stage progress, rating |
//! | `POST` | `/api/actions` | Apply a player action |
//! | `POST` | `/api/environment` | Apply rain or the day/night swing |
//!
//! [`FieldSnapshot`]: crate::state::FieldSnapshot
//! [`SessionHandle`]: tuberfield_core::SessionHandle

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::Uri;
use axum::response::{Html, IntoResponse};
use tracing::{debug, info};
use tuberfield_core::{ACTION_COOLDOWN_MS, ActionOutcome};
use tuberfield_types::{EnvironmentalEffects, GameState, GrowthStage, StageInfo};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/actions`.
#[derive(Debug, serde::Deserialize)]
pub struct ActionRequest {
    /// Action identifier, e.g. `"water"`. Unknown ids are reported, not
    /// rejected.
    pub action: String,
}

/// Response body for `POST /api/actions`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ActionResponse {
    /// What the engine did.
    pub outcome: ActionOutcome,
    /// State after the action.
    pub state: GameState,
    /// Whether the action arrived inside the previous action's cool-down.
    pub arrived_during_cooldown: bool,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the field and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let field = &snapshot.state;
    let day = field.days_elapsed;
    let stage = field.stage.name();
    let health = field.plant_health;
    let water = field.water_level;
    let score = field.score;
    let sky = match (snapshot.effects.is_day_time, snapshot.effects.is_raining) {
        (true, false) => "Sunny day",
        (true, true) => "Rainy day",
        (false, false) => "Clear night",
        (false, true) => "Rainy night",
    };
    let achievements = field.achievements.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Tuberfield Observer</title>
    <style>
        body {{
            background: #10140f;
            color: #d4d8c8;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #a3c45a; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b8f7e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #181d16;
            border: 1px solid #343b2e;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b8f7e; font-size: 0.85rem; }}
        .metric .value {{ color: #a3c45a; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #a3c45a; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        hr {{ border: none; border-top: 1px solid #343b2e; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Tuberfield Observer</h1>
    <p class="subtitle">Potato field simulation</p>

    <div>
        <div class="metric"><div class="label">Day</div><div class="value">{day}</div></div>
        <div class="metric"><div class="label">Stage</div><div class="value">{stage}</div></div>
        <div class="metric"><div class="label">Health</div><div class="value">{health:.0}</div></div>
        <div class="metric"><div class="label">Water</div><div class="value">{water:.0}</div></div>
        <div class="metric"><div class="label">Score</div><div class="value">{score}</div></div>
        <div class="metric"><div class="label">Sky</div><div class="value">{sky}</div></div>
        <div class="metric"><div class="label">Achievements</div><div class="value">{achievements}</div></div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/state">/api/state</a> -- Current game state</li>
        <li>GET <a href="/api/stages">/api/stages</a> -- Growth stages</li>
        <li>GET <a href="/api/indicators">/api/indicators</a> -- Soil indicators</li>
        <li>GET <a href="/api/operator/status">/api/operator/status</a> -- Session status</li>
        <li>POST /api/actions -- Apply an action</li>
        <li>POST /api/environment -- Apply rain or day/night</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/ticks</code> -- Live field updates</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/state
// ---------------------------------------------------------------------------

/// Return the current game state.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<GameState> {
    Json(state.current_state().await)
}

// ---------------------------------------------------------------------------
// GET /api/stages
// ---------------------------------------------------------------------------

/// Return the growth-stage reference table in order.
pub async fn list_stages() -> impl IntoResponse {
    let stages: Vec<StageInfo> = GrowthStage::ALL.into_iter().map(StageInfo::from).collect();
    Json(serde_json::json!({
        "count": stages.len(),
        "stages": stages,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/indicators
// ---------------------------------------------------------------------------

/// Return per-parameter statuses, stage progress, and the harvest rating.
pub async fn get_indicators(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.current_indicators().await)
}

// ---------------------------------------------------------------------------
// POST /api/actions
// ---------------------------------------------------------------------------

/// Apply a player action.
///
/// The action is applied even inside the cool-down window; the response
/// only reports that it arrived early.
pub async fn apply_action(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ObserverError> {
    let Json(body) = payload?;
    let session = state.session()?;
    let arrived_during_cooldown = state
        .operator_state
        .as_ref()
        .is_some_and(|operator| operator.is_processing(ACTION_COOLDOWN_MS));

    let reply = session.apply_action(&body.action).await?;
    debug!(
        action = %body.action,
        recognized = reply.outcome.action.is_some(),
        arrived_during_cooldown,
        "Action request served"
    );

    Ok(Json(ActionResponse {
        outcome: reply.outcome,
        state: reply.state,
        arrived_during_cooldown,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/environment
// ---------------------------------------------------------------------------

/// Apply rain or the day/night swing directly, bypassing the sky.
pub async fn apply_environment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EnvironmentalEffects>, JsonRejection>,
) -> Result<Json<GameState>, ObserverError> {
    let Json(effects) = payload?;
    let field = state.session()?.apply_environment(effects).await?;
    info!(
        is_raining = effects.is_raining,
        is_day_time = effects.is_day_time,
        "Environmental event applied by request"
    );
    Ok(Json(field))
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// JSON 404 for unknown routes.
pub async fn not_found(uri: Uri) -> ObserverError {
    ObserverError::NotFound(format!("no route for {}", uri.path()))
}
