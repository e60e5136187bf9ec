//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/ticks` -- `WebSocket` field update stream
/// - `GET /api/state` -- current game state
/// - `GET /api/stages` -- growth-stage reference table
/// - `GET /api/indicators` -- dashboard indicators
/// - `POST /api/actions` -- apply a player action
/// - `POST /api/environment` -- apply rain or the day/night swing
/// - `/api/operator/*` -- runtime session control
///
/// Unknown routes answer with a JSON 404. CORS allows any origin so a
/// locally served front end can reach the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/ticks", get(ws::ws_ticks))
        // Field API
        .route("/api/state", get(handlers::get_state))
        .route("/api/stages", get(handlers::list_stages))
        .route("/api/indicators", get(handlers::get_indicators))
        .route("/api/actions", post(handlers::apply_action))
        .route("/api/environment", post(handlers::apply_environment))
        // Operator API
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/speed", post(operator::set_speed))
        .route("/api/operator/reset", post(operator::reset))
        .route("/api/operator/stop", post(operator::stop))
        .route("/api/operator/status", get(operator::status))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
