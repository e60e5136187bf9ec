//! Observer API server for the Tuberfield simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/ticks`) streaming every field update
//!   via [`tokio::sync::broadcast`]
//! - **Field endpoints** for the game state, growth stages, and dashboard
//!   indicators, plus player actions and environmental events
//! - **Operator endpoints** for runtime control (pause, resume, speed,
//!   reset, stop, status)
//! - **Minimal HTML page** (`GET /`) showing day, stage, health, and score
//!
//! # Architecture
//!
//! Reads are served from an in-memory [`FieldSnapshot`] that
//! [`ObserverCallback`] replaces after every mutation, so reads never wait
//! on the session runner. Mutations are sent to the runner through its
//! command channel and answered with the state it produced.
//!
//! [`FieldSnapshot`]: state::FieldSnapshot
//! [`ObserverCallback`]: callback::ObserverCallback

pub mod callback;
pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use callback::ObserverCallback;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::spawn_observer;
pub use state::{AppState, FieldSnapshot, TickBroadcast, UpdateKind};
