//! Field engine, growth clock, and session orchestration for Tuberfield.
//!
//! This crate sequences the agronomy rules from `tuberfield-soil` into a
//! playable session: a single-writer engine over the game state, a growth
//! clock that moves the crop through its stages, a sky simulator producing
//! rain and day/night events, and an async runner that serializes ticks,
//! sky steps, and player commands.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `tuberfield-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`FieldEngine`]: actions, environmental events, ticks.
//! - [`growth`] -- [`GrowthClock`]: day counters and stage transitions.
//! - [`operator`] -- Pause, resume, speed, stop, and run bounds.
//! - [`runner`] -- The `tokio::select!` session loop and its command
//!   channel.
//! - [`sky`] -- [`SkySimulator`]: day/night and rain generator.
//!
//! [`FieldEngine`]: engine::FieldEngine
//! [`GrowthClock`]: growth::GrowthClock
//! [`SkySimulator`]: sky::SkySimulator

pub mod config;
pub mod engine;
pub mod growth;
pub mod operator;
pub mod runner;
pub mod sky;

pub use config::{ConfigError, TuberfieldConfig};
pub use engine::{ACTION_COOLDOWN_MS, ActionOutcome, FieldEngine, FieldIndicators, TickSummary};
pub use growth::GrowthClock;
pub use operator::{OperatorState, SessionEndReason, SessionStatus};
pub use runner::{
    ActionReply, NoOpCallback, SessionCallback, SessionCommand, SessionError, SessionEvent,
    SessionHandle, SessionResult, run_session,
};
pub use sky::SkySimulator;
