//! Shared type definitions for the Tuberfield simulation.
//!
//! This crate is the single source of truth for the data model shared by
//! the engine, the session runner, and the observer API. Types flow
//! downstream to `TypeScript` via `ts-rs` for the browser front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (session identifiers)
//! - [`enums`] -- Growth stages, actions, weather shifts, achievements,
//!   dashboard statuses
//! - [`structs`] -- Soil and game state, environmental signal, reference
//!   data projections

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Achievement, Action, GrowthStage, HarvestRating, ParameterStatus, ParseActionError,
    SoilParameter, WeatherShift,
};
pub use ids::SessionId;
pub use structs::{
    EnvironmentalEffects, GameState, INITIAL_PLANT_HEALTH, INITIAL_WATER_LEVEL, OptimalBand,
    SoilState, StageInfo,
};
