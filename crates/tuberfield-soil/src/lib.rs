//! Agronomy rules for the Tuberfield simulation.
//!
//! Every function here is a rule over plain data from `tuberfield-types`:
//! it mutates a [`SoilState`] (and the water reservoir) or derives a value
//! from it. None of them own state or time; sequencing belongs to the
//! engine in `tuberfield-core`.
//!
//! # Modules
//!
//! - [`bounds`] -- Clamping limits, optimal bands, and parameter readout.
//! - [`noise`] -- The [`NoiseSource`] abstraction over randomness.
//! - [`environment`] -- Weather shifts, per-action jitter, and rain and
//!   day/night events.
//! - [`effects`] -- Soil effect of each player action.
//! - [`decay`] -- Daily evaporation and nutrient uptake.
//! - [`health`] -- Plant health calculation.
//! - [`score`] -- Score calculation.
//! - [`achievements`] -- Sticky milestone tracking.
//! - [`indicators`] -- Indicator panel statuses and harvest rating.
//!
//! [`SoilState`]: tuberfield_types::SoilState

pub mod achievements;
pub mod bounds;
pub mod decay;
pub mod effects;
pub mod environment;
pub mod health;
pub mod indicators;
pub mod noise;
pub mod score;

// Re-export primary items at crate root.
pub use achievements::update_achievements;
pub use bounds::{Limits, OPTIMAL_BANDS, optimal_band, soil_within_limits};
pub use decay::apply_daily_decay;
pub use effects::apply_action_effect;
pub use environment::{apply_environmental_event, apply_jitter, apply_weather_shift, roll_weather_shift};
pub use health::calculate_plant_health;
pub use indicators::{Indicator, harvest_rating, health_status, parameter_status, soil_indicators};
pub use noise::{NoiseSource, RngNoise, StillNoise};
pub use score::calculate_score;
