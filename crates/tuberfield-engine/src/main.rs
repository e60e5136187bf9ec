//! Engine binary for the Tuberfield simulation.
//!
//! This is the main entry point that wires together the field engine, the
//! sky simulator, operator controls, and the observer API. It loads
//! configuration, initializes logging, and runs the session loop until a
//! termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`TUBERFIELD_CONFIG` or `tuberfield-config.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the seeded field engine and sky simulator
//! 4. Create operator state from session bounds
//! 5. Start the observer API server
//! 6. Run the session loop
//! 7. Log the result

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tuberfield_core::config::LoggingConfig;
use tuberfield_core::runner::{self, COMMAND_CHANNEL_CAPACITY};
use tuberfield_core::{FieldEngine, OperatorState, SessionHandle, SkySimulator, TuberfieldConfig};
use tuberfield_observer::{AppState, FieldSnapshot, ObserverCallback};
use tuberfield_soil::RngNoise;
use tuberfield_types::EnvironmentalEffects;

use crate::error::EngineError;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "TUBERFIELD_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
const DEFAULT_CONFIG_PATH: &str = "tuberfield-config.yaml";

/// Mixed into the session seed so the sky draws an independent stream.
const SKY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration loading or observer startup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = TuberfieldConfig::load_or_default(&config_path).map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("tuberfield-engine starting");
    if !config_path.exists() {
        warn!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        session_name = config.session.name,
        seed = config.session.seed,
        tick_interval_ms = config.session.tick_interval_ms,
        sky_enabled = config.sky.enabled,
        "Configuration loaded"
    );

    // 3. Create the engine and the sky.
    let seed = config.session.seed;
    let mut engine = FieldEngine::new(Box::new(RngNoise::new(StdRng::seed_from_u64(seed))));
    let sky = config.sky.enabled.then(|| {
        SkySimulator::new(
            config.sky.clone(),
            Box::new(RngNoise::new(StdRng::seed_from_u64(seed ^ SKY_SEED_SALT))),
        )
    });

    // 4. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.session.tick_interval_ms,
        &config.bounds,
    ));
    info!(
        max_days = operator.max_days(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Operator state initialized"
    );

    // 5. Start the observer API server.
    let (handle, commands) = SessionHandle::channel(COMMAND_CHANNEL_CAPACITY);
    let app_state = Arc::new(AppState::with_session(
        FieldSnapshot::capture(&engine, EnvironmentalEffects::default()),
        handle,
        Arc::clone(&operator),
    ));
    let observer = tuberfield_observer::spawn_observer(&config.observer, Arc::clone(&app_state))
        .await
        .map_err(EngineError::from)?;

    // Ctrl-C ends the session the same way the operator stop endpoint does.
    let signal_operator = Arc::clone(&operator);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            signal_operator.request_stop();
        }
    });

    // 6. Run the session.
    let mut callback = ObserverCallback::new(app_state);
    let result = runner::run_session(&mut engine, sky, commands, &operator, &mut callback).await;

    // 7. Log results.
    runner::log_session_end(&result);
    observer.abort();

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        skipped_snapshots = callback.skipped(),
        "tuberfield-engine shutdown complete"
    );

    Ok(())
}

/// Path of the configuration file, from the environment or the default.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
