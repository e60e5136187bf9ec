//! Configuration loading and typed config structures for Tuberfield.
//!
//! The canonical configuration lives in `tuberfield-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and a loader that reads the file. Every field has a
//! default, so partial or empty files are valid.
//!
//! Agronomic thresholds are fixed rules of the game and are not
//! configurable.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Environment variable overriding [`SessionConfig::seed`].
pub const SEED_ENV: &str = "TUBERFIELD_SEED";

/// Environment variable overriding [`ObserverConfig::port`].
pub const OBSERVER_PORT_ENV: &str = "TUBERFIELD_OBSERVER_PORT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `tuberfield-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TuberfieldConfig {
    /// Session pacing and randomness.
    #[serde(default)]
    pub session: SessionConfig,

    /// Day/night and rain generator.
    #[serde(default)]
    pub sky: SkyConfig,

    /// Observer HTTP server.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// When an unattended session ends.
    #[serde(default)]
    pub bounds: SessionBoundsConfig,
}

impl TuberfieldConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TUBERFIELD_SEED` overrides `session.seed`
    /// - `TUBERFIELD_OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults (plus
    /// environment overrides) when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        warn!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Does not consult the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.sky.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse() {
                Ok(seed) => self.session.seed = seed,
                Err(_) => warn!(key = SEED_ENV, value = %raw, "Ignoring invalid override"),
            }
        }
        if let Some(raw) = lookup(OBSERVER_PORT_ENV) {
            match raw.trim().parse() {
                Ok(port) => self.observer.port = port,
                Err(_) => warn!(key = OBSERVER_PORT_ENV, value = %raw, "Ignoring invalid override"),
            }
        }
    }
}

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Human-readable session name.
    #[serde(default = "default_session_name")]
    pub name: String,

    /// Random seed for weather shifts, jitter, and the sky simulator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per simulated day.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Sky simulator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkyConfig {
    /// Whether the sky simulator runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Real-time milliseconds per sky step.
    #[serde(default = "default_sky_step_ms")]
    pub step_ms: u64,

    /// Steps between day/night flips.
    #[serde(default = "default_half_day_steps")]
    pub half_day_steps: u32,

    /// Probability that a rain check starts rain.
    #[serde(default = "default_rain_chance")]
    pub rain_chance: f64,

    /// Fewest steps between rain checks.
    #[serde(default = "default_rain_check_min_steps")]
    pub rain_check_min_steps: u32,

    /// Most steps between rain checks.
    #[serde(default = "default_rain_check_max_steps")]
    pub rain_check_max_steps: u32,

    /// Shortest shower in steps.
    #[serde(default = "default_rain_min_steps")]
    pub rain_min_steps: u32,

    /// Longest shower in steps.
    #[serde(default = "default_rain_max_steps")]
    pub rain_max_steps: u32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step_ms: default_sky_step_ms(),
            half_day_steps: default_half_day_steps(),
            rain_chance: default_rain_chance(),
            rain_check_min_steps: default_rain_check_min_steps(),
            rain_check_max_steps: default_rain_check_max_steps(),
            rain_min_steps: default_rain_min_steps(),
            rain_max_steps: default_rain_max_steps(),
        }
    }
}

impl SkyConfig {
    /// Check the values serde cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `rain_chance` is not a finite
    /// probability.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.rain_chance) {
            return Err(ConfigError::Invalid {
                field: "sky.rain_chance",
                reason: format!("{} is not a probability in [0, 1]", self.rain_chance),
            });
        }
        Ok(())
    }
}

/// Observer server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Interface to bind.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per event instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Session boundary configuration.
///
/// A value of 0 for either field means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionBoundsConfig {
    /// Maximum simulated days before the session ends (0 = unlimited).
    #[serde(default)]
    pub max_days: u32,

    /// Maximum wall-clock seconds before the session ends (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_session_name() -> String {
    "Degraded Plot".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    3_000
}

const fn default_sky_step_ms() -> u64 {
    1_000
}

const fn default_half_day_steps() -> u32 {
    5
}

const fn default_rain_chance() -> f64 {
    0.3
}

const fn default_rain_check_min_steps() -> u32 {
    15
}

const fn default_rain_check_max_steps() -> u32 {
    30
}

const fn default_rain_min_steps() -> u32 {
    3
}

const fn default_rain_max_steps() -> u32 {
    7
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TuberfieldConfig::default();
        assert_eq!(config.session.seed, 42);
        assert_eq!(config.session.tick_interval_ms, 3000);
        assert!(config.sky.enabled);
        assert_eq!(config.sky.half_day_steps, 5);
        assert_eq!(config.observer.port, 8080);
        assert_eq!(config.bounds.max_days, 0);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
session:
  name: "North Field"
  seed: 7
  tick_interval_ms: 500

sky:
  enabled: false
  step_ms: 250
  half_day_steps: 3
  rain_chance: 0.5
  rain_check_min_steps: 4
  rain_check_max_steps: 8
  rain_min_steps: 1
  rain_max_steps: 2

observer:
  host: "127.0.0.1"
  port: 9090

logging:
  level: "debug"
  json: true

bounds:
  max_days: 115
  max_real_time_seconds: 600
"#;

        let config = TuberfieldConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.session.name, "North Field");
        assert_eq!(config.session.seed, 7);
        assert_eq!(config.session.tick_interval_ms, 500);
        assert!(!config.sky.enabled);
        assert_eq!(config.sky.rain_check_max_steps, 8);
        assert!((config.sky.rain_chance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.observer.host, "127.0.0.1");
        assert_eq!(config.observer.port, 9090);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.bounds.max_days, 115);
        assert_eq!(config.bounds.max_real_time_seconds, 600);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "session:\n  seed: 9\n";
        let config = TuberfieldConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.session.seed, 9);
        assert_eq!(config.session.tick_interval_ms, 3000);
        assert_eq!(config.sky, SkyConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = TuberfieldConfig::parse("");
        assert_eq!(config.ok(), Some(TuberfieldConfig::default()));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let config = TuberfieldConfig::parse("session: [unterminated");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_seed_and_port() {
        let mut config = TuberfieldConfig::default();
        config.apply_overrides(|key| match key {
            SEED_ENV => Some("1234".to_owned()),
            OBSERVER_PORT_ENV => Some("3001".to_owned()),
            _ => None,
        });
        assert_eq!(config.session.seed, 1234);
        assert_eq!(config.observer.port, 3001);
    }

    #[test]
    fn malformed_overrides_are_ignored() {
        let mut config = TuberfieldConfig::default();
        config.apply_overrides(|key| match key {
            SEED_ENV => Some("not-a-number".to_owned()),
            OBSERVER_PORT_ENV => Some("70000".to_owned()),
            _ => None,
        });
        assert_eq!(config.session.seed, 42);
        assert_eq!(config.observer.port, 8080);
    }

    #[test]
    fn rain_chance_must_be_a_probability() {
        for raw in [".nan", "1.5", "-0.1", ".inf"] {
            let yaml = format!("sky:\n  rain_chance: {raw}\n");
            let result = TuberfieldConfig::parse(&yaml);
            assert!(
                matches!(
                    result,
                    Err(ConfigError::Invalid {
                        field: "sky.rain_chance",
                        ..
                    })
                ),
                "rain_chance {raw} was accepted: {result:?}"
            );
        }

        let edge = TuberfieldConfig::parse("sky:\n  rain_chance: 1.0\n");
        assert!(edge.is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("/nonexistent/tuberfield-config.yaml");
        let config = TuberfieldConfig::load_or_default(path);
        assert!(config.is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tuberfield-config.yaml");
        if path.exists() {
            let config = TuberfieldConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert_eq!(config.ok().map(|c| c.sky), Some(SkyConfig::default()));
        }
    }
}
