//! Application configuration management
//!
//! This module loads configuration for the `delphi` binary from environment
//! variables (and a `.env` file, if present). The rule engine itself takes
//! no configuration; everything here is host-side.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_RULES_PATH, ENV_LOG_FORMAT, ENV_RANDOM_SEED, ENV_RULES_PATH,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

/// Rule set configuration
#[derive(Debug, Clone)]
pub struct RulesConfig {
    /// Path of the JSON rule set
    pub path: PathBuf,
    /// Seed for reproducible message picking; random when unset
    pub random_seed: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub rust_log: String,
    pub format: LogFormat,
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue(ENV_LOG_FORMAT.to_string())),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            rules: RulesConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup)?,
        })
    }
}

impl RulesConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self, ConfigError> {
        let random_seed = match lookup(ENV_RANDOM_SEED) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue(ENV_RANDOM_SEED.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            path: PathBuf::from(
                lookup(ENV_RULES_PATH).unwrap_or_else(|| DEFAULT_RULES_PATH.to_string()),
            ),
            random_seed,
        })
    }
}

impl LoggingConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self, ConfigError> {
        Ok(Self {
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format: lookup(ENV_LOG_FORMAT)
                .map(|raw| raw.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
