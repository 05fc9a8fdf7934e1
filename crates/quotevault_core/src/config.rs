//! Runtime configuration for the composition root.
//!
//! # Responsibility
//! - Collect database path, logging and rotation settings in one value.
//! - Read overrides from `QUOTEVAULT_*` environment variables.
//!
//! # Invariants
//! - Missing variables fall back to defaults; malformed ones are errors.

use crate::db::DEFAULT_DB_FILE;
use crate::logging::{LogLevel, LoggingError};
use crate::service::rotation::RotationPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "QUOTEVAULT_DB";
pub const ENV_LOG_LEVEL: &str = "QUOTEVAULT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QUOTEVAULT_LOG_DIR";
pub const ENV_ROTATION: &str = "QUOTEVAULT_ROTATION";

#[derive(Debug)]
pub enum ConfigError {
    LogLevel(LoggingError),
    RotationPolicy(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LogLevel(err) => write!(f, "{ENV_LOG_LEVEL}: {err}"),
            Self::RotationPolicy(value) => write!(
                f,
                "{ENV_ROTATION}: unsupported policy `{value}`; expected reshuffle|keep"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LogLevel(err) => Some(err),
            Self::RotationPolicy(_) => None,
        }
    }
}

/// Settings consumed by front-ends when wiring store, rotation and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub rotation_policy: RotationPolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: LogLevel::build_default(),
            log_dir: None,
            rotation_policy: RotationPolicy::default(),
        }
    }
}

impl VaultConfig {
    /// Builds a config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = LogLevel::parse(&level).map_err(ConfigError::LogLevel)?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(policy) = read(ENV_ROTATION) {
            config.rotation_policy = parse_rotation_policy(&policy)?;
        }

        Ok(config)
    }
}

fn parse_rotation_policy(value: &str) -> Result<RotationPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reshuffle" | "reshuffle_on_wrap" => Ok(RotationPolicy::ReshuffleOnWrap),
        "keep" | "keep_order" => Ok(RotationPolicy::KeepOrder),
        other => Err(ConfigError::RotationPolicy(other.to_string())),
    }
}
