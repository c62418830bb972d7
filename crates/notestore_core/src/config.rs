//! Store configuration loaded from the process environment.
//!
//! # Responsibility
//! - Resolve the database location, pool size and logging settings.
//! - Reject malformed values up front instead of failing mid-operation.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "NOTESTORE_DB_PATH";
pub const ENV_POOL_SIZE: &str = "NOTESTORE_POOL_SIZE";
pub const ENV_LOG_LEVEL: &str = "NOTESTORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTESTORE_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "notestore.sqlite3";
pub const DEFAULT_POOL_SIZE: u32 = 4;
const MAX_POOL_SIZE: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPoolSize(String),
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPoolSize(value) => write!(
                f,
                "invalid pool size `{value}`; expected an integer in 1..={MAX_POOL_SIZE}"
            ),
            Self::EmptyValue(key) => write!(f, "`{key}` is set but empty"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings for a note store process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub pool_size: u32,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            pool_size: DEFAULT_POOL_SIZE,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Loads settings from `NOTESTORE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup, defaulting unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = non_empty(ENV_DB_PATH, lookup(ENV_DB_PATH))? {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = non_empty(ENV_POOL_SIZE, lookup(ENV_POOL_SIZE))? {
            config.pool_size = parse_pool_size(&value)?;
        }
        if let Some(value) = non_empty(ENV_LOG_LEVEL, lookup(ENV_LOG_LEVEL))? {
            config.log_level = value;
        }
        if let Some(value) = non_empty(ENV_LOG_DIR, lookup(ENV_LOG_DIR))? {
            config.log_dir = Some(PathBuf::from(value));
        }

        Ok(config)
    }
}

/// Parses a pool size in `1..=64`.
pub fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(size) if (1..=MAX_POOL_SIZE).contains(&size) => Ok(size),
        _ => Err(ConfigError::InvalidPoolSize(value.to_string())),
    }
}

fn non_empty(key: &'static str, value: Option<String>) -> Result<Option<String>, ConfigError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key)),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}
