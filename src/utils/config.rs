// Centralized configuration for the AFK bot core
// Values come from the environment (and `.env` via dotenvy)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.sqlite";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOG_FILE: &str = "afkbot.log";
pub const DEFAULT_LOG_FILTER: &str = "afkbot=debug";

/// SQLite connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Where and how much to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = match lookup("AFKBOT_DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("AFKBOT_DB_MAX_CONNECTIONS must be a positive integer, got {v:?}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let busy_timeout_ms = match lookup("AFKBOT_DB_BUSY_TIMEOUT_MS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("AFKBOT_DB_BUSY_TIMEOUT_MS must be milliseconds, got {v:?}"))?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            database: DatabaseConfig {
                url: lookup("AFKBOT_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections,
                busy_timeout: Duration::from_millis(busy_timeout_ms),
            },
            log: LogConfig {
                dir: lookup("AFKBOT_LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
                file_name: lookup("AFKBOT_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
                filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            },
        })
    }
}
