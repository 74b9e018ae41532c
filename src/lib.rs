// AFK Bot core
// AFK status store and elapsed-time formatting used by the bot's command handlers

pub mod database;
pub mod error;
pub mod features;
pub mod models;
pub mod utils;

use anyhow::{Context as _, Result};
use tracing::info;

pub use database::AfkStore;
pub use error::AfkError;
pub use features::afk::AfkService;
pub use models::afk::{AfkRecord, AfkStatus};
pub use utils::config::Config;
pub use utils::logging::{init_logging, Logging};

/// State shared with every command handler
#[derive(Debug, Clone)]
pub struct Data {
    pub afk: AfkService,
    pub config: Config,
}

impl Data {
    /// Set up logging and open the AFK database
    pub async fn init(config: Config) -> Result<Self> {
        let logging = init_logging(&config.log).context("Failed to set up logging")?;

        let store = AfkStore::connect(&config.database)
            .await
            .with_context(|| format!("Failed to open AFK database at {}", config.database.url))?;

        tracing::dispatcher::with_default(logging.dispatch(), || {
            info!(database = %config.database.url, "AFK store ready");
        });

        Ok(Self {
            afk: AfkService::new(store, logging),
            config,
        })
    }

    /// `init` with configuration read from the environment
    pub async fn from_env() -> Result<Self> {
        Self::init(Config::from_env()?).await
    }
}
