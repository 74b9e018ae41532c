// SQLite connection pool and schema

pub mod afk_store;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::utils::config::DatabaseConfig;

pub use afk_store::AfkStore;

/// `reserved` is carried for compatibility with existing databases and never read
pub const CREATE_AFK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Afk (
    usr             INTEGER PRIMARY KEY NOT NULL,
    status          TEXT,
    eta             TEXT,
    reserved        TEXT,
    start_timestamp TEXT NOT NULL
)
"#;

/// Open a long-lived pool for `config.url`
///
/// File databases run in WAL mode so readers never wait on each other or on
/// a writer. In-memory databases are pinned to one connection that is never
/// recycled, otherwise every connection would see its own empty database.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");

    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .busy_timeout(config.busy_timeout);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new();
    pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    debug!(url = %config.url, in_memory, "opening sqlite pool");
    pool_options.connect_with(options).await
}

/// Create the `Afk` table if it does not exist yet
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_AFK_TABLE).execute(pool).await?;
    Ok(())
}
