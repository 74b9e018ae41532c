// AFK record store backed by the `Afk` table

use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

use crate::error::Result;
use crate::models::afk::AfkRecord;
use crate::utils::config::DatabaseConfig;

/// Row as stored. `usr` holds the user id's bits as a signed integer.
#[derive(Debug, FromRow)]
struct AfkRow {
    usr: i64,
    status: Option<String>,
    eta: Option<String>,
    start_timestamp: String,
}

impl From<AfkRow> for AfkRecord {
    fn from(row: AfkRow) -> Self {
        Self {
            user_id: row.usr as u64,
            status: row.status,
            eta: row.eta,
            start_timestamp: row.start_timestamp,
        }
    }
}

// SQLite integers are signed; ids are reinterpreted, not range-checked
fn key(user_id: u64) -> i64 {
    user_id as i64
}

/// Point lookups and deletes over the `Afk` table
///
/// Clones share one pool. Each call is a single statement or a transaction
/// that rolls back when dropped before commit.
#[derive(Debug, Clone)]
pub struct AfkStore {
    pool: SqlitePool,
}

impl AfkStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database described by `config` and make sure the table exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = super::create_pool(config).await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        super::migrate(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetch a user's record. `None` means the user is not AFK.
    pub async fn get(&self, user_id: u64) -> Result<Option<AfkRecord>> {
        let row = sqlx::query_as::<_, AfkRow>(
            "SELECT usr, status, eta, start_timestamp FROM Afk WHERE usr = ?",
        )
        .bind(key(user_id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AfkRecord::from))
    }

    /// Remove a user's record. Returns whether there was one.
    pub async fn delete(&self, user_id: u64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM Afk WHERE usr = ?")
            .bind(key(user_id))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a user's record and hand it back, in one statement
    pub async fn take(&self, user_id: u64) -> Result<Option<AfkRecord>> {
        let taken = self.take_with(user_id, |_| Ok(())).await?;
        Ok(taken.map(|(record, ())| record))
    }

    /// Remove a user's record and run `f` on it before committing.
    ///
    /// If `f` fails the delete is rolled back and the record stays.
    pub async fn take_with<T, F>(&self, user_id: u64, f: F) -> Result<Option<(AfkRecord, T)>>
    where
        F: FnOnce(&AfkRecord) -> Result<T>,
    {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, AfkRow>(
            "DELETE FROM Afk WHERE usr = ? RETURNING usr, status, eta, start_timestamp",
        )
        .bind(key(user_id))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(record) = row.map(AfkRecord::from) else {
            return Ok(None);
        };
        let value = f(&record)?;
        tx.commit().await?;

        Ok(Some((record, value)))
    }

    /// Store a new record. Existing records are left untouched and `false`
    /// is returned.
    pub async fn insert(&self, record: &AfkRecord) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO Afk (usr, status, eta, start_timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(key(record.user_id))
        .bind(record.status.as_deref())
        .bind(record.eta.as_deref())
        .bind(record.start_timestamp.as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected() == 1)
    }
}
