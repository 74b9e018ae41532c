// AFK service - what command handlers call to set, check and clear AFK status

use std::sync::Arc;

use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info};

use crate::database::AfkStore;
use crate::error::{AfkError, Result};
use crate::models::afk::{AfkRecord, AfkStatus};
use crate::utils::duration;
use crate::utils::logging::Logging;
use crate::utils::time::{Clock, SystemClock};

/// Shared AFK handle: a store, a clock and a logging handle
#[derive(Clone)]
pub struct AfkService {
    store: AfkStore,
    clock: Arc<dyn Clock>,
    logging: Logging,
}

// Manual Debug impl since the clock is a trait object
impl std::fmt::Debug for AfkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfkService")
            .field("store", &self.store)
            .field("clock", &"dyn Clock")
            .field("logging", &self.logging)
            .finish()
    }
}

impl AfkService {
    pub fn new(store: AfkStore, logging: Logging) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            logging,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &AfkStore {
        &self.store
    }

    /// Is `user_id` AFK, and if so for how long
    pub async fn check(&self, user_id: u64) -> Result<AfkStatus> {
        self.check_inner(user_id)
            .with_subscriber(self.logging.dispatch().clone())
            .await
    }

    /// Remove `user_id`'s AFK status and return how long they were away
    ///
    /// Fails with `NotAfk` if there was nothing to clear. If the stored start
    /// time cannot be read the record is kept.
    pub async fn clear(&self, user_id: u64) -> Result<String> {
        self.clear_inner(user_id)
            .with_subscriber(self.logging.dispatch().clone())
            .await
    }

    /// Mark `user_id` as AFK starting now. Returns `false` if already AFK.
    pub async fn set(
        &self,
        user_id: u64,
        status: Option<String>,
        eta: Option<String>,
    ) -> Result<bool> {
        self.set_inner(user_id, status, eta)
            .with_subscriber(self.logging.dispatch().clone())
            .await
    }

    async fn check_inner(&self, user_id: u64) -> Result<AfkStatus> {
        debug!(user_id, "AFK status requested");

        let record = self
            .store
            .get(user_id)
            .await
            .inspect_err(|e| error!(user_id, "Error checking AFK status: {}", e))?;

        let Some(record) = record else {
            debug!(user_id, "user is not in the AFK database");
            return Ok(AfkStatus::NotAfk);
        };
        debug!(user_id, "user found in the AFK database");

        let away_for = duration::since(&record.start_timestamp, self.clock.now())
            .inspect_err(|e| error!(user_id, "Error checking AFK status: {}", e))?;

        info!(user_id, %away_for, "AFK status sent");
        Ok(AfkStatus::Afk {
            status: record.status,
            eta: record.eta,
            away_for,
        })
    }

    async fn clear_inner(&self, user_id: u64) -> Result<String> {
        debug!(user_id, "de-AFK requested");

        let now = self.clock.now();
        let taken = self
            .store
            .take_with(user_id, |record| duration::since(&record.start_timestamp, now))
            .await
            .inspect_err(|e| error!(user_id, "Error removing AFK status: {}", e))?;

        match taken {
            Some((_, away_for)) => {
                info!(user_id, %away_for, "user is now marked as not AFK");
                Ok(away_for)
            }
            None => {
                debug!(user_id, "user is not in the AFK database");
                Err(AfkError::NotAfk)
            }
        }
    }

    async fn set_inner(
        &self,
        user_id: u64,
        status: Option<String>,
        eta: Option<String>,
    ) -> Result<bool> {
        let record = AfkRecord::new(user_id, status, eta, self.clock.now());
        let inserted = self
            .store
            .insert(&record)
            .await
            .inspect_err(|e| error!(user_id, "Error setting AFK status: {}", e))?;

        if inserted {
            info!(user_id, start = %record.start_timestamp, "user is now AFK");
        } else {
            debug!(user_id, "user is already AFK");
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::DatabaseConfig;
    use crate::utils::time::{parse_timestamp, FixedClock};

    async fn service_at(now: &str) -> AfkService {
        let store = AfkStore::connect(&DatabaseConfig::new("sqlite::memory:"))
            .await
            .unwrap();
        AfkService::new(store, Logging::disabled())
            .with_clock(FixedClock(parse_timestamp(now).unwrap()))
    }

    async fn seed(service: &AfkService, user_id: u64, start: &str) {
        let record = AfkRecord {
            user_id,
            status: Some("studying".to_string()),
            eta: Some("tonight".to_string()),
            start_timestamp: start.to_string(),
        };
        assert!(service.store().insert(&record).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_not_afk() {
        let service = service_at("2024-01-01T02:15:00").await;
        assert_eq!(service.check(1).await.unwrap(), AfkStatus::NotAfk);
    }

    #[tokio::test]
    async fn test_check_afk_reports_elapsed() {
        let service = service_at("2024-01-01T02:15:00").await;
        seed(&service, 1, "2024-01-01T00:00:00").await;

        let status = service.check(1).await.unwrap();
        assert_eq!(
            status,
            AfkStatus::Afk {
                status: Some("studying".to_string()),
                eta: Some("tonight".to_string()),
                away_for: "2 hours, 15 minutes".to_string(),
            }
        );
        // checking does not clear
        assert!(service.store().get(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_returns_elapsed_and_removes() {
        let service = service_at("2024-01-01T00:00:45").await;
        seed(&service, 2, "2024-01-01T00:00:00").await;

        assert_eq!(service.clear(2).await.unwrap(), "45 seconds");
        assert_eq!(service.check(2).await.unwrap(), AfkStatus::NotAfk);
    }

    #[tokio::test]
    async fn test_clear_when_not_afk() {
        let service = service_at("2024-01-01T00:00:00").await;
        assert!(matches!(service.clear(3).await, Err(AfkError::NotAfk)));
    }

    #[tokio::test]
    async fn test_clear_with_corrupt_timestamp_keeps_record() {
        let service = service_at("2024-01-01T00:00:00").await;
        seed(&service, 4, "not a time").await;

        assert!(matches!(
            service.clear(4).await,
            Err(AfkError::MalformedTimestamp { .. })
        ));
        assert!(service.store().get(4).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clock_behind_start_reports_zero() {
        let service = service_at("2024-01-01T00:00:00").await;
        seed(&service, 5, "2024-01-01T01:00:00").await;

        match service.check(5).await.unwrap() {
            AfkStatus::Afk { away_for, .. } => assert_eq!(away_for, "0 seconds"),
            AfkStatus::NotAfk => panic!("expected user 5 to be AFK"),
        }
    }

    #[tokio::test]
    async fn test_set_stamps_clock_time_once() {
        let service = service_at("2024-03-10T12:00:00").await;

        assert!(service.set(6, Some("gym".into()), None).await.unwrap());
        assert!(!service.set(6, Some("again".into()), None).await.unwrap());

        let record = service.store().get(6).await.unwrap().unwrap();
        assert_eq!(record.status.as_deref(), Some("gym"));
        assert_eq!(record.start_timestamp, "2024-03-10T12:00:00");
    }
}
