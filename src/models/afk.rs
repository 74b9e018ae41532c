// AFK data model
// One row per currently-AFK user in the `Afk` table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::time::format_timestamp;

/// A user's AFK record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfkRecord {
    pub user_id: u64,
    pub status: Option<String>,
    pub eta: Option<String>,
    pub start_timestamp: String,
}

impl AfkRecord {
    /// Create a record that starts at `start`. Blank status/eta become `None`.
    pub fn new(
        user_id: u64,
        status: Option<String>,
        eta: Option<String>,
        start: NaiveDateTime,
    ) -> Self {
        Self {
            user_id,
            status: non_blank(status),
            eta: non_blank(eta),
            start_timestamp: format_timestamp(start),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Answer to "is this user AFK?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AfkStatus {
    NotAfk,
    Afk {
        status: Option<String>,
        eta: Option<String>,
        /// Human-readable time since the user went AFK
        #[serde(rename = "awayFor")]
        away_for: String,
    },
}

impl AfkStatus {
    pub fn is_afk(&self) -> bool {
        matches!(self, AfkStatus::Afk { .. })
    }
}
