// Timestamp format and clock used for AFK records

use chrono::{NaiveDateTime, Utc};

use crate::error::{AfkError, Result};

/// Format every stored `start_timestamp` is written in (UTC, seconds precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Older rows use a space instead of `T`
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of "now" for AFK operations. Swappable so tests can pin the time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Clock stuck at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Parse a stored timestamp
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT).or_else(|err| {
        NaiveDateTime::parse_from_str(input, LEGACY_TIMESTAMP_FORMAT)
            .map_err(|_| AfkError::malformed(input, err))
    })
}

/// Render a timestamp in the stored format
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC time in the stored format
pub fn now_string(clock: &dyn Clock) -> String {
    format_timestamp(clock.now())
}
