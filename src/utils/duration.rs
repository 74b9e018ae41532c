// Elapsed time between two AFK timestamps, rendered for humans

use chrono::NaiveDateTime;

use super::time::parse_timestamp;
use crate::error::Result;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Human-readable time between `start` and `end` (e.g. "2 hours, 15 minutes")
///
/// Both strings must be in the stored timestamp format. If `end` is before
/// `start` the elapsed time is treated as zero.
pub fn compute(start: &str, end: &str) -> Result<String> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    Ok(between(start, end))
}

/// Time away since `start`, measured at `now`
pub fn since(start: &str, now: NaiveDateTime) -> Result<String> {
    Ok(between(parse_timestamp(start)?, now))
}

fn between(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let elapsed = (end - start).num_seconds().max(0) as u64;
    humanize(elapsed)
}

/// Split a number of seconds into days, hours, minutes and seconds,
/// dropping units that are zero
pub fn humanize(total_seconds: u64) -> String {
    let units = [
        (total_seconds / DAY, "day"),
        (total_seconds % DAY / HOUR, "hour"),
        (total_seconds % HOUR / MINUTE, "minute"),
        (total_seconds % MINUTE, "second"),
    ];

    let parts: Vec<String> = units
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| plural(*n, unit))
        .collect();

    if parts.is_empty() {
        plural(0, "second")
    } else {
        parts.join(", ")
    }
}

fn plural(n: u64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AfkError;

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(
            compute("2024-01-01T00:00:00", "2024-01-01T02:15:00").unwrap(),
            "2 hours, 15 minutes"
        );
    }

    #[test]
    fn test_equal_timestamps() {
        assert_eq!(
            compute("2024-01-01T00:00:00", "2024-01-01T00:00:00").unwrap(),
            "0 seconds"
        );
    }

    #[test]
    fn test_end_before_start_clamps() {
        assert_eq!(
            compute("2024-01-01T02:00:00", "2024-01-01T00:00:00").unwrap(),
            "0 seconds"
        );
    }

    #[test]
    fn test_singular_units() {
        assert_eq!(
            compute("2024-01-01T00:00:00", "2024-01-02T01:01:01").unwrap(),
            "1 day, 1 hour, 1 minute, 1 second"
        );
    }

    #[test]
    fn test_inner_zero_units_dropped() {
        assert_eq!(humanize(2 * DAY + 5), "2 days, 5 seconds");
        assert_eq!(humanize(3 * HOUR), "3 hours");
        assert_eq!(humanize(59), "59 seconds");
    }

    #[test]
    fn test_spans_month_boundary() {
        assert_eq!(
            compute("2024-02-28T23:00:00", "2024-03-01T23:00:00").unwrap(),
            "2 days"
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            compute("", "2024-01-01T00:00:00"),
            Err(AfkError::MalformedTimestamp { .. })
        ));
        assert!(matches!(
            compute("2024-01-01T00:00:00", "soon"),
            Err(AfkError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_since() {
        let now = parse_timestamp("2024-01-01T00:01:30").unwrap();
        assert_eq!(since("2024-01-01T00:00:00", now).unwrap(), "1 minute, 30 seconds");
    }
}
