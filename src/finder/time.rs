//! Date string parsing for the `date` rule.
//!
//! A value is tried as an RFC 3339 timestamp, then as a local
//! `YYYY-MM-DD HH:MM:SS` timestamp, then as a plain `YYYY-MM-DD` date
//! (interpreted as local midnight), and finally as a relative age such as
//! `2d` or `36h`, counted back from now.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Parse a date string into a point in time.
///
/// Returns `None` when the text matches none of the supported forms.
pub fn parse_date_value(value: &str) -> Option<SystemTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.into());
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        if let Some(local) = Local.from_local_datetime(&ndt).earliest() {
            return Some(local.into());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        // Interpret the date as local midnight, not UTC.
        let midnight = date.and_hms_opt(0, 0, 0)?;
        if let Some(local) = Local.from_local_datetime(&midnight).earliest() {
            return Some(local.into());
        }
    }

    let age = parse_relative(value)?;
    Some(SystemTime::now().checked_sub(age).unwrap_or(SystemTime::UNIX_EPOCH))
}

/// Parse a relative age with an optional unit suffix.
///
/// Supports h (hours), d (days), w (weeks) and m (months, 30 days); a plain
/// number means days.
fn parse_relative(value: &str) -> Option<Duration> {
    let (num_str, unit) = match value.find(|c: char| c.is_alphabetic()) {
        Some(pos) => {
            let (num, unit) = value.split_at(pos);
            (num, Some(unit))
        }
        None => (value, None),
    };

    let value: u64 = num_str.trim().parse().ok()?;

    let unit_seconds: u64 = match unit {
        None | Some("d") | Some("D") => 24 * 60 * 60,
        Some("h") | Some("H") => 60 * 60,
        Some("w") | Some("W") => 7 * 24 * 60 * 60,
        Some("m") | Some("M") => 30 * 24 * 60 * 60,
        Some(_) => return None,
    };

    // Counts too large to express in seconds are rejected, not wrapped.
    let seconds = value.checked_mul(unit_seconds)?;
    Some(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_age_close(value: &str, expected_secs: u64) {
        let parsed = parse_date_value(value).unwrap();
        let delta = SystemTime::now()
            .duration_since(parsed)
            .expect("relative ages must lie in the past");
        let expected = Duration::from_secs(expected_secs);
        assert!(delta >= expected, "{value}: {delta:?} < {expected:?}");
        assert!(delta < expected + Duration::from_secs(5), "{value}: {delta:?}");
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_date_value("2024-03-01T12:30:00Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z").unwrap();
        assert_eq!(parsed, SystemTime::from(expected));
    }

    #[test]
    fn test_parse_local_datetime() {
        let parsed = parse_date_value("2024-03-01 08:15:00").unwrap();
        let ndt = NaiveDateTime::parse_from_str("2024-03-01 08:15:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let expected = Local.from_local_datetime(&ndt).earliest().unwrap();
        assert_eq!(parsed, SystemTime::from(expected));
    }

    #[test]
    fn test_parse_plain_date_is_local_midnight() {
        let earlier = parse_date_value("2024-03-01").unwrap();
        let later = parse_date_value("2024-03-01 00:00:01").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_plain_dates_are_ordered() {
        let first = parse_date_value("2024-01-01").unwrap();
        let second = parse_date_value("2024-01-02").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_parse_relative_default_days() {
        assert_age_close("2", 2 * 24 * 60 * 60);
    }

    #[test]
    fn test_parse_relative_hours() {
        assert_age_close("36h", 36 * 60 * 60);
    }

    #[test]
    fn test_parse_relative_days() {
        assert_age_close("15d", 15 * 24 * 60 * 60);
    }

    #[test]
    fn test_parse_relative_weeks() {
        assert_age_close("2w", 2 * 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_parse_relative_months() {
        assert_age_close("3M", 3 * 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_parse_relative_with_whitespace() {
        assert_age_close("  2d  ", 2 * 24 * 60 * 60);
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        assert!(parse_date_value("15x").is_none());
    }

    #[test]
    fn test_parse_rejects_overflowing_count() {
        // Just past u64::MAX seconds once converted from days
        assert!(parse_date_value("213503982334602d").is_none());
        assert!(parse_date_value(&format!("{}h", u64::MAX)).is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date_value("not-a-date").is_none());
        assert!(parse_date_value("").is_none());
        assert!(parse_date_value("13-01-2024").is_none());
    }
}
