//! Timestamp parsing and day arithmetic
//!
//! FTRT and solar datasets arrive with heterogeneous time encodings: ISO dates,
//! RFC 3339 datetimes, and Unix epochs in seconds or milliseconds. Everything is
//! normalized to `DateTime<Utc>` here.

use crate::errors::TimestampError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Epoch magnitudes at or above this (12+ digits) are treated as milliseconds
const MILLISECOND_THRESHOLD: u64 = 100_000_000_000;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse a timestamp string into UTC
///
/// Accepted forms:
/// - RFC 3339 (`2024-05-10T16:54:00Z`, offsets converted to UTC)
/// - `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS` (UTC assumed)
/// - `YYYY-MM-DD` (midnight UTC)
/// - Unix epoch seconds, or milliseconds for 12+ digit values
///
/// # Examples
/// ```rust
/// use ftrt_core::parse_timestamp;
///
/// let a = parse_timestamp("2024-05-10").unwrap();
/// let b = parse_timestamp("1715299200").unwrap();
/// let c = parse_timestamp("1715299200000").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// ```
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = input.trim();

    let parsed = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        Some(dt.with_timezone(&Utc))
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        Some(Utc.from_utc_datetime(&naive))
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        Some(Utc.from_utc_datetime(&naive))
    } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
    } else if let Ok(epoch) = trimmed.parse::<i64>() {
        from_epoch(epoch)
    } else {
        None
    };

    match parsed {
        Some(dt) if validate_timestamp(&dt) => Ok(dt),
        Some(_) => Err(TimestampError::OutOfRange {
            input: input.to_string(),
        }),
        None => Err(TimestampError::UnrecognizedFormat {
            input: input.to_string(),
        }),
    }
}

fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch.unsigned_abs() >= MILLISECOND_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

/// Validate timestamp is within the supported range
///
/// 1600-01-01 to 2200-01-01 covers telescopic sunspot records and
/// forward ephemeris projections while rejecting obviously corrupt values.
pub fn validate_timestamp(timestamp: &DateTime<Utc>) -> bool {
    // 1600-01-01T00:00:00Z and 2200-01-01T00:00:00Z
    const MIN_SECONDS: i64 = -11_676_096_000;
    const MAX_SECONDS: i64 = 7_258_118_400;

    (MIN_SECONDS..=MAX_SECONDS).contains(&timestamp.timestamp())
}

/// Signed fractional days from `from` to `to`
pub fn days_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> f64 {
    let delta = to.signed_duration_since(*from);
    delta.num_milliseconds() as f64 / 1_000.0 / SECONDS_PER_DAY
}

/// Shift a timestamp by a signed, possibly fractional, number of days
///
/// `None` when `days` is not finite or the result leaves chrono's
/// representable range.
pub fn shift_days(timestamp: &DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    let millis = (days * SECONDS_PER_DAY * 1_000.0).round();
    // i64::MAX as f64 rounds up to 2^63, so `<` keeps the cast exact
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let delta = chrono::Duration::try_milliseconds(millis as i64)?;
    timestamp.checked_add_signed(delta)
}

/// Like [`shift_days`], but clamps to the earliest/latest representable
/// instant instead of failing
pub fn shift_days_saturating(timestamp: &DateTime<Utc>, days: f64) -> DateTime<Utc> {
    shift_days(timestamp, days).unwrap_or(if days < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-05-10T18:54:00+02:00").unwrap();
        assert_eq!(dt, utc(2024, 5, 10, 16, 54, 0));
    }

    #[test]
    fn test_parse_naive_datetime_forms() {
        let expected = utc(2003, 10, 28, 11, 10, 0);
        assert_eq!(parse_timestamp("2003-10-28 11:10:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2003-10-28T11:10:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(
            parse_timestamp("1859-09-01").unwrap(),
            utc(1859, 9, 1, 0, 0, 0)
        );
    }

    #[test]
    fn test_parse_epoch_seconds_and_millis() {
        let expected = utc(2021, 1, 1, 0, 0, 0);
        assert_eq!(parse_timestamp("1609459200").unwrap(), expected);
        assert_eq!(parse_timestamp("1609459200000").unwrap(), expected);
    }

    #[test]
    fn test_epoch_unit_boundary() {
        // 11 digits: seconds, which lands in year 5138
        assert!(matches!(
            parse_timestamp("99999999999"),
            Err(TimestampError::OutOfRange { .. })
        ));
        // 12 digits: milliseconds
        assert_eq!(
            parse_timestamp("100000000000").unwrap(),
            utc(1973, 3, 3, 9, 46, 40)
        );
        assert!(parse_timestamp(&i64::MIN.to_string()).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage_and_out_of_range() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(TimestampError::UnrecognizedFormat { .. })
        ));
        assert!(matches!(
            parse_timestamp("1500-01-01"),
            Err(TimestampError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_timestamp("2500-01-01"),
            Err(TimestampError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_range_boundaries_inclusive() {
        assert!(validate_timestamp(&utc(1600, 1, 1, 0, 0, 0)));
        assert!(validate_timestamp(&utc(2200, 1, 1, 0, 0, 0)));
        assert!(!validate_timestamp(&utc(2200, 1, 1, 0, 0, 1)));
    }

    #[test]
    fn test_days_between_signed_fractional() {
        let a = utc(2024, 1, 1, 0, 0, 0);
        let b = utc(2024, 1, 2, 12, 0, 0);
        assert_eq!(days_between(&a, &b), 1.5);
        assert_eq!(days_between(&b, &a), -1.5);
    }

    #[test]
    fn test_shift_days_round_trips_with_days_between() {
        let a = utc(2024, 3, 1, 0, 0, 0);
        let shifted = shift_days(&a, -2.25).unwrap();
        assert_eq!(days_between(&a, &shifted), -2.25);
    }

    #[test]
    fn test_shift_days_out_of_range() {
        let a = utc(2024, 3, 1, 0, 0, 0);

        assert_eq!(shift_days(&a, u32::MAX as f64), None);
        assert_eq!(shift_days(&a, -1e12), None);
        assert_eq!(shift_days(&a, 1e300), None);
        assert_eq!(shift_days(&a, f64::NAN), None);

        assert_eq!(shift_days_saturating(&a, 1e12), DateTime::<Utc>::MAX_UTC);
        assert_eq!(shift_days_saturating(&a, -1e12), DateTime::<Utc>::MIN_UTC);
        assert_eq!(shift_days_saturating(&a, 1.0), utc(2024, 3, 2, 0, 0, 0));
    }
}
