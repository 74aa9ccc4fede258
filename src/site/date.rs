//! Submission dates in the site's fixed UTC+8 zone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use thiserror::Error;

/// Human-readable shape of a submitted date.
pub const DATE_PATTERN: &str = "YYYY-MM-DD HH:MM:SS";

/// `chrono` format string matching [`DATE_PATTERN`].
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// China Standard Time. No DST.
const UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Date resolution errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date {0:?}, expected format {}", DATE_PATTERN)]
    InvalidFormat(String),

    #[error("cannot resolve the UTC+8 time zone")]
    TimeZone,
}

/// The zone every timestamp is read and written in.
pub fn site_timezone() -> Result<FixedOffset, DateError> {
    FixedOffset::east_opt(UTC_OFFSET_SECS).ok_or(DateError::TimeZone)
}

/// Resolve a submitted date, or the current time when none was given.
pub fn resolve_date(input: Option<&str>) -> Result<DateTime<FixedOffset>, DateError> {
    let tz = site_timezone()?;

    match input {
        None | Some("") => Ok(Utc::now().with_timezone(&tz)),
        Some(s) => parse_date(s, tz),
    }
}

fn parse_date(input: &str, tz: FixedOffset) -> Result<DateTime<FixedOffset>, DateError> {
    let invalid = || DateError::InvalidFormat(input.to_string());

    // chrono accepts unpadded fields and leap seconds; the wire format does not.
    if !has_exact_shape(input) || &input[17..19] > "59" {
        return Err(invalid());
    }

    let naive = NaiveDateTime::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())?;
    naive.and_local_timezone(tz).single().ok_or_else(invalid)
}

/// `DDDD-DD-DD DD:DD:DD`, digits ASCII only.
fn has_exact_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == DATE_PATTERN.len()
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SecondsFormat, Timelike};

    #[test]
    fn test_parse_valid_date() {
        let date = resolve_date(Some("2025-01-02 15:04:05")).unwrap();
        assert_eq!(
            date.to_rfc3339_opts(SecondsFormat::Secs, false),
            "2025-01-02T15:04:05+08:00"
        );
    }

    #[test]
    fn test_missing_date_uses_now() {
        let before = Utc::now().timestamp();
        let date = resolve_date(None).unwrap();
        let after = Utc::now().timestamp();

        assert_eq!(date.offset().local_minus_utc(), UTC_OFFSET_SECS);
        assert!(date.timestamp() >= before && date.timestamp() <= after);

        let empty = resolve_date(Some("")).unwrap();
        assert_eq!(empty.offset().local_minus_utc(), UTC_OFFSET_SECS);
    }

    #[test]
    fn test_out_of_range_fields() {
        for input in [
            "2025-13-40 99:99:99",
            "2025-02-30 10:00:00",
            "2025-01-01 24:00:00",
            "2025-01-01 23:60:00",
            "2025-12-31 23:59:60",
        ] {
            assert_eq!(
                resolve_date(Some(input)),
                Err(DateError::InvalidFormat(input.to_string())),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_wrong_shape() {
        for input in [
            "2025-1-2 3:04:05",
            "2025/01/02 15:04:05",
            "2025-01-02T15:04:05",
            "2025-01-02",
            "2025-01-02 15:04:05 ",
            "+025-01-02 15:04:05",
            "２０２５-01-02 15:04:05",
        ] {
            assert!(
                matches!(resolve_date(Some(input)), Err(DateError::InvalidFormat(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_names_expected_pattern() {
        let err = resolve_date(Some("yesterday")).unwrap_err();
        assert!(err.to_string().contains(DATE_PATTERN));
    }

    #[test]
    fn test_date_is_zone_local() {
        let date = resolve_date(Some("2024-12-31 23:30:00")).unwrap();
        assert_eq!(date.hour(), 23);
        assert_eq!(date.with_timezone(&Utc).hour(), 15);
    }
}
