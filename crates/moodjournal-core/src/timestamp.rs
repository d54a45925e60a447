//! ISO-8601 timestamps as stored in the journal documents.
//!
//! Documents keep dates as strings. New timestamps are written the way a
//! JavaScript `Date::toISOString` would (`2024-03-01T09:30:00.000Z`) so
//! documents produced by older clients stay byte-compatible.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

pub const MS_PER_DAY: i64 = 86_400_000;

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    to_iso(Utc::now())
}

/// Parse a stored date string.
///
/// Accepts RFC 3339 with any offset, a zone-less date-time (read as UTC),
/// or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The `YYYY-MM-DD` prefix of a stored date string.
pub fn day_prefix(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_matches_javascript_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(to_iso(at), "2024-03-01T09:30:00.000Z");
    }

    #[test]
    fn parses_supported_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_iso("2024-03-01T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_iso("2024-03-01T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_iso("2024-03-01T00:00:00"), Some(expected));
        assert_eq!(parse_iso("2024-03-01"), Some(expected));
        assert_eq!(parse_iso("yesterday"), None);
    }

    #[test]
    fn day_prefix_strips_time() {
        assert_eq!(day_prefix("2024-03-01T09:30:00.000Z"), "2024-03-01");
        assert_eq!(day_prefix("2024-03-01"), "2024-03-01");
    }
}
