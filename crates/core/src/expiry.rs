//! Expiry date parsing and day arithmetic.
//!
//! Stored expiry dates are free text, so every helper here is total:
//! unparseable input yields `None` instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::Timestamp;

/// A discount is "expiring soon" when it expires within this many whole days.
pub const EXPIRING_SOON_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse an ISO 8601 expiry date.
///
/// Accepted forms, tried in order:
///
/// - RFC 3339 (`2025-06-30T12:00:00Z`, `2025-06-30T12:00:00+02:00`)
/// - date only (`2025-06-30`), read as midnight UTC
/// - date and time without offset (`2025-06-30T12:00:00`), read as UTC
///
/// Returns `None` for anything else.
pub fn parse_expiry(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Whole days from `now` until `expiry`, rounded up.
///
/// Negative when already expired. Anything less than a full day past the
/// expiry rounds up to zero.
pub fn days_until(expiry: Timestamp, now: Timestamp) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Whole days until a raw expiry string, or `None` if it cannot be parsed.
pub fn days_until_raw(raw: &str, now: Timestamp) -> Option<i64> {
    parse_expiry(raw).map(|expiry| days_until(expiry, now))
}

/// Check whether a raw expiry string falls within [`EXPIRING_SOON_DAYS`].
///
/// There is no lower bound: already expired dates count as expiring soon.
/// Unparseable dates never count as expiring soon.
pub fn is_expiring_soon(raw: &str, now: Timestamp) -> bool {
    match days_until_raw(raw, now) {
        Some(days) => days <= EXPIRING_SOON_DAYS,
        None => {
            tracing::debug!(expiry_date = raw, "Unparseable expiry date, treating as not expiring soon");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_expiry("2025-03-10T14:00:00+02:00").unwrap();
        assert_eq!(parsed, now());
    }

    #[test]
    fn parses_date_only_as_midnight_utc() {
        let parsed = parse_expiry("2025-03-17").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let parsed = parse_expiry("2025-03-10T12:00:00").unwrap();
        assert_eq!(parsed, now());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_expiry("next tuesday"), None);
        assert_eq!(parse_expiry(""), None);
        assert_eq!(parse_expiry("2025-13-45"), None);
    }

    #[test]
    fn days_until_rounds_up_partial_days() {
        assert_eq!(days_until(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(3), now()), 3);
        assert_eq!(days_until(now() + Duration::days(3) + Duration::seconds(1), now()), 4);
    }

    #[test]
    fn days_until_past_dates() {
        assert_eq!(days_until(now() - Duration::hours(12), now()), 0);
        assert_eq!(days_until(now() - Duration::days(2), now()), -2);
        assert_eq!(days_until(now(), now()), 0);
    }

    #[test]
    fn expiring_soon_boundary() {
        let seven = (now() + Duration::days(7)).to_rfc3339();
        let just_over = (now() + Duration::days(7) + Duration::milliseconds(1)).to_rfc3339();
        let eight = (now() + Duration::days(8)).to_rfc3339();

        assert!(is_expiring_soon(&seven, now()));
        assert!(!is_expiring_soon(&just_over, now()));
        assert!(!is_expiring_soon(&eight, now()));
    }

    #[test]
    fn expired_dates_count_as_expiring_soon() {
        let expired = (now() - Duration::days(30)).to_rfc3339();
        assert!(is_expiring_soon(&expired, now()));
    }

    #[test]
    fn unparseable_dates_are_never_expiring_soon() {
        assert!(!is_expiring_soon("soon-ish", now()));
        assert_eq!(days_until_raw("soon-ish", now()), None);
    }
}
