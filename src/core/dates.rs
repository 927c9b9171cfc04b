//! Calendar date convention
//!
//! Every itinerary and traveler date is a `NaiveDate` read as UTC midnight.
//! Timestamps coming in from the boundary (form inputs, API payloads) are
//! reduced to their UTC calendar date here and nowhere else.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Wire and display format of a calendar date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in UTC
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `date` shifted forward by `days` calendar days
///
/// Saturates at `NaiveDate::MAX` instead of panicking.
pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of nights between check-in and check-out
///
/// Returns `None` when check-out is before check-in.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> Option<u32> {
    let nights = (check_out - check_in).num_days();
    u32::try_from(nights).ok()
}

/// Parse a boundary date value into a UTC calendar date
///
/// Accepts `YYYY-MM-DD` as well as RFC 3339 timestamps; a timestamp is
/// converted to UTC before its date is taken, so `2024-06-01T23:30:00-02:00`
/// becomes `2024-06-02`.
pub fn parse_boundary_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}

/// Normalize a boundary date value to `YYYY-MM-DD`, or empty when unparseable
pub fn normalize_date_string(value: &str) -> String {
    parse_boundary_date(value)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(first_of_month(date(2024, 3, 31)), date(2024, 3, 1));
        assert_eq!(first_of_month(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(add_days(date(2024, 2, 28), 1), date(2024, 2, 29));
        assert_eq!(add_days(date(2024, 12, 31), 1), date(2025, 1, 1));
        assert_eq!(add_days(date(2024, 6, 1), 0), date(2024, 6, 1));
    }

    #[test]
    fn test_nights_between() {
        assert_eq!(nights_between(date(2024, 6, 1), date(2024, 6, 4)), Some(3));
        assert_eq!(nights_between(date(2024, 6, 1), date(2024, 6, 1)), Some(0));
        assert_eq!(nights_between(date(2024, 6, 4), date(2024, 6, 1)), None);
    }

    #[test]
    fn test_parse_boundary_date_plain() {
        assert_eq!(parse_boundary_date("2024-06-01"), Some(date(2024, 6, 1)));
        assert_eq!(parse_boundary_date("  "), None);
        assert_eq!(parse_boundary_date("01/06/2024"), None);
    }

    #[test]
    fn test_parse_boundary_date_uses_utc_component() {
        assert_eq!(
            parse_boundary_date("1990-05-17T00:00:00.000Z"),
            Some(date(1990, 5, 17))
        );
        assert_eq!(
            parse_boundary_date("2024-06-01T23:30:00-02:00"),
            Some(date(2024, 6, 2))
        );
        assert_eq!(
            parse_boundary_date("2024-06-01T00:30:00+05:30"),
            Some(date(2024, 5, 31))
        );
    }

    #[test]
    fn test_normalize_date_string() {
        assert_eq!(normalize_date_string("1990-05-17T00:00:00Z"), "1990-05-17");
        assert_eq!(normalize_date_string("garbage"), "");
        assert_eq!(normalize_date_string(""), "");
    }
}
