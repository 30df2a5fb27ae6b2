//! Parsing of the legacy textual date and time forms.
//!
//! Dates arrive as `DD/MM/YYYY` or `YYYY-MM-DD`. The format list order is
//! load-bearing: the Brazilian form is tried first, and the first format
//! that parses wins, even for strings that happen to be valid under both.
//! Times arrive as `HH:MM` or `HH:MM:SS`.

use chrono::{NaiveDate, NaiveTime};

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// ## Summary
/// Parses a legacy date string, trying `DD/MM/YYYY` then `YYYY-MM-DD`.
///
/// Returns `None` if neither format matches; the caller skips that row.
#[must_use]
pub fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// ## Summary
/// Parses a legacy time string, accepting `HH:MM:SS` and `HH:MM`.
///
/// An `HH:MM` input is the zero-seconds time, equivalent to padding it to
/// `HH:MM:00`. Returns `None` for anything else.
#[must_use]
pub fn parse_legacy_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_brazilian_form() {
        assert_eq!(parse_legacy_date("25/12/2026"), Some(date(2026, 12, 25)));
    }

    #[test]
    fn test_iso_form() {
        assert_eq!(parse_legacy_date("2026-12-25"), Some(date(2026, 12, 25)));
    }

    #[test]
    fn test_both_forms_agree() {
        assert_eq!(
            parse_legacy_date("07/03/2026"),
            parse_legacy_date("2026-03-07")
        );
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_legacy_date("31/02/2026"), None);
        assert_eq!(parse_legacy_date("2026/12/25"), None);
        assert_eq!(parse_legacy_date("soon"), None);
        assert_eq!(parse_legacy_date(""), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        assert_eq!(parse_legacy_date(" 01/01/2027 "), Some(date(2027, 1, 1)));
    }

    #[test]
    fn test_time_with_and_without_seconds() {
        let expected = NaiveTime::from_hms_opt(19, 30, 0).expect("valid test time");
        assert_eq!(parse_legacy_time("19:30"), Some(expected));
        assert_eq!(parse_legacy_time("19:30:00"), Some(expected));
    }

    #[test]
    fn test_time_seconds_survive() {
        assert_eq!(
            parse_legacy_time("06:05:42"),
            NaiveTime::from_hms_opt(6, 5, 42)
        );
    }

    #[test]
    fn test_unparseable_times() {
        assert_eq!(parse_legacy_time("25:00"), None);
        assert_eq!(parse_legacy_time("7pm"), None);
        assert_eq!(parse_legacy_time(""), None);
    }
}
