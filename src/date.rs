//! Caller-facing date conventions.
//!
//! Customer-facing fields use `DD/MM/YYYY`, while a few admin-facing fields
//! (admin date of birth, dashboard periods) use `YYYY-MM-DD`. Both are parsed
//! at the HTTP boundary, so the store only ever sees typed dates.

use derive_more::Display;
use time::{
    format_description::FormatItem, macros::format_description, Date, Time,
};

const DAY_MONTH_YEAR: &[FormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

/// Also accepts unpadded days and months such as `1/3/2026`.
const LOOSE_DAY_MONTH_YEAR: &[FormatItem<'static>] =
    format_description!("[day padding:none]/[month padding:none]/[year]");

const YEAR_MONTH_DAY: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const HOUR_MINUTE: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]");

const HOUR_MINUTE_SECOND: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

#[derive(Clone, Debug, Display, PartialEq)]
#[display("Invalid date format. Use {expected}")]
pub struct InvalidDate {
    pub expected: &'static str,
}

/// Parses a `DD/MM/YYYY` date.
pub fn parse_dmy(s: &str) -> Result<Date, InvalidDate> {
    Date::parse(s.trim(), LOOSE_DAY_MONTH_YEAR).map_err(|_| InvalidDate {
        expected: "dd/mm/yyyy",
    })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_ymd(s: &str) -> Result<Date, InvalidDate> {
    Date::parse(s.trim(), YEAR_MONTH_DAY).map_err(|_| InvalidDate {
        expected: "yyyy-mm-dd",
    })
}

pub fn format_dmy(date: Date) -> String {
    date.format(DAY_MONTH_YEAR).unwrap_or_default()
}

pub fn format_ymd(date: Date) -> String {
    date.format(YEAR_MONTH_DAY).unwrap_or_default()
}

/// Formats a showtime start as `HH:MM`.
pub fn format_hm(time: Time) -> String {
    time.format(HOUR_MINUTE).unwrap_or_default()
}

pub fn format_hms(time: Time) -> String {
    time.format(HOUR_MINUTE_SECOND).unwrap_or_default()
}

/// Parses a showtime start given as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<Time, InvalidDate> {
    let s = s.trim();
    Time::parse(s, HOUR_MINUTE_SECOND)
        .or_else(|_| Time::parse(s, HOUR_MINUTE))
        .map_err(|_| InvalidDate { expected: "hh:mm:ss" })
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use super::*;

    #[test]
    fn parses_day_month_year() {
        assert_eq!(parse_dmy("20/03/2026"), Ok(date!(2026 - 03 - 20)));
        assert_eq!(parse_dmy(" 01/12/2025 "), Ok(date!(2025 - 12 - 01)));
    }

    #[test]
    fn accepts_unpadded_day_and_month() {
        let d = parse_dmy("1/3/2026").unwrap();
        assert_eq!(d, date!(2026 - 03 - 01));
        assert_eq!(parse_dmy("20/3/2026"), Ok(date!(2026 - 03 - 20)));
        assert_eq!(format_dmy(d), "01/03/2026");
    }

    #[test]
    fn rejects_malformed_day_month_year() {
        for input in ["2026-03-20", "31/02/2026", "", "tomorrow"] {
            let err = parse_dmy(input).unwrap_err();
            assert_eq!(err.to_string(), "Invalid date format. Use dd/mm/yyyy");
        }
    }

    #[test]
    fn parses_year_month_day() {
        assert_eq!(parse_ymd("2025-11-23"), Ok(date!(2025 - 11 - 23)));
        assert!(parse_ymd("23/11/2025").is_err());
    }

    #[test]
    fn formats_both_conventions() {
        let d = date!(2025 - 01 - 09);
        assert_eq!(format_dmy(d), "09/01/2025");
        assert_eq!(format_ymd(d), "2025-01-09");
    }

    #[test]
    fn parses_and_formats_start_times() {
        assert_eq!(parse_time("10:00:00"), Ok(time!(10:00)));
        assert_eq!(parse_time("20:45"), Ok(time!(20:45)));
        assert!(parse_time("8pm").is_err());
        assert_eq!(format_hm(time!(9:05)), "09:05");
        assert_eq!(format_hms(time!(21:30)), "21:30:00");
    }
}
