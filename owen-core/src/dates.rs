//! Date helpers shared by the graph and relational layers.
//!
//! Initiative dates live in the graph as plain strings, so every writer and
//! reader goes through [`format_date_time`] / [`parse_date_time`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{OwenError, Result};

/// Fixed format of date-time strings stored on graph nodes (UTC).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an instant the way graph node properties store it.
pub fn format_date_time(instant: DateTime<Utc>) -> String {
    instant.format(DATE_TIME_FORMAT).to_string()
}

/// Parse a stored date-time string back into an instant.
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_TIME_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| OwenError::invalid_date(value, e.to_string()))
}

/// Midnight at the start of the instant's day.
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}

/// Last whole second of the instant's day (23:59:59).
pub fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&instant.date_naive().and_time(last_second))
}

/// Whole years and months elapsed between `start` and `today`.
///
/// Calendar-period semantics: a month only counts once its day of month has
/// been reached. A `start` after `today` yields `(0, 0)`.
pub fn years_and_months_between(start: NaiveDate, today: NaiveDate) -> (i32, i32) {
    if start >= today {
        return (0, 0);
    }

    let mut months = (today.year() - start.year()) * 12 + today.month() as i32 - start.month() as i32;
    if today.day() < start.day() {
        months -= 1;
    }

    (months / 12, months % 12)
}

/// Duration label for an open-ended work experience, e.g. `"2years 3months"`.
pub fn work_duration(start: NaiveDate, today: NaiveDate) -> String {
    let (years, months) = years_and_months_between(start, today);
    format!("{}years {}months", years, months)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_and_parse_agree() {
        let instant = Utc.with_ymd_and_hms(2016, 3, 14, 9, 26, 53).unwrap();
        let text = format_date_time(instant);
        assert_eq!(text, "2016-03-14 09:26:53");
        assert_eq!(parse_date_time(&text).unwrap(), instant);
    }

    #[test]
    fn parse_rejects_other_formats() {
        let err = parse_date_time("14/03/2016").unwrap_err();
        assert!(matches!(err, OwenError::InvalidDate { .. }));
    }

    #[test]
    fn day_bounds() {
        let instant = Utc.with_ymd_and_hms(2016, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(format_date_time(start_of_day(instant)), "2016-03-14 00:00:00");
        assert_eq!(format_date_time(end_of_day(instant)), "2016-03-14 23:59:59");
    }

    #[test]
    fn duration_counts_whole_months() {
        assert_eq!(work_duration(date(2014, 1, 15), date(2016, 4, 15)), "2years 3months");
        assert_eq!(work_duration(date(2014, 1, 15), date(2016, 4, 14)), "2years 2months");
        assert_eq!(work_duration(date(2015, 12, 31), date(2016, 1, 30)), "0years 0months");
    }

    #[test]
    fn duration_in_the_future_is_zero() {
        assert_eq!(work_duration(date(2030, 1, 1), date(2016, 1, 1)), "0years 0months");
    }
}
