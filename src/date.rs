//! Date extraction from file names and reference timestamps.
//!
//! Names are scanned for an ISO 8601 date, extended form (`YYYY-MM-DD`)
//! first and basic form (`YYYYMMDD`) second. Only the digit classes are
//! checked: `2023-19-39` is accepted as month `19`, day `39`.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use regex::Regex;
use std::fmt;
use std::time::SystemTime;

lazy_static::lazy_static! {
    static ref ISO8601_EXTENDED: Regex =
        Regex::new(r"([12][0-9]{3})-([0-2][0-9])-([0-3][0-9])").expect("valid extended date regex");
    static ref ISO8601_BASIC: Regex =
        Regex::new(r"([12][0-9]{3})([0-2][0-9])([0-3][0-9])").expect("valid basic date regex");
}

/// Where a resolved date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrigin {
    Filename,
    Timestamp,
}

/// A calendar date as zero-padded digit strings (4/2/2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateKey {
    year: String,
    month: String,
    day: String,
}

impl DateKey {
    fn from_parts(year: &str, month: &str, day: &str) -> Self {
        Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: format!("{:04}", date.year()),
            month: format!("{:02}", date.month()),
            day: format!("{:02}", date.day()),
        }
    }

    /// Local calendar date of a filesystem timestamp.
    pub fn from_timestamp(time: SystemTime) -> Self {
        Self::from_local(&DateTime::<Local>::from(time))
    }

    pub fn from_local<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self::from_date(time.date_naive())
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    /// `YYYY`
    pub fn year_dir(&self) -> String {
        self.year.clone()
    }

    /// `YYYY_MM`
    pub fn month_dir(&self) -> String {
        format!("{}_{}", self.year, self.month)
    }

    /// `YYYY_MM_DD`, also the form used for future-date comparison.
    pub fn day_dir(&self) -> String {
        format!("{}_{}_{}", self.year, self.month, self.day)
    }

    /// Lexicographic comparison of the `YYYY_MM_DD` forms.
    pub fn is_after(&self, today: &DateKey) -> bool {
        self.day_dir() > today.day_dir()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// First date embedded in `filename`, or `None`.
pub fn extract(filename: &str) -> Option<DateKey> {
    ISO8601_EXTENDED
        .captures(filename)
        .or_else(|| ISO8601_BASIC.captures(filename))
        .map(|caps| DateKey::from_parts(&caps[1], &caps[2], &caps[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: &str, month: &str, day: &str) -> DateKey {
        DateKey::from_parts(year, month, day)
    }

    #[test]
    fn test_extended_date_in_name() {
        let date = extract("vacation_2023-05-04_beach.jpg").unwrap();
        assert_eq!(date, key("2023", "05", "04"));
        assert_eq!(date.year_dir(), "2023");
        assert_eq!(date.month_dir(), "2023_05");
        assert_eq!(date.day_dir(), "2023_05_04");
    }

    #[test]
    fn test_basic_date_in_name() {
        assert_eq!(extract("IMG_20230504.jpg"), Some(key("2023", "05", "04")));
    }

    #[test]
    fn test_extended_wins_over_basic() {
        // basic form appears first in the name but the extended form still wins
        let date = extract("IMG_19990101_copy_2023-05-04.jpg").unwrap();
        assert_eq!(date, key("2023", "05", "04"));
    }

    #[test]
    fn test_first_match_is_used() {
        let date = extract("2021-01-02_to_2022-03-04.txt").unwrap();
        assert_eq!(date, key("2021", "01", "02"));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract("notes.txt"), None);
        assert_eq!(extract("3023-05-04.txt"), None);
        assert_eq!(extract("2023-5-4.txt"), None);
        assert_eq!(extract("2023_05_04.txt"), None);
    }

    #[test]
    fn test_lenient_month_and_day() {
        assert_eq!(extract("scan_2023-19-39.pdf"), Some(key("2023", "19", "39")));
        assert_eq!(extract("scan_20232939.pdf"), Some(key("2023", "29", "39")));
    }

    #[test]
    fn test_basic_match_skips_leading_digit() {
        assert_eq!(extract("120230504.bin"), Some(key("2023", "05", "04")));
    }

    #[test]
    fn test_from_date_pads() {
        let date = DateKey::from_date(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(date.day_dir(), "2024_01_09");
        assert_eq!(date.to_string(), "2024-01-09");
    }

    #[test]
    fn test_from_local_uses_calendar_date() {
        let time = chrono::FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2022, 12, 31, 23, 30, 0)
            .unwrap();
        assert_eq!(DateKey::from_local(&time), key("2022", "12", "31"));
    }

    #[test]
    fn test_is_after() {
        let today = key("2024", "01", "01");
        assert!(key("2099", "01", "01").is_after(&today));
        assert!(key("2024", "01", "02").is_after(&today));
        assert!(!key("2024", "01", "01").is_after(&today));
        assert!(!key("2023", "12", "31").is_after(&today));
    }
}
