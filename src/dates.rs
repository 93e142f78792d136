//! Free-text date normalization.
//!
//! Listing pages print dates for people ("Jan 2, 2025", "Thursday, January 2,
//! 2025"), not machines. [`normalize_date`] turns such text into a
//! timezone-aware instant and never fails: text it cannot read is replaced by
//! the current time and reported in the logs.
//!
//! # Accepted input
//!
//! - RFC 3339 and RFC 2822 timestamps
//! - Month-name dates in either order (`Jan 2 2025`, `2 January 2025`,
//!   `Sept 5 2024`),
//!   optionally prefixed by a weekday and with ordinal suffixes (`2nd`)
//! - Numeric dates (`2025-01-02`, `2025/01/02`, `01/02/2025`, month first)
//! - An optional time (`14:30`, `14:30:05`, `2:30 PM`) and an optional
//!   offset (`+0200`, `+02:00`) or `UTC`/`GMT`/`Z` marker
//!
//! Commas and letter case are ignored. Inputs without an offset are UTC.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt;
use tracing::{debug, warn};

static WEEKDAY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").unwrap());
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());
static SEPT_ABBREVIATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsept\b\.?").unwrap());
static UTC_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\s+(?:utc|gmt)|(?P<digit>\d)z)$").unwrap());

/// Largest year an RSS `pubDate` can carry.
const MAX_YEAR: i32 = 9999;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
    "%B %d %Y %H:%M:%S %z",
    "%B %d %Y %H:%M %z",
    "%d %B %Y %H:%M:%S %z",
    "%d %B %Y %H:%M %z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%B %d %Y", "%d %B %Y", "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Why a piece of date text could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    text: String,
    reason: &'static str,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse date {:?}: {}", self.text, self.reason)
    }
}

impl Error for DateParseError {}

/// Parse date text strictly, attaching UTC when the text carries no offset.
///
/// # Errors
///
/// Returns [`DateParseError`] when the text is empty or matches none of the
/// accepted layouts, or when the year does not fit RFC 2822's four digits.
pub fn parse_date(text: &str) -> Result<DateTime<FixedOffset>, DateParseError> {
    let text = text.trim();
    let dt = parse_layouts(text)?;
    if !(0..=MAX_YEAR).contains(&dt.year()) {
        return Err(DateParseError {
            text: text.to_string(),
            reason: "year outside 0..=9999",
        });
    }
    Ok(dt)
}

fn parse_layouts(text: &str) -> Result<DateTime<FixedOffset>, DateParseError> {
    if text.is_empty() {
        return Err(DateParseError {
            text: text.to_string(),
            reason: "empty date text",
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt);
    }

    let cleaned = clean_date_text(text);
    let utc_marked = UTC_MARKER.is_match(&cleaned);
    let body = UTC_MARKER.replace(&cleaned, "$digit");

    if !utc_marked {
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&body, format) {
                return Ok(dt);
            }
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&body, format) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&body, format) {
            let naive = date.and_time(NaiveTime::MIN);
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    Err(DateParseError {
        text: text.to_string(),
        reason: "no supported date layout matches",
    })
}

/// Normalize scraped date text into a timezone-aware instant.
///
/// Never fails: unreadable text yields the current UTC instant and a `warn`
/// log carrying the original text.
pub fn normalize_date(raw: &str) -> DateTime<FixedOffset> {
    match parse_date(raw) {
        Ok(dt) => {
            debug!(raw = %raw.trim(), parsed = %dt.to_rfc3339(), "Normalized date");
            dt
        }
        Err(e) => {
            warn!(raw = %raw.trim(), error = %e, "Falling back to current time for unparseable date");
            Utc::now().fixed_offset()
        }
    }
}

/// Strip weekday prefixes, ordinal suffixes and commas, spell "Sept" as
/// "Sep" and collapse whitespace.
fn clean_date_text(text: &str) -> String {
    let text = WEEKDAY_PREFIX.replace(text, "");
    let text = ORDINAL_SUFFIX.replace_all(&text, "$1");
    let text = SEPT_ABBREVIATION.replace_all(&text, "Sep");
    text.replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap().fixed_offset()
    }

    #[test]
    fn test_abbreviated_month() {
        assert_eq!(parse_date("Jan 2, 2025").unwrap(), utc(2025, 1, 2, 0, 0, 0));
    }

    #[test]
    fn test_full_month_name() {
        assert_eq!(
            parse_date("September 30, 2024").unwrap(),
            utc(2024, 9, 30, 0, 0, 0)
        );
    }

    #[test]
    fn test_weekday_prefix() {
        assert_eq!(
            parse_date("Thursday, January 2, 2025").unwrap(),
            utc(2025, 1, 2, 0, 0, 0)
        );
        assert_eq!(parse_date("Thu Jan 2 2025").unwrap(), utc(2025, 1, 2, 0, 0, 0));
    }

    #[test]
    fn test_ordinal_day() {
        assert_eq!(parse_date("March 3rd, 2025").unwrap(), utc(2025, 3, 3, 0, 0, 0));
        assert_eq!(parse_date("21st Feb 2025").unwrap(), utc(2025, 2, 21, 0, 0, 0));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(
            parse_date("  \n Dec 25, 2024 \t").unwrap(),
            utc(2024, 12, 25, 0, 0, 0)
        );
    }

    #[test]
    fn test_numeric_layouts() {
        assert_eq!(parse_date("2025-01-02").unwrap(), utc(2025, 1, 2, 0, 0, 0));
        assert_eq!(parse_date("2025/01/02").unwrap(), utc(2025, 1, 2, 0, 0, 0));
        assert_eq!(parse_date("01/02/2025").unwrap(), utc(2025, 1, 2, 0, 0, 0));
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            parse_date("Jan 2, 2025 2:30 PM").unwrap(),
            utc(2025, 1, 2, 14, 30, 0)
        );
        assert_eq!(
            parse_date("2025-01-02 09:15:07").unwrap(),
            utc(2025, 1, 2, 9, 15, 7)
        );
    }

    #[test]
    fn test_explicit_offset_is_preserved() {
        let dt = parse_date("Thu, 02 Jan 2025 10:00:00 +0200").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(dt, utc(2025, 1, 2, 8, 0, 0));

        let dt = parse_date("2025-01-02T10:00:00-05:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);

        let dt = parse_date("Jan 2, 2025 10:00 +05:30").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn test_utc_markers() {
        assert_eq!(
            parse_date("Jan 2, 2025 10:00 UTC").unwrap(),
            utc(2025, 1, 2, 10, 0, 0)
        );
        assert_eq!(
            parse_date("2025-01-02T10:00:00Z").unwrap(),
            utc(2025, 1, 2, 10, 0, 0)
        );
    }

    #[test]
    fn test_naive_input_gets_utc() {
        let dt = parse_date("2025-01-02T10:00:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_date("").is_err());
        assert!(parse_date("not a date").is_err());
        assert!(parse_date("Feb 30, 2025").is_err());
        let err = parse_date("soon").unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_normalize_falls_back_to_now() {
        let before = Utc::now();
        let dt = normalize_date("coming soon");
        let after = Utc::now();

        assert_eq!(dt.offset().local_minus_utc(), 0);
        let dt = dt.with_timezone(&Utc);
        assert!(dt >= before && dt <= after);
    }

    #[test]
    fn test_normalize_parses_valid_text() {
        assert_eq!(normalize_date("Jan 1, 2025"), utc(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_clean_date_text() {
        assert_eq!(clean_date_text("Monday, June 2nd,  2025"), "June 2 2025");
        assert_eq!(clean_date_text("Sept. 5, 2024"), "Sep 5 2024");
        assert_eq!(clean_date_text("September 5, 2024"), "September 5 2024");
    }

    #[test]
    fn test_full_month_names_with_time_and_offset() {
        assert_eq!(
            parse_date("January 2, 2025 2:30 PM").unwrap(),
            utc(2025, 1, 2, 14, 30, 0)
        );
        assert_eq!(
            parse_date("2 February 2025 10:00 UTC").unwrap(),
            utc(2025, 2, 2, 10, 0, 0)
        );
        let dt = parse_date("December 24, 2024 18:00 +0100").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 3600);
        assert_eq!(dt, utc(2024, 12, 24, 17, 0, 0));
    }

    #[test]
    fn test_sept_abbreviation() {
        assert_eq!(parse_date("Sept 5, 2024").unwrap(), utc(2024, 9, 5, 0, 0, 0));
        assert_eq!(parse_date("Sept. 5, 2024").unwrap(), utc(2024, 9, 5, 0, 0, 0));
    }

    #[test]
    fn test_year_without_four_digits_is_rejected() {
        let err = parse_date("+12345-01-02").unwrap_err();
        assert!(err.to_string().contains("year outside"));
        assert!(parse_date("-0044-03-15").is_err());
        assert_eq!(parse_date("9999-12-31").unwrap(), utc(9999, 12, 31, 0, 0, 0));
    }

    #[test]
    fn test_normalize_out_of_range_year_falls_back_to_now() {
        let before = Utc::now();
        let dt = normalize_date("+12345-01-02").with_timezone(&Utc);
        assert!(dt >= before && dt <= Utc::now());
        // The fallback must be renderable as an RSS pubDate.
        assert!(!dt.to_rfc2822().is_empty());
    }
}
