//! Free-form fallback parser.
//!
//! Used when a string matches none of the structured shapes in
//! [`crate::formats`], and as the safety net when a dedicated parser rejects
//! a string that only looked structured. It tries, in order:
//!
//! 1. RFC 3339 and RFC 2822 as-is.
//! 2. A trailing zone token is split off (`Z`, `±HH:MM`, `±HHMM`, or a known
//!    abbreviation such as `GMT`/`EST`), a leading weekday name is dropped,
//!    and the remainder is tried against a fixed list of date-time layouts,
//!    then date-only layouts (meaning midnight).
//!
//! A string without a zone is read as UTC.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;

use crate::error::Result;
use crate::formats::{numeric_offset, unparseable, zone_abbreviation_offset};

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y%m%d%H%M%S",
    "%Y%m%dT%H%M%S",
    "%d %B %Y %H:%M:%S%.f",
    "%d %B %Y %H:%M",
    "%B %d %Y %H:%M:%S%.f",
    "%B %d, %Y %H:%M:%S%.f",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%d-%B-%Y %H:%M:%S%.f",
    "%d/%B/%Y:%H:%M:%S",
    "%B %e %H:%M:%S %Y",
];

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d %B %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d-%B-%Y",
];

fn patterns() -> &'static GenericPatterns {
    static PATTERNS: OnceLock<GenericPatterns> = OnceLock::new();
    PATTERNS.get_or_init(GenericPatterns::new)
}

struct GenericPatterns {
    // "... 07:06:06 -04:00", "... 07:06:06-0400", "... 07:06:06Z"
    numeric_zone: Regex,
    // "... 07:06:06 GMT"
    named_zone: Regex,
    // "Wed, ", "Wednesday "
    weekday: Regex,
}

impl GenericPatterns {
    fn new() -> Self {
        Self {
            numeric_zone: compile(
                r"^(?P<body>.*?\d)\s*(?:Z|(?P<sign>[+-])(?P<h>\d{2}):?(?P<m>\d{2}))$",
            ),
            named_zone: compile(r"^(?P<body>.*\S)\s+(?P<zone>[A-Za-z]{1,5})$"),
            weekday: compile(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*,?\s+"),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in fallback pattern must compile")
}

/// Parse a date/time string of no particular structured shape.
///
/// # Errors
///
/// Returns [`crate::ConversionError::UnparseableText`] when no layout accepts the string.
pub fn parse_generic(text: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(unparseable(text));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt);
    }

    let (body, offset) = split_zone(trimmed);
    let body = patterns().weekday.replace(body, "");
    let utc = FixedOffset::east_opt(0).ok_or_else(|| unparseable(text))?;

    parse_naive(&body)
        .and_then(|naive| offset.unwrap_or(utc).from_local_datetime(&naive).single())
        .ok_or_else(|| unparseable(text))
}

/// Split a trailing zone token off `s`, if there is one we recognize.
fn split_zone(s: &str) -> (&str, Option<FixedOffset>) {
    let p = patterns();
    if let Some(caps) = p.numeric_zone.captures(s) {
        let offset = match caps.name("sign") {
            Some(sign) => numeric_offset(sign.as_str(), &caps["h"], &caps["m"]),
            None => FixedOffset::east_opt(0),
        };
        if let (Some(offset), Some(body)) = (offset, caps.name("body")) {
            return (body.as_str(), Some(offset));
        }
    }
    if let Some(caps) = p.named_zone.captures(s) {
        if let (Some(offset), Some(body)) =
            (zone_abbreviation_offset(&caps["zone"]), caps.name("body"))
        {
            return (body.as_str(), Some(offset));
        }
    }
    (s, None)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    fn rfc3339(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_space_separated_with_numeric_offset() {
        let dt = parse_generic("2010-09-08 07:06:06 -04:00").unwrap();
        assert_eq!(dt, rfc3339("2010-09-08T11:06:06Z"));
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_attached_offsets() {
        let expected = rfc3339("2010-09-08T11:06:06Z");
        assert_eq!(parse_generic("2010-09-08 07:06:06-0400").unwrap(), expected);
        assert_eq!(parse_generic("2010-09-08 11:06:06Z").unwrap(), expected);
    }

    #[test]
    fn test_named_zone() {
        let dt = parse_generic("2010-09-08 15:06:05 GMT").unwrap();
        assert_eq!(dt, rfc3339("2010-09-08T15:06:05Z"));
        let dt = parse_generic("2010-09-08 10:06:05 EST").unwrap();
        assert_eq!(dt, rfc3339("2010-09-08T15:06:05Z"));
    }

    #[test]
    fn test_no_zone_means_utc() {
        let dt = parse_generic("2011-10-06T02:26:12").unwrap();
        assert_eq!(dt, rfc3339("2011-10-06T02:26:12Z"));
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_fractional_seconds() {
        let dt = parse_generic("2011-10-06 02:26:12.250").unwrap();
        assert_eq!(dt, rfc3339("2011-10-06T02:26:12.25Z"));
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(
            parse_generic("2020-10-09").unwrap(),
            rfc3339("2020-10-09T00:00:00Z")
        );
        assert_eq!(
            parse_generic("October 9, 2020").unwrap(),
            rfc3339("2020-10-09T00:00:00Z")
        );
        assert_eq!(
            parse_generic("9 Oct 2020").unwrap(),
            rfc3339("2020-10-09T00:00:00Z")
        );
    }

    #[test]
    fn test_month_names_and_weekdays() {
        let expected = rfc3339("2010-09-08T07:06:06Z");
        assert_eq!(parse_generic("Sep 8 2010 07:06:06").unwrap(), expected);
        assert_eq!(
            parse_generic("Wednesday, September 8, 2010 07:06:06").unwrap(),
            expected
        );
        // ctime layout
        assert_eq!(parse_generic("Wed Sep  8 07:06:06 2010").unwrap(), expected);
    }

    #[test]
    fn test_wrong_weekday_is_ignored() {
        // Looks like RFC 2822 but the weekday is wrong; the date still wins.
        let dt = parse_generic("Mon, 9 Oct 2020 08:07:06 -05:00").unwrap();
        assert_eq!(dt, rfc3339("2020-10-09T13:07:06Z"));
    }

    #[test]
    fn test_twelve_hour_clock() {
        let dt = parse_generic("2020-10-09 08:07 PM").unwrap();
        assert_eq!(dt, rfc3339("2020-10-09T20:07:00Z"));
    }

    #[test]
    fn test_garbage_is_unparseable() {
        let err = parse_generic("no such luck").unwrap_err();
        assert_eq!(err, ConversionError::UnparseableText("no such luck".into()));
        assert!(parse_generic("   ").is_err());
        assert!(parse_generic("2020-13-45").is_err());
    }
}
