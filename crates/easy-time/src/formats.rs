//! Structural format detection for time strings.
//!
//! A time string is tested against four shapes in a fixed order and the
//! first match selects a strict, dedicated parser:
//!
//! 1. [`TextFormat::Rfc2822`] — `Fri, 9 Oct 2020 08:07:06 -05:00`
//! 2. [`TextFormat::HttpDate`] — `Thu, 06 Oct 2011 02:26:12 GMT`
//! 3. [`TextFormat::XmlSchema`] — `2020-10-09T08:07:06-05:00`
//! 4. [`TextFormat::Iso8601`] — `2011-10-06T02:26:12Z`, `2020-283T0807Z`, `--10-09T08+01:00`, ...
//!
//! Detection is advisory. The Converter always keeps the generic parser in
//! [`crate::generic`] as a backstop when the dedicated parser rejects a string
//! that merely looks like one of these shapes.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::{Captures, Regex};

use crate::error::{ConversionError, Result};

/// One of the structured string shapes recognized before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormat {
    /// `Www, D Mon YYYY HH:MM:SS ±HH:MM` (colon in the offset optional).
    Rfc2822,
    /// RFC 2822 shape with an alphabetic zone name such as `GMT`.
    HttpDate,
    /// Exactly `YYYY-MM-DDTHH:MM:SS±HH:MM`.
    XmlSchema,
    /// The broad ISO 8601 `date T time zone` grammar.
    Iso8601,
}

impl TextFormat {
    /// All formats in detection order.
    pub const ALL: [TextFormat; 4] = [
        TextFormat::Rfc2822,
        TextFormat::HttpDate,
        TextFormat::XmlSchema,
        TextFormat::Iso8601,
    ];

    /// Return the first format whose shape matches `text`, if any.
    pub fn detect(text: &str) -> Option<TextFormat> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.pattern().is_match(text))
    }

    /// Parse `text` strictly as this format.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnparseableText`] if `text` does not have this
    /// format's shape or names an impossible date (e.g. a weekday that does not
    /// match the date, or `Feb 30`).
    pub fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>> {
        let text = text.trim();
        let caps = self
            .pattern()
            .captures(text)
            .ok_or_else(|| unparseable(text))?;
        match self {
            TextFormat::Rfc2822 => parse_rfc2822(text, &caps),
            TextFormat::HttpDate => parse_httpdate(text, &caps),
            TextFormat::XmlSchema => {
                DateTime::parse_from_rfc3339(text).map_err(|_| unparseable(text))
            }
            TextFormat::Iso8601 => parse_iso8601(&caps).ok_or_else(|| unparseable(text)),
        }
    }

    fn pattern(&self) -> &'static Regex {
        let p = patterns();
        match self {
            TextFormat::Rfc2822 => &p.rfc2822,
            TextFormat::HttpDate => &p.httpdate,
            TextFormat::XmlSchema => &p.xmlschema,
            TextFormat::Iso8601 => &p.iso8601,
        }
    }
}

pub(crate) fn unparseable(text: &str) -> ConversionError {
    ConversionError::UnparseableText(text.to_string())
}

// ── Patterns ────────────────────────────────────────────────────────────────

fn patterns() -> &'static FormatPatterns {
    static PATTERNS: OnceLock<FormatPatterns> = OnceLock::new();
    PATTERNS.get_or_init(FormatPatterns::new)
}

struct FormatPatterns {
    rfc2822: Regex,
    httpdate: Regex,
    xmlschema: Regex,
    iso8601: Regex,
}

/// `Www, D Mon YYYY HH:MM:SS`, shared by the RFC 2822 and HTTP-date shapes.
const RFC2822_BODY: &str =
    r"(?P<body>[A-Za-z]{3},\s+\d{1,2}\s+[A-Za-z]{3}\s+\d{4}\s+\d{2}:\d{2}:\d{2})";

const ISO8601_DATE: &str = concat!(
    r"(?:(?P<y>\d{4})-(?P<m>\d{2})-(?P<d>\d{2})",
    r"|(?P<ym_y>\d{4})-(?P<ym_m>\d{2})",
    r"|(?P<o_y>\d{4})-(?P<o_d>\d{3})",
    r"|(?P<c_y>\d{4})(?P<c_m>\d{2})(?P<c_d>\d{2})",
    r"|(?P<co_y>\d{4})(?P<co_d>\d{3})",
    r"|--(?P<md_m>\d{2})-(?P<md_d>\d{2}))",
);

const ISO8601_TIME: &str = concat!(
    r"(?:(?P<hh>\d{2}):(?P<mi>\d{2}):(?P<ss>\d{2})(?:[.,](?P<frac>\d+))?",
    r"|(?P<c_hh>\d{2})(?P<c_mi>\d{2})(?P<c_ss>\d{2})(?:[.,](?P<c_frac>\d+))?",
    r"|(?P<hm_h>\d{2}):?(?P<hm_m>\d{2})",
    r"|(?P<h>\d{2}))",
);

const ISO8601_ZONE: &str = r"(?P<zone>Z|(?P<z_sign>[+-])(?P<z_h>\d{2}):?(?P<z_m>\d{2}))";

impl FormatPatterns {
    fn new() -> Self {
        Self {
            rfc2822: compile(&format!(
                r"^{RFC2822_BODY}\s+(?P<sign>[+-])(?P<off_h>\d{{2}}):?(?P<off_m>\d{{2}})$"
            )),
            httpdate: compile(&format!(r"^{RFC2822_BODY}\s+(?P<zone>[A-Za-z]+)$")),
            xmlschema: compile(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2}$"),
            iso8601: compile(&format!(r"^{ISO8601_DATE}T{ISO8601_TIME}{ISO8601_ZONE}$")),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in time format pattern must compile")
}

// ── Zone names ──────────────────────────────────────────────────────────────

/// Offset for the zone abbreviations RFC 2822 and common HTTP/log formats use.
///
/// Lookup is case-insensitive. Returns `None` for anything else; there is no
/// timezone database behind this.
pub(crate) fn zone_abbreviation_offset(name: &str) -> Option<FixedOffset> {
    let hours = match name.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" | "UT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// Build an offset from a sign and `HH`/`MM` digit strings.
pub(crate) fn numeric_offset(sign: &str, hours: &str, minutes: &str) -> Option<FixedOffset> {
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let secs = hours * 3600 + minutes * 60;
    match sign {
        "-" => FixedOffset::west_opt(secs),
        _ => FixedOffset::east_opt(secs),
    }
}

// ── Dedicated parsers ───────────────────────────────────────────────────────

/// chrono's RFC 2822 parser wants `±HHMM`, so the colon form is rewritten first.
fn parse_rfc2822(text: &str, caps: &Captures<'_>) -> Result<DateTime<FixedOffset>> {
    let normalized = format!(
        "{} {}{}{}",
        &caps["body"], &caps["sign"], &caps["off_h"], &caps["off_m"]
    );
    DateTime::parse_from_rfc2822(&normalized).map_err(|_| unparseable(text))
}

fn parse_httpdate(text: &str, caps: &Captures<'_>) -> Result<DateTime<FixedOffset>> {
    let offset = zone_abbreviation_offset(&caps["zone"]).ok_or_else(|| unparseable(text))?;
    let normalized = format!("{} {}", &caps["body"], offset_compact(offset));
    DateTime::parse_from_rfc2822(&normalized).map_err(|_| unparseable(text))
}

fn offset_compact(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    format!("{sign}{:02}{:02}", abs / 3600, (abs % 3600) / 60)
}

fn parse_iso8601(caps: &Captures<'_>) -> Option<DateTime<FixedOffset>> {
    let date = iso8601_date(caps)?;
    let time = iso8601_time(caps)?;
    let offset = match caps.name("z_sign") {
        Some(sign) => numeric_offset(sign.as_str(), &caps["z_h"], &caps["z_m"])?,
        None => FixedOffset::east_opt(0)?,
    };
    offset.from_local_datetime(&date.and_time(time)).single()
}

fn num<T: FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

fn iso8601_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    if let Some(year) = num(caps, "y") {
        return NaiveDate::from_ymd_opt(year, num(caps, "m")?, num(caps, "d")?);
    }
    if let Some(year) = num(caps, "ym_y") {
        return NaiveDate::from_ymd_opt(year, num(caps, "ym_m")?, 1);
    }
    if let Some(year) = num(caps, "o_y") {
        return NaiveDate::from_yo_opt(year, num(caps, "o_d")?);
    }
    if let Some(year) = num(caps, "c_y") {
        return NaiveDate::from_ymd_opt(year, num(caps, "c_m")?, num(caps, "c_d")?);
    }
    if let Some(year) = num(caps, "co_y") {
        return NaiveDate::from_yo_opt(year, num(caps, "co_d")?);
    }
    // `--MM-DD` has no year; it means this year.
    NaiveDate::from_ymd_opt(Utc::now().year(), num(caps, "md_m")?, num(caps, "md_d")?)
}

fn iso8601_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    let (hour, minute, second, fraction) = if let Some(hour) = num(caps, "hh") {
        (hour, num(caps, "mi")?, num(caps, "ss")?, caps.name("frac"))
    } else if let Some(hour) = num(caps, "c_hh") {
        (hour, num(caps, "c_mi")?, num(caps, "c_ss")?, caps.name("c_frac"))
    } else if let Some(hour) = num(caps, "hm_h") {
        (hour, num(caps, "hm_m")?, 0, None)
    } else {
        (num(caps, "h")?, 0, 0, None)
    };
    let nanos = fraction.map_or(0, |f| fraction_to_nanos(f.as_str()));
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

/// Read up to nine fractional digits as nanoseconds; extra digits are truncated.
pub(crate) fn fraction_to_nanos(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}

// ── Tests ───────────────────────────────────────────────────────────────────
