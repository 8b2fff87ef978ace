//! Conversion of heterogeneous time values into an [`Instant`].
//!
//! [`ConvertibleValue`] is the closed set of inputs the rest of the crate
//! accepts. Most callers never name it: every host type that can stand for a
//! point in time (strings, chrono values, `SystemTime`, component arrays,
//! durations, numbers, `Option`) converts into it with `From`.
//!
//! # Rules
//!
//! | Input | Result |
//! |---|---|
//! | `Text` | format detection, dedicated parser, generic parser as fallback |
//! | `Components` | `[year, month, day, hour, minute, second, offset_secs]`, trailing parts default |
//! | `Instant` | returned unchanged |
//! | `Duration` | coerced: now + duration; otherwise the duration itself |
//! | `Numeric` | coerced: seconds since the epoch; otherwise the number itself |
//! | `Date` | midnight UTC of that day |
//! | `Absent` | now |

use std::fmt;
use std::time::SystemTime;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
};
use serde_json::Value;
use tracing::trace;

use crate::error::{ConversionError, Result};
use crate::formats::TextFormat;
use crate::generic::parse_generic;
use crate::instant::Instant;

/// Any value the Converter knows how to turn into a point in time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertibleValue {
    /// A date/time string in a detectable or free-form format.
    Text(String),
    /// An already-canonical instant.
    Instant(Instant),
    /// A calendar date without a time of day.
    Date(NaiveDate),
    /// `[year, month, day, hour, minute, second, offset_secs]`; only the year is required.
    Components(Vec<i64>),
    /// Elapsed time, not an absolute instant.
    Duration(TimeDelta),
    /// Seconds since the Unix epoch when coerced; a plain scalar otherwise.
    Numeric(f64),
    /// No value: means "now".
    Absent,
}

/// The result of a non-coercing conversion.
///
/// Durations and numbers stay scalars unless coercion is requested, so the
/// caller can tell "a point in time" from "an amount of time".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Converted {
    Instant(Instant),
    Duration(TimeDelta),
    Seconds(f64),
}

impl Converted {
    /// The instant, if this conversion produced one.
    pub fn instant(&self) -> Option<Instant> {
        match self {
            Converted::Instant(i) => Some(*i),
            Converted::Duration(_) | Converted::Seconds(_) => None,
        }
    }
}

/// Convert `value` to an [`Instant`], coercing durations and numbers.
///
/// # Errors
///
/// - [`ConversionError::UnparseableText`] when text matches no format.
/// - [`ConversionError::OutOfRange`] when components, numbers or durations
///   name no representable instant.
///
/// # Examples
///
/// ```
/// use easy_time::convert;
///
/// let http = convert("Thu, 06 Oct 2011 02:26:12 GMT").unwrap();
/// let iso = convert("2011-10-06T02:26:12Z").unwrap();
/// assert_eq!(http, iso);
/// ```
pub fn convert(value: impl Into<ConvertibleValue>) -> Result<Instant> {
    match convert_value(value, true)? {
        Converted::Instant(instant) => Ok(instant),
        // Unreachable: coercion always yields an instant.
        other => Err(ConversionError::UnknownType(format!("{other:?}"))),
    }
}

/// Convert `value`, leaving durations and numbers as scalars unless `coerce` is set.
///
/// # Errors
///
/// Same as [`convert`].
pub fn convert_value(value: impl Into<ConvertibleValue>, coerce: bool) -> Result<Converted> {
    let converted = match value.into() {
        ConvertibleValue::Text(text) => Converted::Instant(parse(&text)?),
        ConvertibleValue::Components(parts) => Converted::Instant(from_components(&parts)?),
        ConvertibleValue::Instant(instant) => Converted::Instant(instant),
        ConvertibleValue::Duration(delta) if coerce => {
            let now = Instant::now();
            let instant = now.checked_add(delta).ok_or_else(|| {
                ConversionError::OutOfRange(format!("now ({now}) + {delta}"))
            })?;
            Converted::Instant(instant)
        }
        ConvertibleValue::Duration(delta) => Converted::Duration(delta),
        ConvertibleValue::Numeric(secs) if coerce => Converted::Instant(from_epoch_seconds(secs)?),
        ConvertibleValue::Numeric(secs) => Converted::Seconds(secs),
        ConvertibleValue::Date(date) => {
            let text = format!("{}T00:00:00+00:00", date.format("%Y-%m-%d"));
            Converted::Instant(parse(&text)?)
        }
        ConvertibleValue::Absent => Converted::Instant(Instant::now()),
    };
    Ok(converted)
}

/// Parse a time string: structured format detection first, the generic parser as fallback.
///
/// # Errors
///
/// Returns [`ConversionError::UnparseableText`] if neither the detected
/// format's parser nor the generic parser accepts the string.
pub fn parse(text: &str) -> Result<Instant> {
    let trimmed = text.trim();
    if let Some(format) = TextFormat::detect(trimmed) {
        trace!(?format, text = trimmed, "structured time format detected");
        match format.parse(trimmed) {
            Ok(dt) => return Ok(Instant::from(dt)),
            Err(err) => {
                trace!(?format, %err, "structured parse failed, trying generic parser");
            }
        }
    }
    parse_generic(text).map(Instant::from)
}

fn from_components(parts: &[i64]) -> Result<Instant> {
    let invalid = || ConversionError::OutOfRange(format!("components {parts:?}"));
    if parts.is_empty() || parts.len() > 7 {
        return Err(invalid());
    }
    let field = |index: usize, default: i64| -> Result<u32> {
        u32::try_from(parts.get(index).copied().unwrap_or(default)).map_err(|_| invalid())
    };

    let year = i32::try_from(parts[0]).map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, field(1, 1)?, field(2, 1)?).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(field(3, 0)?, field(4, 0)?, field(5, 0)?)
        .ok_or_else(invalid)?;
    let offset_secs = i32::try_from(parts.get(6).copied().unwrap_or(0)).map_err(|_| invalid())?;
    let offset = FixedOffset::east_opt(offset_secs).ok_or_else(invalid)?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(Instant::from)
        .ok_or_else(invalid)
}

fn from_epoch_seconds(secs: f64) -> Result<Instant> {
    let out_of_range = || ConversionError::OutOfRange(format!("{secs} seconds since epoch"));
    let (whole, nanos) = split_seconds(secs).ok_or_else(out_of_range)?;
    Instant::from_timestamp(whole, nanos).ok_or_else(out_of_range)
}

/// A fractional number of seconds as a [`TimeDelta`].
pub(crate) fn seconds_to_delta(secs: f64) -> Result<TimeDelta> {
    let out_of_range = || ConversionError::OutOfRange(format!("{secs} seconds"));
    let (whole, nanos) = split_seconds(secs).ok_or_else(out_of_range)?;
    TimeDelta::new(whole, nanos).ok_or_else(out_of_range)
}

/// Split into floor seconds and a non-negative nanosecond remainder.
fn split_seconds(secs: f64) -> Option<(i64, u32)> {
    if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
        return None;
    }
    let whole = secs.floor();
    let mut nanos = ((secs - whole) * 1e9).round() as u32;
    let mut whole = whole as i64;
    if nanos >= 1_000_000_000 {
        nanos -= 1_000_000_000;
        whole = whole.checked_add(1)?;
    }
    Some((whole, nanos))
}

// ── Dynamic input ───────────────────────────────────────────────────────────

impl ConvertibleValue {
    /// Build a value from untyped JSON input.
    ///
    /// Strings are text, numbers are numeric, arrays of integers are
    /// components and `null` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnknownType`] for booleans, objects and
    /// arrays that are not all integers, carrying the JSON rendering.
    pub fn from_json(value: &Value) -> Result<Self> {
        let unknown = || ConversionError::UnknownType(value.to_string());
        match value {
            Value::Null => Ok(ConvertibleValue::Absent),
            Value::String(s) => Ok(ConvertibleValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(ConvertibleValue::Numeric).ok_or_else(unknown),
            Value::Array(items) => items
                .iter()
                .map(Value::as_i64)
                .collect::<Option<Vec<_>>>()
                .map(ConvertibleValue::Components)
                .ok_or_else(unknown),
            Value::Bool(_) | Value::Object(_) => Err(unknown()),
        }
    }
}

impl TryFrom<&Value> for ConvertibleValue {
    type Error = ConversionError;

    fn try_from(value: &Value) -> Result<Self> {
        ConvertibleValue::from_json(value)
    }
}

impl fmt::Display for ConvertibleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertibleValue::Text(s) => write!(f, "'{s}'"),
            ConvertibleValue::Instant(i) => write!(f, "{i}"),
            ConvertibleValue::Date(d) => write!(f, "{d}"),
            ConvertibleValue::Components(parts) => write!(f, "{parts:?}"),
            ConvertibleValue::Duration(d) => write!(f, "{d}"),
            ConvertibleValue::Numeric(n) => write!(f, "{n}"),
            ConvertibleValue::Absent => f.write_str("now"),
        }
    }
}

// ── From impls ──────────────────────────────────────────────────────────────

impl From<&str> for ConvertibleValue {
    fn from(s: &str) -> Self {
        ConvertibleValue::Text(s.to_string())
    }
}

impl From<String> for ConvertibleValue {
    fn from(s: String) -> Self {
        ConvertibleValue::Text(s)
    }
}

impl From<&String> for ConvertibleValue {
    fn from(s: &String) -> Self {
        ConvertibleValue::Text(s.clone())
    }
}

impl From<Instant> for ConvertibleValue {
    fn from(instant: Instant) -> Self {
        ConvertibleValue::Instant(instant)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ConvertibleValue {
    fn from(dt: DateTime<Tz>) -> Self {
        ConvertibleValue::Instant(Instant::from(dt))
    }
}

/// Naive date-times are read as UTC.
impl From<NaiveDateTime> for ConvertibleValue {
    fn from(naive: NaiveDateTime) -> Self {
        ConvertibleValue::Instant(Instant::from(naive.and_utc()))
    }
}

impl From<SystemTime> for ConvertibleValue {
    fn from(t: SystemTime) -> Self {
        ConvertibleValue::Instant(Instant::from(t))
    }
}

impl From<NaiveDate> for ConvertibleValue {
    fn from(date: NaiveDate) -> Self {
        ConvertibleValue::Date(date)
    }
}

impl From<Vec<i64>> for ConvertibleValue {
    fn from(parts: Vec<i64>) -> Self {
        ConvertibleValue::Components(parts)
    }
}

impl From<&[i64]> for ConvertibleValue {
    fn from(parts: &[i64]) -> Self {
        ConvertibleValue::Components(parts.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for ConvertibleValue {
    fn from(parts: [i64; N]) -> Self {
        ConvertibleValue::Components(parts.to_vec())
    }
}

impl From<TimeDelta> for ConvertibleValue {
    fn from(delta: TimeDelta) -> Self {
        ConvertibleValue::Duration(delta)
    }
}

/// Durations beyond chrono's range saturate, and then fail when coerced.
impl From<std::time::Duration> for ConvertibleValue {
    fn from(d: std::time::Duration) -> Self {
        ConvertibleValue::Duration(TimeDelta::from_std(d).unwrap_or(TimeDelta::MAX))
    }
}

impl From<i64> for ConvertibleValue {
    fn from(n: i64) -> Self {
        ConvertibleValue::Numeric(n as f64)
    }
}

impl From<i32> for ConvertibleValue {
    fn from(n: i32) -> Self {
        ConvertibleValue::Numeric(f64::from(n))
    }
}

impl From<u32> for ConvertibleValue {
    fn from(n: u32) -> Self {
        ConvertibleValue::Numeric(f64::from(n))
    }
}

impl From<f64> for ConvertibleValue {
    fn from(n: f64) -> Self {
        ConvertibleValue::Numeric(n)
    }
}

impl From<()> for ConvertibleValue {
    fn from(_: ()) -> Self {
        ConvertibleValue::Absent
    }
}

impl<T: Into<ConvertibleValue>> From<Option<T>> for ConvertibleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConvertibleValue::Absent, Into::into)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn rfc3339(s: &str) -> Instant {
        Instant::from(DateTime::parse_from_rfc3339(s).unwrap())
    }

    // ── text ────────────────────────────────────────────────────────────

    #[test]
    fn test_text_httpdate_matches_iso8601() {
        assert_eq!(
            convert("Thu, 06 Oct 2011 02:26:12 GMT").unwrap(),
            convert("2011-10-06T02:26:12Z").unwrap()
        );
    }

    #[test]
    fn test_text_keeps_offset_for_display() {
        let i = convert("2020-10-09T08:07:06-05:00").unwrap();
        assert_eq!(i.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(i.to_xmlschema(), "2020-10-09T08:07:06-05:00");
    }

    #[test]
    fn test_text_structured_failure_falls_back() {
        // RFC 2822 shape with the wrong weekday: the strict parser rejects it,
        // the generic parser accepts it.
        let i = convert("Mon, 9 Oct 2020 08:07:06 -05:00").unwrap();
        assert_eq!(i, rfc3339("2020-10-09T13:07:06Z"));
    }

    #[test]
    fn test_text_surrounding_whitespace() {
        assert_eq!(
            convert("  2011-10-06T02:26:12Z \n").unwrap(),
            rfc3339("2011-10-06T02:26:12Z")
        );
    }

    #[test]
    fn test_text_unparseable() {
        let err = convert("no such luck").unwrap_err();
        assert!(matches!(err, ConversionError::UnparseableText(ref s) if s == "no such luck"));
        assert!(err.to_string().contains("no such luck"), "got: {err}");
    }

    // ── components ──────────────────────────────────────────────────────

    #[test]
    fn test_components_full() {
        let i = convert([2020i64, 10, 9, 8, 7, 6, -5 * 3600]).unwrap();
        assert_eq!(i, rfc3339("2020-10-09T08:07:06-05:00"));
        assert_eq!(i.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_components_trailing_defaults() {
        assert_eq!(convert(vec![2020i64]).unwrap(), rfc3339("2020-01-01T00:00:00Z"));
        assert_eq!(
            convert(vec![2020i64, 10, 9]).unwrap(),
            rfc3339("2020-10-09T00:00:00Z")
        );
    }

    #[test]
    fn test_components_invalid() {
        for parts in [Vec::<i64>::new(), vec![2020, 13], vec![2020, 2, 30], vec![2020, 1, 1, 24]] {
            let err = convert(parts.clone()).unwrap_err();
            assert!(matches!(err, ConversionError::OutOfRange(_)), "{parts:?}");
        }
        assert!(convert(vec![2020i64, 1, 1, 0, 0, 0, 0, 0]).is_err());
        assert!(convert(vec![2020i64, 1, 1, 0, 0, 0, 90_000]).is_err());
        assert!(convert(vec![2020i64, -1]).is_err());
    }

    // ── instants ────────────────────────────────────────────────────────

    #[test]
    fn test_instant_is_idempotent() {
        let i = rfc3339("2020-10-09T08:07:06-05:00");
        let converted = convert(i).unwrap();
        assert_eq!(converted, i);
        assert_eq!(converted.offset(), i.offset());
    }

    #[test]
    fn test_chrono_and_system_time() {
        let utc = Utc.with_ymd_and_hms(2020, 10, 9, 13, 7, 6).unwrap();
        assert_eq!(convert(utc).unwrap(), rfc3339("2020-10-09T13:07:06Z"));
        assert_eq!(
            convert(utc.naive_utc()).unwrap(),
            rfc3339("2020-10-09T13:07:06Z")
        );
        let system: SystemTime = utc.into();
        assert_eq!(convert(system).unwrap(), rfc3339("2020-10-09T13:07:06Z"));
    }

    // ── dates ───────────────────────────────────────────────────────────

    #[test]
    fn test_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2020, 10, 9).unwrap();
        let i = convert(date).unwrap();
        assert_eq!(i, rfc3339("2020-10-09T00:00:00Z"));
        assert_eq!(i.offset().local_minus_utc(), 0);
    }

    // ── durations and numbers ───────────────────────────────────────────

    #[test]
    fn test_duration_coerced_is_from_now() {
        let before = Instant::now();
        let i = convert(TimeDelta::hours(1)).unwrap();
        let after = Instant::now();
        assert!(i >= before + TimeDelta::hours(1));
        assert!(i <= after + TimeDelta::hours(1));
    }

    #[test]
    fn test_duration_not_coerced_passes_through() {
        assert_eq!(
            convert_value(TimeDelta::hours(1), false).unwrap(),
            Converted::Duration(TimeDelta::hours(1))
        );
        assert_eq!(
            convert_value(std::time::Duration::from_secs(90), false).unwrap(),
            Converted::Duration(TimeDelta::seconds(90))
        );
    }

    #[test]
    fn test_duration_overflow() {
        let err = convert(std::time::Duration::MAX).unwrap_err();
        assert!(matches!(err, ConversionError::OutOfRange(_)));
    }

    #[test]
    fn test_numeric_coerced_is_epoch_seconds() {
        let i = convert(1_602_248_826i64).unwrap();
        assert_eq!(i, rfc3339("2020-10-09T13:07:06Z"));
        let i = convert(-0.5).unwrap();
        assert_eq!(i.timestamp(), -1);
        assert_eq!(i.subsec_nanos(), 500_000_000);
    }

    #[test]
    fn test_numeric_not_coerced_passes_through() {
        assert_eq!(convert_value(3600, false).unwrap(), Converted::Seconds(3600.0));
        assert_eq!(convert_value(3600, false).unwrap().instant(), None);
    }

    #[test]
    fn test_numeric_out_of_range() {
        assert!(matches!(
            convert(f64::NAN).unwrap_err(),
            ConversionError::OutOfRange(_)
        ));
        assert!(convert(1e30).is_err());
    }

    #[test]
    fn test_seconds_to_delta() {
        assert_eq!(seconds_to_delta(1.5).unwrap(), TimeDelta::milliseconds(1_500));
        assert_eq!(seconds_to_delta(-1.5).unwrap(), TimeDelta::milliseconds(-1_500));
        assert!(seconds_to_delta(f64::INFINITY).is_err());
    }

    // ── absent ──────────────────────────────────────────────────────────

    #[test]
    fn test_absent_is_now() {
        let before = Instant::now();
        let i = convert(ConvertibleValue::Absent).unwrap();
        assert!(i >= before && i <= Instant::now());
        assert!(convert(None::<&str>).unwrap() >= before);
        assert!(convert(()).unwrap() >= before);
    }

    // ── json ────────────────────────────────────────────────────────────

    #[test]
    fn test_from_json_variants() {
        assert_eq!(
            ConvertibleValue::from_json(&json!("2020-10-09")).unwrap(),
            ConvertibleValue::Text("2020-10-09".into())
        );
        assert_eq!(
            ConvertibleValue::from_json(&json!(12.5)).unwrap(),
            ConvertibleValue::Numeric(12.5)
        );
        assert_eq!(
            ConvertibleValue::from_json(&json!([2020, 10, 9])).unwrap(),
            ConvertibleValue::Components(vec![2020, 10, 9])
        );
        assert_eq!(
            ConvertibleValue::from_json(&json!(null)).unwrap(),
            ConvertibleValue::Absent
        );
    }

    #[test]
    fn test_from_json_unknown_type() {
        for value in [json!(true), json!({"at": 1}), json!([2020, "10"])] {
            let err = ConvertibleValue::try_from(&value).unwrap_err();
            assert_eq!(err, ConversionError::UnknownType(value.to_string()));
            assert!(err.to_string().contains("Unknown time value type"));
        }
    }
}
