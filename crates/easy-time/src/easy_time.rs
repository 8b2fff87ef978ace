//! [`EasyTime`]: an instant that compares with a tolerance.
//!
//! An `EasyTime` owns one [`Instant`] and optionally its own [`Tolerance`].
//! Every comparison and arithmetic operation accepts any convertible value
//! as its other operand. Deriving a new value (changing the tolerance,
//! subtracting a duration) copies the receiver; only the `+=`/`-=` operators
//! change a value in place.
//!
//! The standard comparison operators are implemented against other
//! `EasyTime`s, [`Instant`]s and chrono `DateTime`s, whose conversion cannot
//! fail. Text and other fallible operands go through the `Result`-returning
//! methods, so a bad operand is an error rather than a silent `false`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use serde::{Serialize, Serializer};

use crate::compare::{compare_instants, instant_within, IntoTimeBounds, TimeBounds};
use crate::convert::{convert, convert_value, seconds_to_delta, Converted, ConvertibleValue};
use crate::error::{ConversionError, Result};
use crate::formats::TextFormat;
use crate::instant::Instant;
use crate::tolerance::Tolerance;

/// A point in time that treats nearby points as equal.
#[derive(Debug, Clone, Copy)]
pub struct EasyTime {
    instant: Instant,
    tolerance: Option<Tolerance>,
}

/// The result of [`EasyTime::subtract`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Difference {
    /// The operand was a point in time: the signed distance to it.
    Duration(TimeDelta),
    /// The operand was an amount of time: the shifted value.
    Time(EasyTime),
}

impl EasyTime {
    /// Wrap any convertible value, optionally overriding the tolerance.
    ///
    /// # Errors
    ///
    /// Returns the [`ConversionError`] from converting `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use easy_time::{EasyTime, Tolerance};
    ///
    /// let local = EasyTime::new("2020-10-09T08:07:06-05:00", None).unwrap();
    /// let remote = EasyTime::new("Fri, 09 Oct 2020 13:07:36 GMT", None).unwrap();
    /// assert!(local.is_same(remote, None).unwrap());
    ///
    /// let strict = local.with_tolerance(Tolerance::NONE);
    /// assert!(strict.is_older(remote, None).unwrap());
    /// ```
    pub fn new(value: impl Into<ConvertibleValue>, tolerance: Option<Tolerance>) -> Result<Self> {
        Ok(EasyTime {
            instant: convert(value)?,
            tolerance,
        })
    }

    /// Wrap an instant with no tolerance override.
    pub fn from_instant(instant: Instant) -> Self {
        EasyTime {
            instant,
            tolerance: None,
        }
    }

    pub fn now() -> Self {
        Self::from_instant(Instant::now())
    }

    /// Seconds since the Unix epoch, fractional seconds kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::OutOfRange`] for non-finite or unrepresentable values.
    pub fn at(secs: f64) -> Result<Self> {
        Self::new(ConvertibleValue::Numeric(secs), None)
    }

    /// Parse a time string with format detection and the generic fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnparseableText`] if nothing accepts the string.
    pub fn parse(text: &str) -> Result<Self> {
        crate::convert::parse(text).map(Self::from_instant)
    }

    /// Parse strictly as RFC 2822; no fallback.
    pub fn rfc2822(text: &str) -> Result<Self> {
        Self::parse_strict(TextFormat::Rfc2822, text)
    }

    /// Parse strictly as an HTTP-date; no fallback.
    pub fn httpdate(text: &str) -> Result<Self> {
        Self::parse_strict(TextFormat::HttpDate, text)
    }

    /// Parse strictly as an XML Schema `dateTime`; no fallback.
    pub fn xmlschema(text: &str) -> Result<Self> {
        Self::parse_strict(TextFormat::XmlSchema, text)
    }

    /// Parse strictly as ISO 8601 (XML Schema strings are ISO 8601 too); no fallback.
    pub fn iso8601(text: &str) -> Result<Self> {
        TextFormat::Iso8601
            .parse(text)
            .or_else(|_| TextFormat::XmlSchema.parse(text))
            .map(|dt| Self::from_instant(Instant::from(dt)))
    }

    fn parse_strict(format: TextFormat, text: &str) -> Result<Self> {
        format
            .parse(text)
            .map(|dt| Self::from_instant(Instant::from(dt)))
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    /// The tolerance this value compares with: its override or the process-wide default.
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::resolve(None, self.tolerance)
    }

    pub fn tolerance_override(&self) -> Option<Tolerance> {
        self.tolerance
    }

    /// A copy of this value with a different tolerance.
    pub fn with_tolerance(&self, tolerance: impl Into<Tolerance>) -> Self {
        EasyTime {
            tolerance: Some(tolerance.into()),
            ..*self
        }
    }

    /// A copy of this value that follows the process-wide default tolerance.
    pub fn with_default_tolerance(&self) -> Self {
        EasyTime {
            tolerance: None,
            ..*self
        }
    }

    /// The same instant displayed in another offset. The tolerance override is kept.
    pub fn in_offset(&self, offset: FixedOffset) -> Self {
        EasyTime {
            instant: self.instant.with_offset(offset),
            ..*self
        }
    }

    // ── comparison ──────────────────────────────────────────────────────

    /// Tolerantly compare with `other`.
    ///
    /// `tolerance` overrides this value's tolerance for this call only.
    ///
    /// # Errors
    ///
    /// Returns the [`ConversionError`] from converting `other`.
    pub fn compare(
        &self,
        other: impl Into<ConvertibleValue>,
        tolerance: Option<Tolerance>,
    ) -> Result<Ordering> {
        let other = convert(other)?;
        Ok(compare_instants(
            &self.instant,
            &other,
            Tolerance::resolve(tolerance, self.tolerance),
        ))
    }

    pub fn is_newer(
        &self,
        other: impl Into<ConvertibleValue>,
        tolerance: Option<Tolerance>,
    ) -> Result<bool> {
        Ok(self.compare(other, tolerance)?.is_gt())
    }

    pub fn is_older(
        &self,
        other: impl Into<ConvertibleValue>,
        tolerance: Option<Tolerance>,
    ) -> Result<bool> {
        Ok(self.compare(other, tolerance)?.is_lt())
    }

    pub fn is_same(
        &self,
        other: impl Into<ConvertibleValue>,
        tolerance: Option<Tolerance>,
    ) -> Result<bool> {
        Ok(self.compare(other, tolerance)?.is_eq())
    }

    pub fn is_different(
        &self,
        other: impl Into<ConvertibleValue>,
        tolerance: Option<Tolerance>,
    ) -> Result<bool> {
        Ok(!self.is_same(other, tolerance)?)
    }

    /// Not older than `lo` and not newer than `hi`.
    pub fn is_between(
        &self,
        lo: impl Into<ConvertibleValue>,
        hi: impl Into<ConvertibleValue>,
        tolerance: Option<Tolerance>,
    ) -> Result<bool> {
        let bounds = TimeBounds {
            start: lo.into(),
            end: hi.into(),
            end_inclusive: true,
        };
        self.is_within(bounds, tolerance)
    }

    /// [`EasyTime::is_between`] over a range; `lo..hi` excludes `hi`.
    pub fn is_within(
        &self,
        range: impl IntoTimeBounds,
        tolerance: Option<Tolerance>,
    ) -> Result<bool> {
        instant_within(
            &self.instant,
            range.into_time_bounds(),
            Tolerance::resolve(tolerance, self.tolerance),
        )
    }

    // ── arithmetic ──────────────────────────────────────────────────────

    /// A new value `delta` later, or `None` on overflow.
    pub fn checked_add(&self, delta: TimeDelta) -> Option<Self> {
        let instant = self.instant.checked_add(delta)?;
        Some(EasyTime { instant, ..*self })
    }

    /// Add an amount of time: a duration or a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnknownType`] when `operand` is a point in
    /// time, the [`ConversionError`] from converting it, or
    /// [`ConversionError::OutOfRange`] if the result overflows.
    pub fn plus(&self, operand: impl Into<ConvertibleValue>) -> Result<EasyTime> {
        let delta = match convert_value(operand, false)? {
            Converted::Duration(delta) => delta,
            Converted::Seconds(secs) => seconds_to_delta(secs)?,
            Converted::Instant(other) => {
                return Err(ConversionError::UnknownType(format!(
                    "cannot add a point in time ({other})"
                )))
            }
        };
        self.checked_add(delta)
            .ok_or_else(|| ConversionError::OutOfRange(format!("{} + {delta}", self.instant)))
    }

    /// A new value `delta` earlier, or `None` on overflow.
    pub fn checked_sub(&self, delta: TimeDelta) -> Option<Self> {
        let instant = self.instant.checked_sub(delta)?;
        Some(EasyTime { instant, ..*self })
    }

    /// Subtract a point in time or an amount of time.
    ///
    /// The operand is converted without coercion: a point in time yields
    /// [`Difference::Duration`], a duration or number of seconds yields
    /// [`Difference::Time`].
    ///
    /// # Errors
    ///
    /// Returns the [`ConversionError`] from converting `operand`, or
    /// [`ConversionError::OutOfRange`] if the shifted value overflows.
    pub fn subtract(&self, operand: impl Into<ConvertibleValue>) -> Result<Difference> {
        let delta = match convert_value(operand, false)? {
            Converted::Instant(other) => return Ok(Difference::Duration(self.instant - other)),
            Converted::Duration(delta) => delta,
            Converted::Seconds(secs) => seconds_to_delta(secs)?,
        };
        self.checked_sub(delta)
            .map(Difference::Time)
            .ok_or_else(|| ConversionError::OutOfRange(format!("{} - {delta}", self.instant)))
    }

    // ── formatting ──────────────────────────────────────────────────────

    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    pub fn to_rfc2822(&self) -> String {
        self.instant.to_rfc2822()
    }

    pub fn to_httpdate(&self) -> String {
        self.instant.to_httpdate()
    }

    pub fn to_xmlschema(&self) -> String {
        self.instant.to_xmlschema()
    }

    pub fn to_iso8601(&self, fraction_digits: u8) -> String {
        self.instant.to_iso8601(fraction_digits)
    }
}

/// Wrap any convertible value with the default tolerance.
///
/// # Errors
///
/// Returns the [`ConversionError`] from converting `value`.
pub fn easy_time(value: impl Into<ConvertibleValue>) -> Result<EasyTime> {
    EasyTime::new(value, None)
}

/// Wrap any convertible value with its own tolerance.
///
/// # Errors
///
/// Returns the [`ConversionError`] from converting `value`.
pub fn easy_time_with(
    value: impl Into<ConvertibleValue>,
    tolerance: impl Into<Tolerance>,
) -> Result<EasyTime> {
    EasyTime::new(value, Some(tolerance.into()))
}

// ── Trait impls ─────────────────────────────────────────────────────────────

impl FromStr for EasyTime {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        EasyTime::parse(s)
    }
}

impl From<Instant> for EasyTime {
    fn from(instant: Instant) -> Self {
        EasyTime::from_instant(instant)
    }
}

impl From<EasyTime> for ConvertibleValue {
    fn from(t: EasyTime) -> Self {
        ConvertibleValue::Instant(t.instant)
    }
}

impl From<&EasyTime> for ConvertibleValue {
    fn from(t: &EasyTime) -> Self {
        ConvertibleValue::Instant(t.instant)
    }
}

impl fmt::Display for EasyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.instant, f)
    }
}

impl Serialize for EasyTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.instant.serialize(serializer)
    }
}

// Between two `EasyTime`s the operators use the larger of the two overrides,
// or the process-wide default when neither has one, so `a == b` iff `b == a`.
// Against `Instant` and `DateTime` they use the receiver's tolerance.

fn pair_tolerance(a: &EasyTime, b: &EasyTime) -> Tolerance {
    match (a.tolerance, b.tolerance) {
        (Some(x), Some(y)) => x.max(y),
        (Some(t), None) | (None, Some(t)) => t,
        (None, None) => Tolerance::resolve(None, None),
    }
}

impl PartialEq for EasyTime {
    fn eq(&self, other: &EasyTime) -> bool {
        compare_instants(&self.instant, &other.instant, pair_tolerance(self, other)).is_eq()
    }
}

impl PartialOrd for EasyTime {
    fn partial_cmp(&self, other: &EasyTime) -> Option<Ordering> {
        Some(compare_instants(
            &self.instant,
            &other.instant,
            pair_tolerance(self, other),
        ))
    }
}

impl PartialEq<Instant> for EasyTime {
    fn eq(&self, other: &Instant) -> bool {
        compare_instants(&self.instant, other, self.tolerance()).is_eq()
    }
}

impl PartialOrd<Instant> for EasyTime {
    fn partial_cmp(&self, other: &Instant) -> Option<Ordering> {
        Some(compare_instants(&self.instant, other, self.tolerance()))
    }
}

impl<Tz: TimeZone> PartialEq<DateTime<Tz>> for EasyTime {
    fn eq(&self, other: &DateTime<Tz>) -> bool {
        let other = Instant::from(other.clone());
        compare_instants(&self.instant, &other, self.tolerance()).is_eq()
    }
}

impl<Tz: TimeZone> PartialOrd<DateTime<Tz>> for EasyTime {
    fn partial_cmp(&self, other: &DateTime<Tz>) -> Option<Ordering> {
        let other = Instant::from(other.clone());
        Some(compare_instants(&self.instant, &other, self.tolerance()))
    }
}

impl Add<TimeDelta> for EasyTime {
    type Output = EasyTime;

    fn add(self, rhs: TimeDelta) -> EasyTime {
        EasyTime {
            instant: self.instant + rhs,
            ..self
        }
    }
}

impl Sub<TimeDelta> for EasyTime {
    type Output = EasyTime;

    fn sub(self, rhs: TimeDelta) -> EasyTime {
        EasyTime {
            instant: self.instant - rhs,
            ..self
        }
    }
}

impl Sub for EasyTime {
    type Output = TimeDelta;

    fn sub(self, rhs: EasyTime) -> TimeDelta {
        self.instant - rhs.instant
    }
}

impl AddAssign<TimeDelta> for EasyTime {
    fn add_assign(&mut self, rhs: TimeDelta) {
        self.instant = self.instant + rhs;
    }
}

impl SubAssign<TimeDelta> for EasyTime {
    fn sub_assign(&mut self, rhs: TimeDelta) {
        self.instant = self.instant - rhs;
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
