//! Tolerant three-way comparison of time values.
//!
//! Two instants are "the same" when their difference, truncated to whole
//! seconds, is within the tolerance. Outside the tolerance band the result is
//! the strict ordering of the two instants themselves.
//!
//! The functions here accept anything convertible (see [`crate::convert`])
//! and resolve the tolerance as per-call override, then the process-wide
//! default. Use the methods on [`crate::EasyTime`] to take a value's own
//! tolerance override into account.

use std::cmp::Ordering;
use std::ops::{Range, RangeInclusive};

use crate::convert::{convert, ConvertibleValue};
use crate::error::Result;
use crate::instant::Instant;
use crate::tolerance::Tolerance;

/// Compare two instants under a tolerance.
///
/// This is the core every other comparison is built on. It never fails.
pub fn compare_instants(a: &Instant, b: &Instant, tolerance: Tolerance) -> Ordering {
    let diff_secs = (*a - *b).num_seconds();
    if diff_secs.unsigned_abs() <= tolerance.as_secs() {
        Ordering::Equal
    } else {
        a.cmp(b)
    }
}

/// `-1`, `0` or `1` for an [`Ordering`].
pub fn ordering_sign(ordering: Ordering) -> i8 {
    ordering as i8
}

/// Tolerantly compare `a` with `b`.
///
/// # Errors
///
/// Propagates the [`crate::ConversionError`] of whichever operand fails to convert.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use easy_time::compare;
///
/// // 62 seconds apart: outside the default one-minute tolerance.
/// let ord = compare("2012-04-15T09:13:20-05:00", "2012-04-15T09:14:22-05:00", None).unwrap();
/// assert_eq!(ord, Ordering::Less);
/// ```
pub fn compare(
    a: impl Into<ConvertibleValue>,
    b: impl Into<ConvertibleValue>,
    tolerance: Option<Tolerance>,
) -> Result<Ordering> {
    let a = convert(a)?;
    let b = convert(b)?;
    Ok(compare_instants(&a, &b, Tolerance::resolve(tolerance, None)))
}

/// `a` is later than `b` by more than the tolerance.
pub fn newer(
    a: impl Into<ConvertibleValue>,
    b: impl Into<ConvertibleValue>,
    tolerance: Option<Tolerance>,
) -> Result<bool> {
    Ok(compare(a, b, tolerance)?.is_gt())
}

/// `a` is earlier than `b` by more than the tolerance.
pub fn older(
    a: impl Into<ConvertibleValue>,
    b: impl Into<ConvertibleValue>,
    tolerance: Option<Tolerance>,
) -> Result<bool> {
    Ok(compare(a, b, tolerance)?.is_lt())
}

/// `a` and `b` are within the tolerance of each other.
pub fn same(
    a: impl Into<ConvertibleValue>,
    b: impl Into<ConvertibleValue>,
    tolerance: Option<Tolerance>,
) -> Result<bool> {
    Ok(compare(a, b, tolerance)?.is_eq())
}

pub fn different(
    a: impl Into<ConvertibleValue>,
    b: impl Into<ConvertibleValue>,
    tolerance: Option<Tolerance>,
) -> Result<bool> {
    Ok(!same(a, b, tolerance)?)
}

/// `a` is not older than `lo` and not newer than `hi`, both under the tolerance.
pub fn between(
    a: impl Into<ConvertibleValue>,
    lo: impl Into<ConvertibleValue>,
    hi: impl Into<ConvertibleValue>,
    tolerance: Option<Tolerance>,
) -> Result<bool> {
    let a = convert(a)?;
    let bounds = TimeBounds {
        start: lo.into(),
        end: hi.into(),
        end_inclusive: true,
    };
    instant_within(&a, bounds, Tolerance::resolve(tolerance, None))
}

/// [`between`] taking a range: `lo..=hi` is closed, `lo..hi` excludes `hi`.
pub fn within(
    a: impl Into<ConvertibleValue>,
    range: impl IntoTimeBounds,
    tolerance: Option<Tolerance>,
) -> Result<bool> {
    let a = convert(a)?;
    instant_within(&a, range.into_time_bounds(), Tolerance::resolve(tolerance, None))
}

pub(crate) fn instant_within(
    instant: &Instant,
    bounds: TimeBounds,
    tolerance: Tolerance,
) -> Result<bool> {
    let start = convert(bounds.start)?;
    let end = convert(bounds.end)?;
    if compare_instants(instant, &start, tolerance).is_lt() {
        return Ok(false);
    }
    let upper = compare_instants(instant, &end, tolerance);
    Ok(if bounds.end_inclusive {
        upper.is_le()
    } else {
        upper.is_lt()
    })
}

// ── Ranges ──────────────────────────────────────────────────────────────────

/// Lower and upper bound of a range of time values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBounds {
    pub start: ConvertibleValue,
    pub end: ConvertibleValue,
    pub end_inclusive: bool,
}

/// Ranges whose endpoints are convertible time values.
pub trait IntoTimeBounds {
    fn into_time_bounds(self) -> TimeBounds;
}

impl IntoTimeBounds for TimeBounds {
    fn into_time_bounds(self) -> TimeBounds {
        self
    }
}

impl<T: Into<ConvertibleValue>> IntoTimeBounds for RangeInclusive<T> {
    fn into_time_bounds(self) -> TimeBounds {
        let (start, end) = self.into_inner();
        TimeBounds {
            start: start.into(),
            end: end.into(),
            end_inclusive: true,
        }
    }
}

impl<T: Into<ConvertibleValue>> IntoTimeBounds for Range<T> {
    fn into_time_bounds(self) -> TimeBounds {
        TimeBounds {
            start: self.start.into(),
            end: self.end.into(),
            end_inclusive: false,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
