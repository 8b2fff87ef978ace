//! The canonical point-in-time value every conversion produces.
//!
//! [`Instant`] wraps a `chrono::DateTime<FixedOffset>`. The offset is kept
//! only so the value renders the way it was written; equality, ordering and
//! hashing look at the absolute instant alone, so `09:00:00-05:00` and
//! `14:00:00Z` are the same `Instant`.
//!
//! Everything callers may need from the underlying chrono value is exposed
//! through the explicit accessors below rather than by handing out the
//! wrapped type wholesale.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::SystemTime;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, SecondsFormat, TimeDelta, TimeZone, Timelike, Utc,
    Weekday,
};
use serde::{Serialize, Serializer};

/// An absolute point in time plus the UTC offset it was expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<FixedOffset>);

impl Instant {
    /// The current instant, expressed in the host's local offset.
    pub fn now() -> Self {
        Instant(Local::now().fixed_offset())
    }

    /// Build an instant from seconds and nanoseconds since the Unix epoch (UTC offset).
    ///
    /// Returns `None` when the value is outside chrono's representable range
    /// or `nanos` is not below one second.
    pub fn from_timestamp(secs: i64, nanos: u32) -> Option<Self> {
        DateTime::from_timestamp(secs, nanos).map(|dt| Instant(dt.fixed_offset()))
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Sub-second component in nanoseconds.
    pub fn subsec_nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// The offset this instant was expressed in. Never affects comparison.
    pub fn offset(&self) -> FixedOffset {
        *self.0.offset()
    }

    /// The same instant expressed in UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// The same instant re-expressed in another offset.
    pub fn with_offset(&self, offset: FixedOffset) -> Self {
        Instant(self.0.with_timezone(&offset))
    }

    /// The wrapped chrono value.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// RFC 2822 rendering, e.g. `Fri, 9 Oct 2020 08:07:06 -0500`.
    pub fn to_rfc2822(&self) -> String {
        self.0.to_rfc2822()
    }

    /// HTTP-date rendering, always in GMT, e.g. `Thu, 06 Oct 2011 02:26:12 GMT`.
    pub fn to_httpdate(&self) -> String {
        self.to_utc()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
    }

    /// XML Schema `dateTime` rendering with whole seconds, e.g. `2020-10-09T08:07:06-05:00`.
    pub fn to_xmlschema(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// ISO 8601 rendering with the requested number of fractional digits.
    ///
    /// Digits are rounded up to the nearest precision chrono renders
    /// (0, 3, 6 or 9).
    pub fn to_iso8601(&self, fraction_digits: u8) -> String {
        let format = match fraction_digits {
            0 => SecondsFormat::Secs,
            1..=3 => SecondsFormat::Millis,
            4..=6 => SecondsFormat::Micros,
            _ => SecondsFormat::Nanos,
        };
        self.0.to_rfc3339_opts(format, false)
    }

    /// RFC 3339 rendering with as many fractional digits as needed.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    pub fn checked_add(&self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Instant)
    }

    pub fn checked_sub(&self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_sub_signed(delta).map(Instant)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S %z"))
    }
}

impl Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Instant {
    fn from(dt: DateTime<Tz>) -> Self {
        Instant(dt.fixed_offset())
    }
}

impl From<SystemTime> for Instant {
    fn from(t: SystemTime) -> Self {
        Instant(DateTime::<Utc>::from(t).fixed_offset())
    }
}

impl From<Instant> for DateTime<FixedOffset> {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

impl Add<TimeDelta> for Instant {
    type Output = Instant;

    fn add(self, rhs: TimeDelta) -> Instant {
        Instant(self.0 + rhs)
    }
}

impl Sub<TimeDelta> for Instant {
    type Output = Instant;

    fn sub(self, rhs: TimeDelta) -> Instant {
        Instant(self.0 - rhs)
    }
}

impl Sub for Instant {
    type Output = TimeDelta;

    fn sub(self, rhs: Instant) -> TimeDelta {
        self.0.signed_duration_since(rhs.0)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
