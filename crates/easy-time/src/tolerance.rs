//! Comparison tolerance and the process-wide default.
//!
//! A tolerance is a whole number of seconds. Two instants whose difference
//! (truncated to whole seconds) is at most the tolerance compare as equal.
//!
//! The tolerance used by a comparison is resolved in this order:
//!
//! 1. an explicit per-call override,
//! 2. the value's own override (see [`crate::EasyTime::with_tolerance`]),
//! 3. the process-wide default, initially [`DEFAULT_TOLERANCE`].
//!
//! The process-wide default lives in a single atomic cell. Set it once at
//! startup, before other threads start comparing; a concurrent write is not
//! ordered against in-flight reads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// The default tolerance when none is configured: one minute.
pub const DEFAULT_TOLERANCE: Tolerance = Tolerance(60);

static PROCESS_DEFAULT_SECS: AtomicU64 = AtomicU64::new(DEFAULT_TOLERANCE.0);

/// A non-negative comparison tolerance in whole seconds. Zero disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tolerance(u64);

impl Tolerance {
    /// No tolerance: comparisons reduce to strict ordering (at one-second resolution).
    pub const NONE: Tolerance = Tolerance(0);

    pub const fn seconds(secs: u64) -> Self {
        Tolerance(secs)
    }

    pub const fn minutes(minutes: u64) -> Self {
        Tolerance(minutes.saturating_mul(60))
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Pick the tolerance for one comparison: per-call override, then the
    /// value's override, then the process-wide default.
    pub fn resolve(call: Option<Tolerance>, instance: Option<Tolerance>) -> Tolerance {
        call.or(instance).unwrap_or_else(default_tolerance)
    }
}

impl From<u64> for Tolerance {
    fn from(secs: u64) -> Self {
        Tolerance(secs)
    }
}

impl From<u32> for Tolerance {
    fn from(secs: u32) -> Self {
        Tolerance(u64::from(secs))
    }
}

/// Sub-second parts are dropped.
impl From<Duration> for Tolerance {
    fn from(d: Duration) -> Self {
        Tolerance(d.as_secs())
    }
}

impl From<Tolerance> for Duration {
    fn from(t: Tolerance) -> Self {
        Duration::from_secs(t.0)
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// The current process-wide default tolerance.
pub fn default_tolerance() -> Tolerance {
    Tolerance(PROCESS_DEFAULT_SECS.load(Ordering::Relaxed))
}

/// Replace the process-wide default tolerance.
pub fn set_default_tolerance(tolerance: impl Into<Tolerance>) {
    PROCESS_DEFAULT_SECS.store(tolerance.into().0, Ordering::Relaxed);
}

/// Restore the process-wide default to [`DEFAULT_TOLERANCE`].
pub fn reset_default_tolerance() {
    set_default_tolerance(DEFAULT_TOLERANCE);
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // The process-wide default is shared by every test in this binary, so
    // tests here only read it; mutation is covered in tests/default_tolerance.rs.

    #[test]
    fn test_resolve_prefers_call_override() {
        let t = Tolerance::resolve(Some(Tolerance::seconds(5)), Some(Tolerance::seconds(10)));
        assert_eq!(t, Tolerance::seconds(5));
    }

    #[test]
    fn test_resolve_falls_back_to_instance() {
        let t = Tolerance::resolve(None, Some(Tolerance::NONE));
        assert_eq!(t, Tolerance::NONE);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(Tolerance::resolve(None, None), DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Tolerance::minutes(2).as_secs(), 120);
        assert_eq!(Tolerance::from(Duration::from_millis(2_999)).as_secs(), 2);
        assert_eq!(Duration::from(Tolerance::seconds(3)), Duration::from_secs(3));
        assert!(Tolerance::from(0u64).is_none());
        assert_eq!(Tolerance::seconds(90).to_string(), "90s");
    }
}
