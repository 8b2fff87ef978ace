//! # easy-time
//!
//! Tolerant timestamp comparison.
//!
//! Timestamps from independent clocks (a local database row, a remote API
//! response, an HTTP header) rarely agree to the second. easy-time converts
//! whatever representation you have into one canonical [`Instant`] and
//! compares instants with a tolerance, so a few seconds of clock skew is not
//! reported as "newer" or "older".
//!
//! ## Modules
//!
//! - [`convert`] — any supported value → [`Instant`] (strings, chrono values, components, numbers, durations)
//! - [`formats`] — structural detection of RFC 2822, HTTP-date, XML Schema and ISO 8601 strings
//! - [`generic`] — free-form fallback parser
//! - [`compare`] — tolerant three-way comparison, `between`, range membership
//! - [`easy_time`] — [`EasyTime`], the comparable value with tolerance-aware arithmetic
//! - [`tolerance`] — [`Tolerance`] and the process-wide default
//! - [`instant`] — [`Instant`], the canonical point in time
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use easy_time::{EasyTime, Tolerance};
//!
//! let ours = EasyTime::new("2011-10-06T02:26:12Z", None).unwrap();
//! assert!(ours.is_same("Thu, 06 Oct 2011 02:26:40 GMT", None).unwrap());
//! assert!(ours.is_older("Thu, 06 Oct 2011 02:26:40 GMT", Some(Tolerance::NONE)).unwrap());
//! ```

pub mod compare;
pub mod convert;
pub mod easy_time;
pub mod error;
pub mod formats;
pub mod generic;
pub mod instant;
pub mod tolerance;

pub use compare::{
    between, compare, compare_instants, different, newer, older, ordering_sign, same, within,
    IntoTimeBounds, TimeBounds,
};
pub use convert::{convert, convert_value, parse, Converted, ConvertibleValue};
pub use easy_time::{easy_time, easy_time_with, Difference, EasyTime};
pub use error::ConversionError;
pub use formats::TextFormat;
pub use instant::Instant;
pub use tolerance::{
    default_tolerance, reset_default_tolerance, set_default_tolerance, Tolerance,
    DEFAULT_TOLERANCE,
};
