//! Error types for easy-time conversions.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unparseable time text: '{0}'")]
    UnparseableText(String),

    #[error("Unknown time value type: {0}")]
    UnknownType(String),

    #[error("Time value out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
