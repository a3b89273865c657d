// Decode error taxonomy shared by every module in the crate

use thiserror::Error;

/// Errors produced while decoding buffers, structures, and frames.
///
/// All variants are local, recoverable decode errors surfaced to the
/// immediate caller; none are process-fatal. Label resolution never
/// errors (it degrades to "Unknown" instead).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Insufficient buffer: needed {needed} bytes, got {available}")]
    InsufficientBuffer { needed: usize, available: usize },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Index out of range: {index} (count is {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Invalid calendar value: {0}")]
    InvalidCalendarValue(String),

    #[error("Unsupported field type: {0}")]
    UnsupportedFieldType(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
