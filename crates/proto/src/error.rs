//! Error types for Nwu payload encoding and decoding
//!
//! Every failure falls into one of four classes (see [`ErrorKind`]):
//! a caller-supplied value breaking a fixed-size contract, malformed wire
//! bytes, dynamic content overflowing a fixed-width field, or a missing
//! attribute lookup.

use std::fmt;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller value violates a fixed-size or bit-length contract; nothing was mutated
    Validation,
    /// Malformed, truncated or inconsistent wire bytes
    Decode,
    /// Dynamic content exceeds a fixed field width
    Overflow,
    /// Requested item is not present
    NotFound,
}

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Value rejected at set/build time
    Validation(String),

    /// Malformed wire data
    Decode(String),

    /// Content does not fit its length field
    Overflow {
        /// Field that overflowed
        field: &'static str,
        /// Largest value the field can carry
        max: usize,
        /// Value that was supplied
        actual: usize,
    },

    /// Lookup miss
    NotFound(String),

    /// Buffer too short for the structure being decoded
    BufferTooShort {
        /// Required length
        required: usize,
        /// Available length
        available: usize,
    },

    /// Payload type tag outside the supported set
    UnsupportedPayload(u8),

    /// Type tag on the wire does not match the decoder
    UnexpectedType {
        /// Tag the decoder handles
        expected: u8,
        /// Tag found on the wire
        actual: u8,
    },
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Decode(_)
            | Error::BufferTooShort { .. }
            | Error::UnsupportedPayload(_)
            | Error::UnexpectedType { .. } => ErrorKind::Decode,
            Error::Overflow { .. } => ErrorKind::Overflow,
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub(crate) fn overflow(field: &'static str, max: usize, actual: usize) -> Self {
        Error::Overflow { field, max, actual }
    }

    pub(crate) fn too_short(required: usize, available: usize) -> Self {
        Error::BufferTooShort {
            required,
            available,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
            Error::Overflow { field, max, actual } => {
                write!(
                    f,
                    "Overflow: {} is {} but the field holds at most {}",
                    field, actual, max
                )
            }
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::BufferTooShort {
                required,
                available,
            } => {
                write!(
                    f,
                    "Buffer too short: need {} bytes, have {}",
                    required, available
                )
            }
            Error::UnsupportedPayload(t) => write!(f, "Unsupported payload type: {}", t),
            Error::UnexpectedType { expected, actual } => {
                write!(f, "Unexpected type: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for Error {}
