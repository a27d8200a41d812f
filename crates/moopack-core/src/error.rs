//! Error types for packet encoding and decoding operations.

use std::fmt;
use thiserror::Error;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug)]
pub enum MoopackError {
    /// The encoder met a value with no representation in the supported
    /// subset, or the decoder met an opcode outside the supported table.
    #[error("unsupported type: {0}")]
    UnsupportedType(UnsupportedType),

    /// The decoder needed more bytes than the buffer holds.
    #[error("out of bounds: needed {needed} byte(s) at offset {offset}, {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Containers nested deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// The JSON bridge failed to parse or render JSON text.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the codec could not represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedType {
    /// Leading byte not in the decoder's opcode table.
    Opcode(u8),
    /// Value shape the encoder has no opcode for.
    Value(&'static str),
}

impl fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedType::Opcode(b) => write!(f, "opcode 0x{b:02x}"),
            UnsupportedType::Value(name) => write!(f, "{name}"),
        }
    }
}

impl MoopackError {
    pub(crate) fn opcode(byte: u8) -> Self {
        MoopackError::UnsupportedType(UnsupportedType::Opcode(byte))
    }

    pub(crate) fn value(type_name: &'static str) -> Self {
        MoopackError::UnsupportedType(UnsupportedType::Value(type_name))
    }

    /// True for [`MoopackError::UnsupportedType`].
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, MoopackError::UnsupportedType(_))
    }

    /// True for [`MoopackError::OutOfBounds`].
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, MoopackError::OutOfBounds { .. })
    }
}

/// Convenience alias used throughout moopack-core.
pub type Result<T> = std::result::Result<T, MoopackError>;
