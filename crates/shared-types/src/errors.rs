//! # Error Types
//!
//! Errors raised while constructing shared values.

use thiserror::Error;

/// Reasons a queue name or access key is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueKeyError {
    /// Component is empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// Component exceeds the maximum length.
    #[error("{field} exceeds {max} bytes (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Component contains a path separator or control character.
    #[error("{field} contains an illegal character")]
    IllegalCharacter { field: &'static str },

    /// Component is `.` or `..`.
    #[error("{field} must not be \".\" or \"..\"")]
    DotSegment { field: &'static str },
}

/// An event id that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid event id: {0:?}")]
pub struct ParseEventIdError(pub String);
