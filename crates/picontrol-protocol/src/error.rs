//! Error types for protocol operations
//!
//! Provides the errors raised while building request records locally,
//! before anything reaches the driver.

use std::fmt;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur while encoding protocol records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Variable name does not fit the fixed-width name field
    NameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
        /// Largest length the field accepts.
        max: usize,
    },

    /// Variable name contains an interior NUL byte
    NameContainsNul {
        /// Byte position of the first NUL.
        position: usize,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooLong { len, max } => {
                write!(f, "Variable name is {} bytes long, at most {} allowed", len, max)
            }
            Self::NameContainsNul { position } => {
                write!(f, "Variable name contains a NUL byte at position {}", position)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}
