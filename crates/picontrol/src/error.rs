//! Error types for the piControl client
//!
//! Every failure keeps its class and the numeric errno the operating system
//! or the driver reported, so callers can tell "device busy" from "not
//! found" without parsing messages.

use nix::errno::Errno;
use picontrol_protocol::ProtocolError;
use picontrol_transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the client.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the transport layer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The driver does not know the variable.
    #[error("Variable '{name}' not found: {errno}")]
    Resolution {
        /// Name as given by the caller
        name: String,
        /// Reason reported by the driver
        errno: Errno,
    },

    /// Variable name rejected in strict name mode.
    #[error("Invalid variable name: {0}")]
    InvalidName(#[from] ProtocolError),

    /// Variable width that has no typed representation.
    #[error("Unsupported variable width of {0} bits")]
    UnsupportedWidth(u16),

    /// A typed value was transferred only partially.
    #[error("Short transfer: {actual} of {expected} bytes")]
    ShortTransfer {
        /// Bytes the value needs
        expected: usize,
        /// Bytes actually transferred
        actual: usize,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A call did not complete within the configured timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// The blocking task running a call failed.
    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Failure class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The device handle could not be acquired
    TransportUnavailable,
    /// Repositioning the transfer cursor failed
    SeekFailure,
    /// A read or write failed or was incomplete
    TransferFailure,
    /// The variable name is unknown
    ResolutionFailure,
    /// The driver rejected a control request
    ControlRequestFailure,
    /// The caller passed something unusable
    InvalidArgument,
    /// The call was abandoned
    Interrupted,
}

impl Error {
    /// Failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(TransportError::Unavailable { .. }) => ErrorKind::TransportUnavailable,
            Self::Transport(TransportError::Seek { .. }) => ErrorKind::SeekFailure,
            Self::Transport(TransportError::Transfer { .. }) | Self::ShortTransfer { .. } => {
                ErrorKind::TransferFailure
            }
            Self::Transport(TransportError::Control { .. }) => ErrorKind::ControlRequestFailure,
            Self::Resolution { .. } => ErrorKind::ResolutionFailure,
            Self::InvalidName(_) | Self::UnsupportedWidth(_) | Self::Config(_) => {
                ErrorKind::InvalidArgument
            }
            Self::Timeout(_) | Self::Task(_) => ErrorKind::Interrupted,
        }
    }

    /// Errno reported by the operating system or the driver, if any.
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Self::Transport(err) => Some(err.errno()),
            Self::Resolution { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// Negative status code in the convention of the C interface.
    ///
    /// The transport classes keep their fixed codes (-1 unavailable,
    /// -2 seek, -3 transfer); driver rejections return the negated errno.
    pub fn code(&self) -> i32 {
        match self {
            Self::Transport(TransportError::Unavailable { .. }) => -1,
            Self::Transport(TransportError::Seek { .. }) => -2,
            Self::Transport(TransportError::Transfer { .. }) | Self::ShortTransfer { .. } => -3,
            Self::Transport(TransportError::Control { errno, .. }) | Self::Resolution { errno, .. } => {
                -(*errno as i32)
            }
            Self::InvalidName(_) | Self::UnsupportedWidth(_) | Self::Config(_) => {
                -(Errno::EINVAL as i32)
            }
            Self::Timeout(_) => -(Errno::ETIMEDOUT as i32),
            Self::Task(_) => -(Errno::EIO as i32),
        }
    }

    /// Check if this error means the device could not be opened.
    pub fn is_transport_unavailable(&self) -> bool {
        self.kind() == ErrorKind::TransportUnavailable
    }
}
