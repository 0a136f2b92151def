//! Transport error types

use nix::errno::Errno;
use picontrol_protocol::Request;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
///
/// Each variant is one failure class of the device protocol; the errno
/// reported by the operating system or the driver is kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The device handle could not be acquired
    #[error("Process image device {} unavailable: {errno}", path.display())]
    Unavailable {
        /// Device path that was opened
        path: PathBuf,
        /// Reason reported by `open(2)`
        errno: Errno,
    },

    /// Repositioning the transfer cursor failed
    #[error("Seek to offset {offset} failed: {errno}")]
    Seek {
        /// Requested offset
        offset: u32,
        /// Reason reported by `lseek(2)`
        errno: Errno,
    },

    /// A read or write call failed
    #[error("Transfer failed: {errno}")]
    Transfer {
        /// Reason reported by `read(2)` / `write(2)`
        errno: Errno,
    },

    /// The driver rejected a control request
    #[error("Control request {request} failed: {errno}")]
    Control {
        /// Request that was rejected
        request: Request,
        /// Reason reported by the driver
        errno: Errno,
    },
}

impl TransportError {
    /// The errno carried by this error.
    pub fn errno(&self) -> Errno {
        match self {
            Self::Unavailable { errno, .. }
            | Self::Seek { errno, .. }
            | Self::Transfer { errno }
            | Self::Control { errno, .. } => *errno,
        }
    }
}

/// Errno of an I/O error, `EIO` when the error did not come from the OS.
pub(crate) fn errno_of(err: &std::io::Error) -> Errno {
    err.raw_os_error().map(Errno::from_raw).unwrap_or(Errno::EIO)
}
