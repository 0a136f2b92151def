//! Device node handle implementation

use super::ioctl;
use crate::error::{Result, TransportError, errno_of};
use crate::traits::{ControlRequest, ImageHandle, Transport};
use picontrol_protocol::DEFAULT_DEVICE_PATH;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Transport opening the piControl device node
#[derive(Debug, Clone)]
pub struct DeviceTransport {
    path: PathBuf,
}

impl DeviceTransport {
    /// Create a transport for the device node at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for DeviceTransport {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_PATH)
    }
}

impl Transport for DeviceTransport {
    type Handle = DeviceHandle;

    fn open(&self) -> Result<DeviceHandle> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| TransportError::Unavailable {
                path: self.path.clone(),
                errno: errno_of(&e),
            })?;

        debug!(path = %self.path.display(), fd = file.as_raw_fd(), "Opened process image device");
        Ok(DeviceHandle {
            file,
            path: self.path.clone(),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Open handle on the device node
///
/// The file descriptor is closed when the handle is dropped.
#[derive(Debug)]
pub struct DeviceHandle {
    file: File,
    path: PathBuf,
}

impl DeviceHandle {
    /// Path the handle was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageHandle for DeviceHandle {
    fn seek(&mut self, offset: u32) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(u64::from(offset)))
            .map(|_| ())
            .map_err(|e| TransportError::Seek {
                offset,
                errno: errno_of(&e),
            })
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.file.read(buf).map_err(|e| TransportError::Transfer {
            errno: errno_of(&e),
        })
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.file.write(data).map_err(|e| TransportError::Transfer {
            errno: errno_of(&e),
        })
    }

    fn control(&mut self, request: ControlRequest<'_>) -> Result<i32> {
        let kind = request.request();
        trace!(request = %kind, "Issuing control request");
        ioctl::issue(self.file.as_raw_fd(), request)
            .map_err(|errno| TransportError::Control {
                request: kind,
                errno,
            })
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "Closing process image device");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn test_default_path() {
        assert_eq!(
            DeviceTransport::default().path(),
            Path::new("/dev/piControl0")
        );
    }

    #[test]
    fn test_missing_device_is_unavailable() {
        let transport = DeviceTransport::new("/nonexistent/piControl0");
        match transport.open() {
            Err(TransportError::Unavailable { path, errno }) => {
                assert_eq!(path, Path::new("/nonexistent/piControl0"));
                assert_eq!(errno, Errno::ENOENT);
            }
            other => panic!("Expected Unavailable, got {:?}", other.map(|_| ())),
        }
    }
}
