//! Control request codes and fixed protocol capacities
//!
//! Every request is an `_IO('K', n)` code issued on the device file. The
//! driver never encodes direction or size in the code, so the codes are
//! used as raw request numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known path of the process image device node.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/piControl0";

/// Size of the process image served by the reference driver.
pub const PROCESS_IMAGE_SIZE: usize = 4096;

/// Number of entries in the device list buffer.
///
/// Shared with the driver: the list request fills at most this many
/// records, devices beyond it are not reported.
pub const MAX_DEVICES: usize = 20;

/// Size of the buffer filled by [`Request::GetLastMessage`].
pub const LAST_MESSAGE_LEN: usize = 255;

/// Control requests understood by the piControl driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Request {
    /// Reinitialize the process image
    Reset = 0x4b0c,
    /// Fill a list of [`MAX_DEVICES`] device descriptors
    GetDeviceInfoList = 0x4b0d,
    /// Fill a single device descriptor
    GetDeviceInfo = 0x4b0e,
    /// Read one bit of the process image
    GetBitValue = 0x4b0f,
    /// Write one bit of the process image
    SetBitValue = 0x4b10,
    /// Resolve a variable name to offset and length
    FindVariable = 0x4b11,
    /// Start a module firmware update
    UpdateDeviceFirmware = 0x4b13,
    /// Reset counters of a DIO module
    DioResetCounter = 0x4b14,
    /// Fetch the driver's last diagnostic message
    GetLastMessage = 0x4b15,
    /// Block until the driver reports an event
    WaitForEvent = 0x4b32,
}

impl Request {
    /// Raw request number passed to `ioctl(2)`.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Human readable request name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::GetDeviceInfoList => "get-device-info-list",
            Self::GetDeviceInfo => "get-device-info",
            Self::GetBitValue => "get-bit-value",
            Self::SetBitValue => "set-bit-value",
            Self::FindVariable => "find-variable",
            Self::UpdateDeviceFirmware => "update-device-firmware",
            Self::DioResetCounter => "dio-reset-counter",
            Self::GetLastMessage => "get-last-message",
            Self::WaitForEvent => "wait-for-event",
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04x})", self.name(), self.code())
    }
}
