//! Transport traits and the control request channel
//!
//! A [`Transport`] knows how to reach the process image and hands out
//! [`ImageHandle`]s. Dropping a handle releases it.

use crate::error::Result;
use picontrol_protocol::{
    DeviceInfo, DioResetCounter, LAST_MESSAGE_LEN, MAX_DEVICES, Request, SpiValue, SpiVariable,
};
use std::path::Path;

/// One request on the multiplexed control channel
///
/// Each variant borrows the record the driver reads from or fills in.
#[derive(Debug)]
pub enum ControlRequest<'a> {
    /// Reinitialize the process image
    Reset,

    /// Look up one device; the selector fields are read, the rest filled in
    GetDeviceInfo(&'a mut DeviceInfo),

    /// Fill up to [`MAX_DEVICES`] descriptors; returns the number filled
    GetDeviceInfoList(&'a mut [DeviceInfo; MAX_DEVICES]),

    /// Read one bit; `value` is filled in
    GetBitValue(&'a mut SpiValue),

    /// Write one bit, masked by the driver
    SetBitValue(&'a SpiValue),

    /// Resolve a variable name; address, bit and length are filled in
    FindVariable(&'a mut SpiVariable),

    /// Reset counters of a DIO module
    DioResetCounter(&'a DioResetCounter),

    /// Start a firmware update, optionally for one module address
    UpdateDeviceFirmware(Option<u32>),

    /// Fetch the driver's last message as a NUL-terminated string
    GetLastMessage(&'a mut [u8; LAST_MESSAGE_LEN]),

    /// Block until an event occurs; the event code is filled in
    WaitForEvent(&'a mut i32),
}

impl ControlRequest<'_> {
    /// Request code of this request.
    pub fn request(&self) -> Request {
        match self {
            Self::Reset => Request::Reset,
            Self::GetDeviceInfo(_) => Request::GetDeviceInfo,
            Self::GetDeviceInfoList(_) => Request::GetDeviceInfoList,
            Self::GetBitValue(_) => Request::GetBitValue,
            Self::SetBitValue(_) => Request::SetBitValue,
            Self::FindVariable(_) => Request::FindVariable,
            Self::DioResetCounter(_) => Request::DioResetCounter,
            Self::UpdateDeviceFirmware(_) => Request::UpdateDeviceFirmware,
            Self::GetLastMessage(_) => Request::GetLastMessage,
            Self::WaitForEvent(_) => Request::WaitForEvent,
        }
    }
}

/// An open handle on the process image
///
/// All calls block. A handle is used from one thread at a time.
pub trait ImageHandle {
    /// Move the transfer cursor to `offset`.
    fn seek(&mut self, offset: u32) -> Result<()>;

    /// Read once at the cursor; may return fewer bytes than requested.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write once at the cursor; may write fewer bytes than given.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Issue a control request and return the driver's non-negative result.
    fn control(&mut self, request: ControlRequest<'_>) -> Result<i32>;
}

/// Something that can open handles on the process image
pub trait Transport {
    /// Handle type produced by [`Transport::open`]
    type Handle: ImageHandle;

    /// Acquire a new handle.
    fn open(&self) -> Result<Self::Handle>;

    /// Device path this transport opens.
    fn path(&self) -> &Path;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_request_codes() {
        let mut value = SpiValue::get(0, 0);
        assert_eq!(
            ControlRequest::GetBitValue(&mut value).request(),
            Request::GetBitValue
        );
        assert_eq!(
            ControlRequest::UpdateDeviceFirmware(None).request(),
            Request::UpdateDeviceFirmware
        );
        assert_eq!(ControlRequest::Reset.request(), Request::Reset);
    }
}
