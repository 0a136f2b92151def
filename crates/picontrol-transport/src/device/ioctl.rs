//! Raw `ioctl(2)` bindings for the piControl request codes

#![allow(unsafe_code)]

use crate::traits::ControlRequest;
use nix::libc::c_int;
use picontrol_protocol::{DeviceInfo, DioResetCounter, Request, SpiValue, SpiVariable};
use std::os::fd::RawFd;

const KB_RESET: u32 = Request::Reset.code();
const KB_GET_DEVICE_INFO_LIST: u32 = Request::GetDeviceInfoList.code();
const KB_GET_DEVICE_INFO: u32 = Request::GetDeviceInfo.code();
const KB_GET_VALUE: u32 = Request::GetBitValue.code();
const KB_SET_VALUE: u32 = Request::SetBitValue.code();
const KB_FIND_VARIABLE: u32 = Request::FindVariable.code();
const KB_UPDATE_DEVICE_FIRMWARE: u32 = Request::UpdateDeviceFirmware.code();
const KB_DIO_RESET_COUNTER: u32 = Request::DioResetCounter.code();
const KB_GET_LAST_MESSAGE: u32 = Request::GetLastMessage.code();
const KB_WAIT_FOR_EVENT: u32 = Request::WaitForEvent.code();

nix::ioctl_none_bad!(kb_reset, KB_RESET);
nix::ioctl_read_bad!(kb_get_device_info_list, KB_GET_DEVICE_INFO_LIST, DeviceInfo);
nix::ioctl_readwrite_bad!(kb_get_device_info, KB_GET_DEVICE_INFO, DeviceInfo);
nix::ioctl_readwrite_bad!(kb_get_value, KB_GET_VALUE, SpiValue);
nix::ioctl_write_ptr_bad!(kb_set_value, KB_SET_VALUE, SpiValue);
nix::ioctl_readwrite_bad!(kb_find_variable, KB_FIND_VARIABLE, SpiVariable);
nix::ioctl_write_ptr_bad!(kb_update_device_firmware, KB_UPDATE_DEVICE_FIRMWARE, u32);
nix::ioctl_write_ptr_bad!(kb_dio_reset_counter, KB_DIO_RESET_COUNTER, DioResetCounter);
nix::ioctl_read_bad!(kb_get_last_message, KB_GET_LAST_MESSAGE, u8);
nix::ioctl_read_bad!(kb_wait_for_event, KB_WAIT_FOR_EVENT, c_int);

/// Issue `request` on `fd`.
///
/// Every record is borrowed for the duration of the call and sized exactly
/// as the driver expects, so the driver never touches memory outside it.
pub(crate) fn issue(fd: RawFd, request: ControlRequest<'_>) -> nix::Result<c_int> {
    // SAFETY: `fd` is an open descriptor owned by the caller, and each
    // pointer comes from a live borrow of a `#[repr(C)]` record matching the
    // layout the driver reads or writes for that request.
    unsafe {
        match request {
            ControlRequest::Reset => kb_reset(fd),
            ControlRequest::GetDeviceInfoList(list) => {
                kb_get_device_info_list(fd, list.as_mut_ptr())
            }
            ControlRequest::GetDeviceInfo(info) => kb_get_device_info(fd, info),
            ControlRequest::GetBitValue(value) => kb_get_value(fd, value),
            ControlRequest::SetBitValue(value) => kb_set_value(fd, value),
            ControlRequest::FindVariable(variable) => kb_find_variable(fd, variable),
            ControlRequest::DioResetCounter(counter) => kb_dio_reset_counter(fd, counter),
            ControlRequest::UpdateDeviceFirmware(None) => {
                kb_update_device_firmware(fd, std::ptr::null())
            }
            ControlRequest::UpdateDeviceFirmware(Some(address)) => {
                kb_update_device_firmware(fd, &address)
            }
            ControlRequest::GetLastMessage(message) => {
                kb_get_last_message(fd, message.as_mut_ptr())
            }
            ControlRequest::WaitForEvent(event) => kb_wait_for_event(fd, event),
        }
    }
}
