//! Integration tests for the simulated transport
//!
//! Device descriptors are built here, outside the crate that defines them,
//! the same way applications describe their module layout.

use picontrol_protocol::{DeviceInfo, DeviceSelector, MAX_DEVICES};
use picontrol_transport::{ControlRequest, ImageHandle, SimulatedTransport, Transport};
use rstest::*;

#[fixture]
fn modules() -> Vec<DeviceInfo> {
    vec![
        DeviceInfo {
            address: 0,
            module_type: 95,
            input_length: 6,
            output_offset: 6,
            output_length: 5,
            active: 1,
            ..Default::default()
        },
        DeviceInfo {
            address: 40,
            module_type: 103,
            input_offset: 11,
            input_length: 56,
            active: 1,
            ..Default::default()
        },
    ]
}

#[rstest]
#[case(DeviceSelector::Address(40))]
#[case(DeviceSelector::ModuleType(103))]
fn test_device_info_built_by_caller_is_served(modules: Vec<DeviceInfo>, #[case] selector: DeviceSelector) {
    let transport = modules
        .iter()
        .fold(SimulatedTransport::new(64), |t, device| t.with_device(*device));
    let mut handle = transport.open().unwrap();

    let mut info = selector.to_request();
    handle.control(ControlRequest::GetDeviceInfo(&mut info)).unwrap();

    assert_eq!(info, modules[1]);
    assert_eq!(info.reserved, [0u8; 30]);
}

#[rstest]
fn test_device_list_returns_caller_descriptors(modules: Vec<DeviceInfo>) {
    let transport = modules
        .iter()
        .fold(SimulatedTransport::new(64), |t, device| t.with_device(*device));
    let mut handle = transport.open().unwrap();

    let mut list = [DeviceInfo::default(); MAX_DEVICES];
    let count = handle.control(ControlRequest::GetDeviceInfoList(&mut list)).unwrap();

    assert_eq!(count, 2);
    assert_eq!(&list[..2], modules.as_slice());
}
