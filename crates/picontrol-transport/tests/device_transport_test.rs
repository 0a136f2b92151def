//! Integration tests for the device-file transport
//!
//! A regular file stands in for the device node: seek, read and write
//! behave the same, and every control request fails with `ENOTTY`.

use nix::errno::Errno;
use picontrol_protocol::{Request, SpiValue};
use picontrol_transport::{ControlRequest, DeviceTransport, ImageHandle, Transport, TransportError};
use rstest::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[fixture]
fn image_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(&[0u8; 64]).expect("Failed to size temp file");
    file
}

#[rstest]
fn test_write_then_read_through_file(image_file: NamedTempFile) {
    let transport = DeviceTransport::new(image_file.path());
    let mut handle = transport.open().expect("Failed to open image file");

    handle.seek(10).unwrap();
    assert_eq!(handle.write(&[0xde, 0xad, 0xbe, 0xef]).unwrap(), 4);

    let mut buf = [0u8; 4];
    handle.seek(10).unwrap();
    assert_eq!(handle.read(&mut buf).unwrap(), 4);
    assert_eq!(buf, [0xde, 0xad, 0xbe, 0xef]);
}

#[rstest]
fn test_read_past_end_is_short(image_file: NamedTempFile) {
    let transport = DeviceTransport::new(image_file.path());
    let mut handle = transport.open().unwrap();

    let mut buf = [0xffu8; 8];
    handle.seek(60).unwrap();
    assert_eq!(handle.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf[..4], &[0, 0, 0, 0]);
}

#[rstest]
fn test_control_request_on_regular_file_is_rejected(image_file: NamedTempFile) {
    let transport = DeviceTransport::new(image_file.path());
    let mut handle = transport.open().unwrap();

    let mut value = SpiValue::get(0, 0);
    let err = handle
        .control(ControlRequest::GetBitValue(&mut value))
        .unwrap_err();

    assert_eq!(
        err,
        TransportError::Control {
            request: Request::GetBitValue,
            errno: Errno::ENOTTY,
        }
    );
}

#[test]
fn test_open_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let transport = DeviceTransport::new(dir.path());

    match transport.open() {
        Err(TransportError::Unavailable { errno, .. }) => assert_eq!(errno, Errno::EISDIR),
        other => panic!("Expected Unavailable, got {:?}", other.map(|_| ())),
    }
}
