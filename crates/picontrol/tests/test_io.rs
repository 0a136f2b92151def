//! Byte-range read and write

mod common;

use common::{client_for, init_tracing, revpi};
use picontrol::{Call, Errno, ErrorKind, Operation, SimulatedTransport};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
fn test_write_then_read_round_trip(revpi: SimulatedTransport) {
    init_tracing();
    let mut client = client_for(&revpi);

    assert_eq!(client.write(100, &[1, 2, 3, 4]).unwrap(), 4);

    let mut buf = [0u8; 4];
    assert_eq!(client.read(100, &mut buf).unwrap(), 4);
    assert_eq!(buf, [1, 2, 3, 4]);
}

#[rstest]
fn test_each_transfer_seeks_first(revpi: SimulatedTransport) {
    let mut client = client_for(&revpi);
    client.open().unwrap();
    revpi.clear_calls();

    client.write(7, &[9]).unwrap();
    client.read_vec(12, 3).unwrap();

    assert_eq!(
        revpi.calls(),
        vec![Call::Seek(7), Call::Write(1), Call::Seek(12), Call::Read(3)]
    );
}

#[rstest]
fn test_short_read_is_reported(revpi: SimulatedTransport) {
    revpi.poke(0, &[5, 6, 7, 8]);
    revpi.set_transfer_limit(Some(2));
    let mut client = client_for(&revpi);

    let mut buf = [0u8; 4];
    assert_eq!(client.read(0, &mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], &[5, 6]);

    assert_eq!(client.read_vec(0, 4).unwrap(), vec![5, 6]);
}

#[rstest]
fn test_short_write_is_reported(revpi: SimulatedTransport) {
    revpi.set_transfer_limit(Some(1));
    let mut client = client_for(&revpi);

    assert_eq!(client.write(20, &[0xaa, 0xbb]).unwrap(), 1);
    assert_eq!(&revpi.image()[20..22], &[0xaa, 0x00]);
}

#[rstest]
fn test_seek_failure(revpi: SimulatedTransport) {
    revpi.fail_next(Operation::Seek, Errno::EINVAL);
    let mut client = client_for(&revpi);

    let err = client.write(5, &[1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SeekFailure);
    assert_eq!(err.code(), -2);
    assert_eq!(err.errno(), Some(Errno::EINVAL));
    assert!(!revpi.calls().iter().any(Call::is_transfer));
}

#[rstest]
#[case(Operation::Read)]
#[case(Operation::Write)]
fn test_transfer_failure(revpi: SimulatedTransport, #[case] operation: Operation) {
    revpi.fail_next(operation, Errno::EFAULT);
    let mut client = client_for(&revpi);

    let mut buf = [0u8; 1];
    let err = match operation {
        Operation::Read => client.read(0, &mut buf).unwrap_err(),
        _ => client.write(0, &[1]).unwrap_err(),
    };
    assert_eq!(err.kind(), ErrorKind::TransferFailure);
    assert_eq!(err.code(), -3);
    assert_eq!(err.errno(), Some(Errno::EFAULT));
}

#[rstest]
fn test_no_local_bounds_check(revpi: SimulatedTransport) {
    let mut client = client_for(&revpi);

    // The offset is forwarded as is; the simulated driver rejects the transfer
    let err = client.write(5000, &[1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransferFailure);
    assert!(revpi.calls().contains(&Call::Seek(5000)));
}

#[rstest]
fn test_failure_keeps_handle_open(revpi: SimulatedTransport) {
    revpi.fail_next(Operation::Read, Errno::EIO);
    let mut client = client_for(&revpi);

    let mut buf = [0u8; 1];
    assert!(client.read(0, &mut buf).is_err());
    assert!(client.is_open());
    assert_eq!(client.read(0, &mut buf).unwrap(), 1);
}

proptest! {
    #[test]
    fn prop_write_then_read(offset in 0u32..4000, data in prop::collection::vec(any::<u8>(), 1..64)) {
        let sim = SimulatedTransport::default();
        let mut client = client_for(&sim);

        prop_assert_eq!(client.write(offset, &data).unwrap(), data.len());
        prop_assert_eq!(client.read_vec(offset, data.len()).unwrap(), data);
    }
}
