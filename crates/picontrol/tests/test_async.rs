//! Async wrapper over the blocking client

#![cfg(feature = "async")]

mod common;

use common::{COUNTER_OFFSET, OUTPUT_BYTE, revpi};
use picontrol::{
    AsyncProcessImageClient, ClientConfig, Error, ErrorKind, ProcessImageClient,
    SimulatedTransport, VariableValue,
};
use rstest::rstest;
use std::time::Duration;

fn async_client(sim: &SimulatedTransport, config: ClientConfig) -> AsyncProcessImageClient<SimulatedTransport> {
    AsyncProcessImageClient::from_client(ProcessImageClient::with_transport(sim.clone(), config))
}

#[rstest]
#[tokio::test]
async fn test_async_read_write(revpi: SimulatedTransport) {
    let client = async_client(&revpi, ClientConfig::default());

    assert_eq!(client.write(200, vec![7, 8, 9]).await.unwrap(), 3);
    assert_eq!(client.read(200, 3).await.unwrap(), vec![7, 8, 9]);
}

#[rstest]
#[tokio::test]
async fn test_async_variables_and_bits(revpi: SimulatedTransport) {
    revpi.poke(usize::from(COUNTER_OFFSET), &[1, 0, 0, 0]);
    let client = async_client(&revpi, ClientConfig::default());

    assert_eq!(client.find_variable("Counter_1").await.unwrap(), COUNTER_OFFSET);
    assert_eq!(client.read_variable("Counter_1").await.unwrap(), VariableValue::U32(1));
    assert!(client.variable_exists("O_1").await);
    assert!(!client.variable_exists("Nope").await);

    client.set_bit(OUTPUT_BYTE, 4, true).await.unwrap();
    assert!(client.get_bit(OUTPUT_BYTE, 4).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_clones_share_one_client(revpi: SimulatedTransport) {
    let client = async_client(&revpi, ClientConfig::default());
    let other = client.clone();

    client.open().await.unwrap();
    other.reset().await.unwrap();
    other.close().await.unwrap();

    assert_eq!(revpi.resets(), 1);
    let opens = revpi
        .calls()
        .iter()
        .filter(|c| **c == picontrol::Call::Open)
        .count();
    assert_eq!(opens, 1);
}

#[rstest]
#[tokio::test]
async fn test_slow_call_times_out(revpi: SimulatedTransport) {
    let config = ClientConfig::default().with_timeout(Duration::from_millis(20));
    let client = async_client(&revpi, config);
    assert_eq!(client.timeout(), Some(Duration::from_millis(20)));

    let err = client
        .call(|client| {
            std::thread::sleep(Duration::from_millis(200));
            client.reset()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(20)));
    assert_eq!(err.kind(), ErrorKind::Interrupted);
}

#[rstest]
#[tokio::test]
async fn test_errors_pass_through(revpi: SimulatedTransport) {
    revpi.set_available(false);
    let client = async_client(&revpi, ClientConfig::default());

    let err = client.device_info_list().await.unwrap_err();
    assert!(err.is_transport_unavailable());
}
