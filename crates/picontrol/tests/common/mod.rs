//! Common test utilities and fixtures
//!
//! - rstest for fixtures
//! - `SimulatedTransport` stands in for the piControl driver
//! - #[tokio::test] for the async wrapper

#![allow(dead_code)]

use picontrol::{ClientConfig, DeviceInfo, ProcessImageClient, SimulatedTransport};
use rstest::fixture;

/// Offset of the Core's LED byte
pub const LED_OFFSET: u16 = 6;
/// Offset of the DIO input byte holding `I_1` and `I_2`
pub const INPUT_BYTE: u16 = 11;
/// Offset of the DIO output byte holding `O_1`
pub const OUTPUT_BYTE: u16 = 81;
/// Offset of the 32-bit `Counter_1`
pub const COUNTER_OFFSET: u16 = 15;
/// Offset of the 16-bit `AnalogIn`
pub const ANALOG_OFFSET: u16 = 40;
/// Offset of the 8-bit `PWM_1`
pub const PWM_OFFSET: u16 = 90;
/// Bus address of the DIO module
pub const DIO_ADDRESS: u8 = 31;

/// RevPi Core at address 0.
pub fn core_device() -> DeviceInfo {
    DeviceInfo {
        address: 0,
        serial_number: 12345,
        module_type: 95,
        hw_revision: 1,
        sw_major: 1,
        sw_minor: 2,
        input_offset: 0,
        input_length: 6,
        output_offset: 6,
        output_length: 5,
        active: 1,
        ..Default::default()
    }
}

/// RevPi DIO at address 31.
pub fn dio_device() -> DeviceInfo {
    DeviceInfo {
        address: DIO_ADDRESS,
        serial_number: 54321,
        module_type: 96,
        base_offset: 11,
        input_offset: 11,
        input_length: 70,
        output_offset: 81,
        output_length: 18,
        active: 1,
        ..Default::default()
    }
}

/// Simulated driver with a Core and a DIO and their variables.
#[fixture]
pub fn revpi() -> SimulatedTransport {
    SimulatedTransport::default()
        .with_device(core_device())
        .with_device(dio_device())
        .with_variable("RevPiLED", LED_OFFSET, 0, 8)
        .with_variable("I_1", INPUT_BYTE, 0, 1)
        .with_variable("I_2", INPUT_BYTE, 1, 1)
        .with_variable("O_1", OUTPUT_BYTE, 0, 1)
        .with_variable("Counter_1", COUNTER_OFFSET, 0, 32)
        .with_variable("AnalogIn", ANALOG_OFFSET, 0, 16)
        .with_variable("PWM_1", PWM_OFFSET, 0, 8)
        .with_variable("Odd_Width", 100, 0, 12)
}

/// Client over `sim` with the default configuration.
pub fn client_for(sim: &SimulatedTransport) -> ProcessImageClient<SimulatedTransport> {
    ProcessImageClient::with_transport(sim.clone(), ClientConfig::default())
}

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
