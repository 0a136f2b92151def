//! # picontrol
//!
//! Client for the piControl process image of a Revolution Pi:
//! - Byte-range read and write at arbitrary offsets
//! - Variable lookup by name
//! - Single-bit get and set, performed atomically by the driver
//! - Device enumeration, process image reset, DIO counter reset
//! - Driver events and firmware updates
//! - Optional tokio wrapper with per-call timeouts (`async` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use picontrol::{ProcessImageClient, VariableValue};
//!
//! fn main() -> picontrol::Result<()> {
//!     let mut client = ProcessImageClient::new();
//!
//!     let led = client.resolve_variable("RevPiLED")?;
//!     client.write(u32::from(led.offset), &[0x03])?;
//!
//!     if let VariableValue::Bit(on) = client.read_variable("I_1")? {
//!         println!("I_1 is {}", if on { "on" } else { "off" });
//!     }
//!
//!     for device in client.device_info_list()? {
//!         println!("{} at address {}", device.module_name(), device.address);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The handle on `/dev/piControl0` is opened by the first operation and
//! released when the client is closed or dropped. Tests and tools that have
//! no driver can plug in [`SimulatedTransport`] instead.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{HandleState, ProcessImageClient};
pub use config::{ClientConfig, NamePolicy};
pub use error::{Error, ErrorKind, Result};
pub use value::VariableValue;

#[cfg(feature = "async")]
pub use asynchronous::AsyncProcessImageClient;

pub use picontrol_protocol::{
    DEFAULT_DEVICE_PATH, DeviceInfo, DeviceSelector, Event, MAX_DEVICES, PROCESS_IMAGE_SIZE,
    Request, Variable, VariableName, module_name,
};
pub use picontrol_transport::{
    Call, DeviceTransport, ImageHandle, Operation, SimulatedTransport, Transport, TransportError,
};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod value;

mod bits;
mod resolver;

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod asynchronous;

// Re-export the errno type carried by errors
pub use nix::errno::Errno;
