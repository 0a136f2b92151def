//! Wire records and control request codes of the piControl driver
//!
//! This crate holds the fixed-layout records exchanged with the piControl
//! kernel module through `/dev/piControl0`, shared by the transport layer
//! (`picontrol-transport`) and the client (`picontrol`).
//!
//! # Type Organization
//!
//! - **Control requests**: [`request`] - request codes and fixed capacities
//! - **Devices**: [`device`] - per-module descriptors and module names
//! - **Variables**: [`variable`] - bounded names and variable records
//! - **Values**: [`value`] - bit values, counter resets, driver events
//! - **Error types**: [`error`] - name validation errors
//!
//! # Design Principles
//!
//! - **Zero I/O**: All types are plain data
//! - **C layout**: Every record passed to the driver is `#[repr(C)]` and
//!   matches the driver's struct byte for byte

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod device;
pub mod error;
pub mod request;
pub mod value;
pub mod variable;

// Re-export commonly used types at crate level
pub use device::{DeviceInfo, DeviceSelector, module_name};
pub use error::{ProtocolError, Result};
pub use request::{
    DEFAULT_DEVICE_PATH, LAST_MESSAGE_LEN, MAX_DEVICES, PROCESS_IMAGE_SIZE, Request,
};
pub use value::{DioResetCounter, Event, SpiValue};
pub use variable::{SpiVariable, VARIABLE_NAME_LEN, Variable, VariableName};
