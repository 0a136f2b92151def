//! Transport layer for the piControl process image
//!
//! Provides the primitives the client is built on: opening a handle,
//! byte-range transfers behind a seek, and one multiplexed control
//! request channel.
//!
//! # Architecture
//!
//! - **Transport trait**: opens handles, see [`Transport`]
//! - **Handle trait**: seek, read, write and control on an open handle
//! - **Device transport**: the character device node, driven with `ioctl(2)`

#![deny(unsafe_code)]
#![warn(missing_docs)]
//! - **Simulated transport**: an in-memory collaborator for tests and demos
//! - **Error handling**: one error per failure class
//!
//! # Usage
//!
//! ```ignore
//! use picontrol_transport::{DeviceTransport, ImageHandle, Transport};
//!
//! let transport = DeviceTransport::default();
//! let mut handle = transport.open()?;
//! handle.seek(0)?;
//! let mut buf = [0u8; 4];
//! let n = handle.read(&mut buf)?;
//! ```

pub mod device;
pub mod error;
pub mod simulated;
pub mod traits;

// Re-export commonly used types
pub use device::{DeviceHandle, DeviceTransport};
pub use error::{Result, TransportError};
pub use simulated::{Call, Operation, SimulatedHandle, SimulatedTransport};
pub use traits::{ControlRequest, ImageHandle, Transport};
