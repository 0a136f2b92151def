//! Device-file transport
//!
//! Talks to the piControl driver through its character device node:
//! `lseek` + `read`/`write` for byte ranges, `ioctl` for control requests.

pub mod file;
mod ioctl;

pub use file::{DeviceHandle, DeviceTransport};
