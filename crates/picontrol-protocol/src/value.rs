//! Bit values, counter resets and driver events

use serde::{Deserialize, Serialize};

/// One bit of the process image (`SPIValue`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SpiValue {
    /// Byte offset in the process image
    pub address: u16,

    /// Bit index within the byte, 0 to 7
    pub bit: u8,

    /// Bit value, zero or non-zero
    pub value: u8,
}

impl SpiValue {
    /// Request record for reading a bit.
    pub fn get(address: u16, bit: u8) -> Self {
        Self {
            address,
            bit,
            value: 0,
        }
    }

    /// Request record for writing a bit.
    pub fn set(address: u16, bit: u8, value: bool) -> Self {
        Self {
            address,
            bit,
            value: u8::from(value),
        }
    }

    /// Bit value as a boolean.
    pub fn is_set(&self) -> bool {
        self.value != 0
    }
}

/// Counter reset request for a DIO module (`SDIOResetCounter`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct DioResetCounter {
    /// Module address
    pub address: u8,

    /// One bit per counter input to reset
    pub bitfield: u16,
}

/// Event reported by a wait-for-event request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The driver was reset
    Reset,
    /// Any event this crate does not know about
    Other(i32),
}

impl From<i32> for Event {
    fn from(raw: i32) -> Self {
        match raw {
            1 => Self::Reset,
            other => Self::Other(other),
        }
    }
}
