//! Typed variable values
//!
//! Single-bit variables go through the bit accessor; 8, 16 and 32 bit
//! variables are little-endian integers in the process image.

use picontrol_protocol::Variable;
use picontrol_transport::Transport;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::{
    client::ProcessImageClient,
    error::{Error, Result},
};

/// Value of a resolved variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum VariableValue {
    /// 1-bit variable
    Bit(bool),
    /// 8-bit variable
    U8(u8),
    /// 16-bit variable
    U16(u16),
    /// 32-bit variable
    U32(u32),
}

impl VariableValue {
    /// Value widened to 32 bits.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Bit(bit) => u32::from(bit),
            Self::U8(v) => u32::from(v),
            Self::U16(v) => u32::from(v),
            Self::U32(v) => v,
        }
    }

    /// Little-endian bytes as stored in the image; empty for bits.
    pub fn to_le_bytes(self) -> Vec<u8> {
        match self {
            Self::Bit(_) => Vec::new(),
            Self::U8(v) => vec![v],
            Self::U16(v) => v.to_le_bytes().to_vec(),
            Self::U32(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Fit `value` to the width of `variable`, dropping high bits.
    ///
    /// Bit variables are set for any nonzero value.
    pub fn for_variable(variable: &Variable, value: u32) -> Result<Self> {
        match variable.length {
            1 => Ok(Self::Bit(value != 0)),
            8 => Ok(Self::U8(value as u8)),
            16 => Ok(Self::U16(value as u16)),
            32 => Ok(Self::U32(value)),
            other => Err(Error::UnsupportedWidth(other)),
        }
    }

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [b] => Some(Self::U8(b)),
            [b0, b1] => Some(Self::U16(u16::from_le_bytes([b0, b1]))),
            [b0, b1, b2, b3] => Some(Self::U32(u32::from_le_bytes([b0, b1, b2, b3]))),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit(bit) => write!(f, "{}", u8::from(*bit)),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
        }
    }
}

impl<T: Transport> ProcessImageClient<T> {
    /// Resolve `name` and read its value.
    pub fn read_variable(&mut self, name: &str) -> Result<VariableValue> {
        let variable = self.resolve_variable(name)?;
        self.read_value(&variable)
    }

    /// Read the value of an already resolved variable.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedWidth`] for widths other than 1, 8, 16 and 32
    /// bits, [`Error::ShortTransfer`] when fewer bytes than the width were
    /// read.
    pub fn read_value(&mut self, variable: &Variable) -> Result<VariableValue> {
        if variable.is_bit() {
            return Ok(VariableValue::Bit(self.get_bit(variable.offset, variable.bit)?));
        }

        let width = match variable.length {
            8 | 16 | 32 => usize::from(variable.length / 8),
            other => return Err(Error::UnsupportedWidth(other)),
        };

        let mut buf = [0u8; 4];
        let n = self.read(u32::from(variable.offset), &mut buf[..width])?;
        if n < width {
            return Err(Error::ShortTransfer {
                expected: width,
                actual: n,
            });
        }

        VariableValue::from_le_bytes(&buf[..width]).ok_or(Error::UnsupportedWidth(variable.length))
    }

    /// Resolve `name` and write `value` to it.
    ///
    /// Returns the value as stored, after fitting it to the variable's width.
    pub fn write_variable(&mut self, name: &str, value: u32) -> Result<VariableValue> {
        let variable = self.resolve_variable(name)?;
        let value = VariableValue::for_variable(&variable, value)?;
        self.write_value(&variable, value)?;
        Ok(value)
    }

    /// Write `value` to an already resolved variable.
    pub fn write_value(&mut self, variable: &Variable, value: VariableValue) -> Result<()> {
        if let VariableValue::Bit(bit) = value {
            if !variable.is_bit() {
                return Err(Error::UnsupportedWidth(variable.length));
            }
            return self.set_bit(variable.offset, variable.bit, bit);
        }

        let bytes = value.to_le_bytes();
        if variable.byte_width() != Some(bytes.len()) {
            return Err(Error::UnsupportedWidth(variable.length));
        }

        let n = self.write(u32::from(variable.offset), &bytes)?;
        if n < bytes.len() {
            return Err(Error::ShortTransfer {
                expected: bytes.len(),
                actual: n,
            });
        }

        debug!(name = %variable.name, offset = variable.offset, %value, "Wrote variable");
        Ok(())
    }
}
