//! Single-bit access
//!
//! Bits are read and written by the driver in one request each. The client
//! never reads a byte, changes it and writes it back, so a concurrent writer
//! of a neighbouring bit in the same byte is never overwritten.

use picontrol_protocol::SpiValue;
use picontrol_transport::{ControlRequest, Transport};
use tracing::trace;

use crate::{client::ProcessImageClient, error::Result};

impl<T: Transport> ProcessImageClient<T> {
    /// Read bit `bit` of the byte at `offset`.
    ///
    /// `bit` is passed to the driver unchanged; values above 7 are for the
    /// driver to reject.
    pub fn get_bit(&mut self, offset: u16, bit: u8) -> Result<bool> {
        let mut value = SpiValue::get(offset, bit);
        self.control(ControlRequest::GetBitValue(&mut value))?;
        let set = value.is_set();
        trace!(offset, bit, set, "Read bit");
        Ok(set)
    }

    /// Set or clear bit `bit` of the byte at `offset`.
    pub fn set_bit(&mut self, offset: u16, bit: u8, value: bool) -> Result<()> {
        let request = SpiValue::set(offset, bit, value);
        self.control(ControlRequest::SetBitValue(&request))?;
        trace!(offset, bit, value, "Wrote bit");
        Ok(())
    }
}
