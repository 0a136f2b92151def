//! Variable names and variable records
//!
//! The driver identifies variables by a NUL-terminated name stored in a
//! fixed 32-byte field. Longer names are cut to fit, which may make them
//! resolve to a different variable or to none at all.

use crate::error::{ProtocolError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Width of the name field, terminating NUL included.
pub const VARIABLE_NAME_LEN: usize = 32;

/// A variable name as stored in the driver's fixed-width field
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableName([u8; VARIABLE_NAME_LEN]);

impl VariableName {
    /// Longest name that fits without truncation.
    pub const MAX_LEN: usize = VARIABLE_NAME_LEN - 1;

    /// Copy `name` into the field the way `strncpy` does.
    ///
    /// Copying stops at the first NUL byte or after [`Self::MAX_LEN`] bytes,
    /// and the field is always NUL-terminated. The cut is byte-wise, so it
    /// can split a multi-byte UTF-8 character.
    pub fn truncating(name: &str) -> Self {
        let mut raw = [0u8; VARIABLE_NAME_LEN];
        for (slot, byte) in raw[..Self::MAX_LEN]
            .iter_mut()
            .zip(name.bytes().take_while(|b| *b != 0))
        {
            *slot = byte;
        }
        Self(raw)
    }

    /// Copy `name` into the field, rejecting names that would be altered.
    pub fn strict(name: &str) -> Result<Self> {
        if let Some(position) = name.bytes().position(|b| b == 0) {
            return Err(ProtocolError::NameContainsNul { position });
        }
        if name.len() > Self::MAX_LEN {
            return Err(ProtocolError::NameTooLong {
                len: name.len(),
                max: Self::MAX_LEN,
            });
        }
        Ok(Self::truncating(name))
    }

    /// Wrap a raw field as returned by the driver.
    pub fn from_raw(raw: [u8; VARIABLE_NAME_LEN]) -> Self {
        Self(raw)
    }

    /// The complete field, padding included.
    pub fn as_raw(&self) -> &[u8; VARIABLE_NAME_LEN] {
        &self.0
    }

    /// Name bytes up to the terminating NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(VARIABLE_NAME_LEN);
        &self.0[..end]
    }

    /// Name as text, invalid UTF-8 replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Whether storing `name` in this field lost bytes.
    pub fn truncated_from(&self, name: &str) -> bool {
        self.as_bytes() != name.as_bytes()
    }
}

impl Default for VariableName {
    fn default() -> Self {
        Self([0; VARIABLE_NAME_LEN])
    }
}

impl fmt::Debug for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableName({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Serialize for VariableName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

/// Variable lookup record (`SPIVariable`)
///
/// The name is filled in by the caller; address, bit and length are filled
/// in by the driver on success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SpiVariable {
    /// NUL-terminated variable name
    pub name: [u8; VARIABLE_NAME_LEN],

    /// Byte offset in the process image
    pub address: u16,

    /// Bit position within the byte, for 1-bit variables
    pub bit: u8,

    /// Length in bits
    pub length: u16,
}

impl SpiVariable {
    /// Lookup record for `name`, result fields zeroed.
    pub fn lookup(name: VariableName) -> Self {
        Self {
            name: *name.as_raw(),
            ..Default::default()
        }
    }
}

/// A resolved variable
///
/// Offsets are only valid for the process image layout that was active
/// when the variable was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// Name as sent to the driver
    pub name: VariableName,

    /// Byte offset in the process image
    pub offset: u16,

    /// Bit position within the byte
    pub bit: u8,

    /// Length in bits
    pub length: u16,
}

impl Variable {
    /// Whether this is a single-bit variable.
    pub fn is_bit(&self) -> bool {
        self.length == 1
    }

    /// Width in bytes for whole-byte variables.
    pub fn byte_width(&self) -> Option<usize> {
        (self.length % 8 == 0 && self.length > 0).then(|| usize::from(self.length / 8))
    }
}

impl From<SpiVariable> for Variable {
    fn from(raw: SpiVariable) -> Self {
        Self {
            name: VariableName::from_raw(raw.name),
            offset: raw.address,
            bit: raw.bit,
            length: raw.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_spi_variable_layout() {
        assert_eq!(std::mem::size_of::<SpiVariable>(), 38);
    }

    #[test]
    fn test_short_name_is_copied_verbatim() {
        let name = VariableName::truncating("RevPiLED");
        assert_eq!(name.as_bytes(), b"RevPiLED");
        assert_eq!(name.as_raw()[8], 0);
        assert!(!name.truncated_from("RevPiLED"));
    }

    #[test]
    fn test_long_name_keeps_first_31_bytes() {
        let long = "A_very_long_variable_name_exceeding_the_field";
        let name = VariableName::truncating(long);

        assert_eq!(name.as_bytes().len(), VariableName::MAX_LEN);
        assert_eq!(name.as_bytes(), &long.as_bytes()[..31]);
        assert_eq!(name.as_raw()[31], 0);
        assert!(name.truncated_from(long));
    }

    #[test]
    fn test_truncation_is_deterministic() {
        let a = VariableName::truncating("Input_Channel_Counter_Value_0001_extra");
        let b = VariableName::truncating("Input_Channel_Counter_Value_0001_other");
        assert_eq!(a, b);
    }

    #[test]
    fn test_copy_stops_at_nul() {
        let name = VariableName::truncating("In\0put");
        assert_eq!(name.as_bytes(), b"In");
    }

    #[test]
    fn test_truncation_may_split_utf8() {
        // 30 ASCII bytes followed by a two-byte character
        let name = format!("{}é", "x".repeat(30));
        let stored = VariableName::truncating(&name);

        assert_eq!(stored.as_bytes().len(), 31);
        assert!(std::str::from_utf8(stored.as_bytes()).is_err());
        assert!(stored.to_string_lossy().ends_with('\u{FFFD}'));
    }

    #[rstest]
    #[case("", true)]
    #[case("RevPiLED", true)]
    #[case("nnnnnnnnnnnnnnnnnnnnnnnnnnnnnnn", true)]
    #[case("nnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnn", false)]
    #[case("bad\0name", false)]
    fn test_strict_names(#[case] name: &str, #[case] accepted: bool) {
        assert_eq!(VariableName::strict(name).is_ok(), accepted);
    }

    #[test]
    fn test_strict_reports_length() {
        let err = VariableName::strict(&"n".repeat(40)).unwrap_err();
        assert_eq!(err, ProtocolError::NameTooLong { len: 40, max: 31 });
    }

    #[test]
    fn test_variable_widths() {
        let mut raw = SpiVariable::lookup(VariableName::truncating("Counter"));
        raw.address = 11;
        raw.length = 16;
        let var = Variable::from(raw);

        assert_eq!(var.name.to_string(), "Counter");
        assert_eq!(var.offset, 11);
        assert!(!var.is_bit());
        assert_eq!(var.byte_width(), Some(2));

        let bit = Variable { length: 1, ..var };
        assert!(bit.is_bit());
        assert_eq!(bit.byte_width(), None);
    }
}
