//! Text rendering for `pitest` output

use clap::ValueEnum;
use picontrol::{DeviceInfo, Variable, VariableValue};
use std::fmt::Write;

/// How a value read from the image is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueFormat {
    /// Decimal
    Dec,
    /// Hexadecimal
    Hex,
    /// Raw bytes as stored in the image
    Bin,
}

/// Render the device list the way the driver's own tools do.
pub fn device_list(devices: &[DeviceInfo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} devices:", devices.len());
    for device in devices {
        let _ = writeln!(
            out,
            "Address: {} module type: {} (0x{:x}) {} V{}.{}",
            device.address,
            device.module_type,
            device.module_type,
            device.module_name(),
            device.sw_major,
            device.sw_minor
        );

        let presence = if device.is_active() {
            "Module is present"
        } else if !device.is_connected() {
            "Module is NOT present, data is NOT available!!!"
        } else {
            "Module is present, but NOT CONFIGURED!!!"
        };
        let _ = writeln!(out, "{presence}");

        let _ = writeln!(
            out,
            "     input offset: {} length: {}",
            device.input_offset, device.input_length
        );
        let _ = writeln!(
            out,
            "    output offset: {} length: {}",
            device.output_offset, device.output_length
        );
        out.push('\n');
    }
    out
}

/// Render a resolved variable.
pub fn variable(variable: &Variable) -> String {
    format!(
        "variable name: {}\n       offset: {}\n       length: {}\n          bit: {}\n",
        variable.name, variable.offset, variable.length, variable.bit
    )
}

/// Render a value read from `name`.
pub fn value(name: &str, value: VariableValue, format: ValueFormat, quiet: bool) -> String {
    if let VariableValue::Bit(bit) = value {
        let bit = u8::from(bit);
        return if quiet {
            format!("{bit}\n")
        } else {
            format!("Bit value: {bit}\n")
        };
    }

    let bytes = value.to_le_bytes();
    let size = bytes.len();
    let hex_bytes: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let n = value.as_u32();

    match (format, quiet) {
        (ValueFormat::Dec, false) => {
            format!("{size} byte-value of {name}: {n} dec (={hex_bytes} hex bytes)\n")
        }
        (ValueFormat::Dec, true) => format!("{n}\n"),
        (ValueFormat::Hex, false) => {
            format!("{size} byte-value of {name}: {hex_bytes} hex bytes (={n} dec)\n")
        }
        (ValueFormat::Hex, true) => format!("{n:x}\n"),
        (ValueFormat::Bin, _) => {
            // always the full 32-bit value, whatever the variable's width
            let spaced: Vec<String> = n.to_le_bytes().iter().map(|b| format!("{b:02x}")).collect();
            let prefix = if quiet {
                String::new()
            } else {
                format!("{size} byte value of {name}: ")
            };
            format!("{prefix}binary value:{}\n", spaced.join(" "))
        }
    }
}

/// Announcement printed before a write.
pub fn writing(name: &str, value: u32) -> String {
    format!("writing variable: {name}, value: {value}\n")
}

/// Confirmation printed after a write.
pub fn written(variable: &Variable, value: VariableValue) -> String {
    let n = value.as_u32();
    format!(
        "written value {n} dec (={n:02x} hex) to offset {}.\n",
        variable.offset
    )
}
