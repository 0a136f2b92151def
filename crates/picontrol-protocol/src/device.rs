//! Device descriptors
//!
//! One [`DeviceInfo`] describes a physical or virtual module known to the
//! driver, including where its input, output and config sections live in
//! the process image.

use serde::{Deserialize, Serialize};

/// Module type flag set by the driver when a configured module is missing.
pub const NOT_CONNECTED: u16 = 0x8000;

/// Mask removing [`NOT_CONNECTED`] from a module type.
pub const NOT_CONNECTED_MASK: u16 = 0x7fff;

/// Virtual Modbus TCP slave adapter.
pub const SW_MODBUS_TCP_SLAVE: u16 = 0x6001;
/// Virtual Modbus RTU slave adapter.
pub const SW_MODBUS_RTU_SLAVE: u16 = 0x6002;
/// Virtual Modbus TCP master adapter.
pub const SW_MODBUS_TCP_MASTER: u16 = 0x6003;
/// Virtual Modbus RTU master adapter.
pub const SW_MODBUS_RTU_MASTER: u16 = 0x6004;

/// Descriptor of one connected module (`SDeviceInfo`)
///
/// Layout matches the driver record: 72 bytes, natural C alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct DeviceInfo {
    /// Module address on the bus
    pub address: u8,

    /// Serial number
    pub serial_number: u32,

    /// Module type, possibly flagged with [`NOT_CONNECTED`]
    pub module_type: u16,

    /// Hardware revision
    pub hw_revision: u16,

    /// Firmware major version
    pub sw_major: u16,

    /// Firmware minor version
    pub sw_minor: u16,

    /// Firmware SVN revision
    pub svn_revision: u32,

    /// Length of the input section in bytes
    pub input_length: u16,

    /// Length of the output section in bytes
    pub output_length: u16,

    /// Length of the config section in bytes
    pub config_length: u16,

    /// Offset of the module in the process image
    pub base_offset: u16,

    /// Offset of the input section in the process image
    pub input_offset: u16,

    /// Offset of the output section in the process image
    pub output_offset: u16,

    /// Offset of the config section in the process image
    pub config_offset: u16,

    /// Index of the module's first entry in the driver's entry table
    pub first_entry: u16,

    /// Number of entries of the module
    pub entries: u16,

    /// Driver specific module state
    pub module_state: u8,

    /// Non-zero when the module is present and configured
    pub active: u8,

    /// Padding reserved by the driver, always zero
    #[doc(hidden)]
    #[serde(skip)]
    pub reserved: [u8; 30],
}

impl DeviceInfo {
    /// Module type with the [`NOT_CONNECTED`] flag removed.
    pub fn base_module_type(&self) -> u16 {
        self.module_type & NOT_CONNECTED_MASK
    }

    /// Whether the configured module is physically connected.
    pub fn is_connected(&self) -> bool {
        self.module_type & NOT_CONNECTED == 0
    }

    /// Whether the module is present and configured.
    pub fn is_active(&self) -> bool {
        self.active != 0
    }

    /// Friendly name of the module type.
    pub fn module_name(&self) -> &'static str {
        module_name(self.module_type)
    }
}

/// How a single device is looked up by [`Request::GetDeviceInfo`]
///
/// [`Request::GetDeviceInfo`]: crate::Request::GetDeviceInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSelector {
    /// Select by bus address
    Address(u8),
    /// Select by module type
    ModuleType(u16),
}

impl DeviceSelector {
    /// Build the request record the driver expects for this selector.
    pub fn to_request(self) -> DeviceInfo {
        let mut info = DeviceInfo::default();
        match self {
            Self::Address(address) => info.address = address,
            Self::ModuleType(module_type) => info.module_type = module_type,
        }
        info
    }

    /// Whether `device` is the one this selector designates.
    pub fn matches(self, device: &DeviceInfo) -> bool {
        match self {
            Self::Address(address) => device.address == address,
            Self::ModuleType(module_type) => device.base_module_type() == module_type,
        }
    }
}

/// Friendly name for a module type.
pub fn module_name(module_type: u16) -> &'static str {
    match module_type & NOT_CONNECTED_MASK {
        95 => "RevPi Core",
        96 => "RevPi DIO",
        97 => "RevPi DI",
        98 => "RevPi DO",
        103 => "RevPi AIO",
        SW_MODBUS_TCP_SLAVE => "ModbusTCP Slave Adapter",
        SW_MODBUS_RTU_SLAVE => "ModbusRTU Slave Adapter",
        SW_MODBUS_TCP_MASTER => "ModbusTCP Master Adapter",
        SW_MODBUS_RTU_MASTER => "ModbusRTU Master Adapter",
        100 => "Gateway DMX",
        71 => "Gateway CANopen",
        73 => "Gateway DeviceNet",
        74 => "Gateway EtherCAT",
        75 => "Gateway EtherNet/IP",
        93 => "Gateway ModbusTCP",
        76 => "Gateway Powerlink",
        77 => "Gateway Profibus",
        79 => "Gateway Profinet IRT",
        81 => "Gateway SercosIII",
        _ => "unknown moduletype",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_device_info_layout() {
        assert_eq!(std::mem::size_of::<DeviceInfo>(), 72);
        assert_eq!(std::mem::align_of::<DeviceInfo>(), 4);
    }

    #[rstest]
    #[case(95, "RevPi Core")]
    #[case(96 | NOT_CONNECTED, "RevPi DIO")]
    #[case(SW_MODBUS_RTU_MASTER, "ModbusRTU Master Adapter")]
    #[case(81, "Gateway SercosIII")]
    #[case(4242, "unknown moduletype")]
    fn test_module_name(#[case] module_type: u16, #[case] expected: &str) {
        assert_eq!(module_name(module_type), expected);
    }

    #[test]
    fn test_connection_flag() {
        let mut info = DeviceInfo {
            module_type: 96,
            ..Default::default()
        };
        assert!(info.is_connected());

        info.module_type |= NOT_CONNECTED;
        assert!(!info.is_connected());
        assert_eq!(info.base_module_type(), 96);
        assert_eq!(info.module_name(), "RevPi DIO");
    }

    #[test]
    fn test_selector_request_record() {
        let by_address = DeviceSelector::Address(31).to_request();
        assert_eq!(by_address.address, 31);
        assert_eq!(by_address.module_type, 0);

        let by_type = DeviceSelector::ModuleType(97).to_request();
        assert_eq!(by_type.address, 0);
        assert_eq!(by_type.module_type, 97);
    }

    #[test]
    fn test_device_info_serializes_without_reserved_bytes() {
        let info = DeviceInfo {
            address: 32,
            module_type: 98,
            active: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["address"], 32);
        assert_eq!(json["module_type"], 98);
        assert!(json.get("reserved").is_none());
    }
}
