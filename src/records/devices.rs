//! `Devices.xml`: the inventory of instrument modules.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{attribute, optional, reject_unknown_children, text};
use crate::schema;
use crate::xml::{
    enum_from_value_or_member, to_int, DeviceType, DeviceVendor, FromXml, ParseError,
    ParseOptions, StoredDataType, VersionedList, XmlElement, XmlFile,
};

const DEVICE_CHILDREN: &[&str] = &[
    "Name",
    "DriverVersion",
    "FirmwareVersion",
    "ModelNumber",
    "OrdinalNumber",
    "SerialNumber",
    "Type",
    "StoredDataType",
    "Delay",
    "Vendor",
];

/// A device listed in `Devices.xml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// ID of the device
    pub device_id: u32,
    /// Display name of the device
    pub display_name: String,
    /// Version of the device driver
    pub driver_version: String,
    /// Version of the device firmware
    pub firmware_version: String,
    /// Model number
    pub model_number: String,
    /// Ordinal number among devices of the same type
    pub ordinal_number: i32,
    /// Serial number
    pub serial_number: String,
    /// Kind of device
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Kinds of data the device stores
    pub stored_data_type: StoredDataType,
    /// Delay
    pub delay: i32,
    /// Supplier of the device
    pub vendor: DeviceVendor,
}

impl Device {
    /// A device with the given ID and every other field at its default
    pub fn new(device_id: u32) -> Self {
        Self {
            device_id,
            display_name: String::new(),
            driver_version: String::new(),
            firmware_version: String::new(),
            model_number: String::new(),
            ordinal_number: 0,
            serial_number: String::new(),
            device_type: DeviceType::Unknown,
            stored_data_type: StoredDataType::UNSPECIFIED,
            delay: 0,
            vendor: DeviceVendor::Other,
        }
    }
}

impl FromXml for Device {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        reject_unknown_children(element, DEVICE_CHILDREN)?;

        let device_id = attribute(element, "DeviceID", to_int)?;
        let defaults = Device::new(device_id);

        Ok(Self {
            device_id,
            display_name: optional(element, "Name", text)?.unwrap_or(defaults.display_name),
            driver_version: optional(element, "DriverVersion", text)?
                .unwrap_or(defaults.driver_version),
            firmware_version: optional(element, "FirmwareVersion", text)?
                .unwrap_or(defaults.firmware_version),
            model_number: optional(element, "ModelNumber", text)?.unwrap_or(defaults.model_number),
            ordinal_number: optional(element, "OrdinalNumber", to_int)?
                .unwrap_or(defaults.ordinal_number),
            serial_number: optional(element, "SerialNumber", text)?
                .unwrap_or(defaults.serial_number),
            device_type: optional(element, "Type", |v| enum_from_value_or_member(v))?
                .unwrap_or(defaults.device_type),
            stored_data_type: optional(element, "StoredDataType", |v| {
                enum_from_value_or_member(v)
            })?
            .unwrap_or(defaults.stored_data_type),
            delay: optional(element, "Delay", to_int)?.unwrap_or(defaults.delay),
            vendor: optional(element, "Vendor", |v| enum_from_value_or_member(v))?
                .unwrap_or(defaults.vendor),
        })
    }
}

/// Devices listed in `Devices.xml`.
///
/// Device IDs are unique within a list. Lookups by ID build an index on first
/// use and reuse it afterwards; the index lives in a [`OnceCell`], so a
/// `DeviceList` is not `Sync` and must not be shared between threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceList {
    #[serde(flatten)]
    devices: VersionedList<Device>,
    #[serde(skip)]
    index: OnceCell<HashMap<u32, usize>>,
}

impl DeviceList {
    /// Create an empty list
    pub fn new(version: u32) -> Self {
        Self {
            devices: VersionedList::new(version),
            index: OnceCell::new(),
        }
    }

    /// Create a list from existing devices, rejecting duplicate IDs
    pub fn with_devices(
        version: u32,
        devices: impl IntoIterator<Item = Device>,
    ) -> Result<Self, ParseError> {
        let mut list = Self::new(version);
        for device in devices {
            list.push(device)?;
        }
        Ok(list)
    }

    /// Append a device, rejecting a duplicate ID
    pub fn push(&mut self, device: Device) -> Result<(), ParseError> {
        if self.devices.iter().any(|d| d.device_id == device.device_id) {
            return Err(ParseError::DuplicateDevice(device.device_id.to_string()));
        }
        self.devices.push(device);
        self.index = OnceCell::new();
        Ok(())
    }

    /// Device with the given ID.
    ///
    /// Repeated calls on the same list return the same `&Device`.
    pub fn get_device(&self, device_id: u32) -> Option<&Device> {
        let index = self.index.get_or_init(|| {
            self.devices
                .iter()
                .enumerate()
                .map(|(position, device)| (device.device_id, position))
                .collect()
        });
        index.get(&device_id).map(|&position| &self.devices[position])
    }
}

impl Deref for DeviceList {
    type Target = VersionedList<Device>;

    fn deref(&self) -> &VersionedList<Device> {
        &self.devices
    }
}

impl PartialEq for DeviceList {
    fn eq(&self, other: &Self) -> bool {
        self.devices == other.devices
    }
}

impl PartialEq<Vec<Device>> for DeviceList {
    fn eq(&self, other: &Vec<Device>) -> bool {
        self.devices == *other
    }
}

impl FromXml for DeviceList {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let mut devices = VersionedList::<Device>::from_xml_element(element)?;
        devices.append_from_element(element, "Device")?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = devices.iter().find(|d| !seen.insert(d.device_id)) {
            return Err(ParseError::DuplicateDevice(duplicate.device_id.to_string()));
        }

        Ok(Self {
            devices,
            index: OnceCell::new(),
        })
    }
}

impl XmlFile for DeviceList {
    const FILE_NAME: &'static str = "Devices.xml";
    const SCHEMA: Option<&'static str> = Some(schema::DEVICES);
}

/// Read `Devices.xml` from the given `AcqData` directory
pub fn read_devices_xml(dir: impl AsRef<Path>) -> Result<DeviceList, ParseError> {
    DeviceList::read_from_dir(dir, &ParseOptions::default())
}
