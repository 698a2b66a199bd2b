//! `AcqMethod.xml`: the acquisition method report.
//!
//! Besides the flat device list, the method report carries two embedded XML
//! documents as escaped text: one with configuration sections for RC devices
//! and one for SCIC devices. Each section is attached to the device it
//! configures; a section that matches no device is an error.

use std::collections::BTreeMap;
use std::path::Path;

use log::trace;
use serde::{Deserialize, Serialize};

use super::{required, text};
use crate::schema;
use crate::xml::{
    strtobool, tag_to_map, to_float, FromXml, ParseError, ParseOptions, ScalarValue,
    WindowsPath, XmlElement, XmlFile,
};

/// Key-value settings from one embedded configuration section
pub type Configuration = BTreeMap<String, ScalarValue>;

/// A device in an [`AcqMethod`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// ID of the device, e.g. `HiP-ALS_1`
    pub device_id: String,
    /// Display name of the device
    pub display_name: String,
    /// Whether this is an RC device; otherwise it is an SCIC device
    pub rc_device: bool,
    /// Configuration sections attached to the device, in document order
    pub configuration: Vec<Configuration>,
}

impl Device {
    /// A device with no configuration
    pub fn new(
        device_id: impl Into<String>,
        display_name: impl Into<String>,
        rc_device: bool,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            display_name: display_name.into(),
            rc_device,
            configuration: Vec::new(),
        }
    }
}

impl FromXml for Device {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self::new(
            required(element, "DeviceId", text)?,
            required(element, "DisplayName", text)?,
            required(element, "IsRCDevice", strtobool)?,
        ))
    }
}

/// The method used to acquire the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcqMethod {
    /// Version of the method report
    pub version: f64,
    /// Name of the method
    pub name: String,
    /// Original path of the method file
    pub filename: WindowsPath,
    /// Devices used to acquire the data
    pub devices: Vec<Device>,
}

impl AcqMethod {
    /// First device with the given ID
    pub fn get_device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.device_id == device_id)
    }
}

impl FromXml for AcqMethod {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let report = element.require_child("MethodReport")?;
        let version = required(report, "Version", to_float)?;
        let name = required(report, "MethodName", text)?;
        let filename = WindowsPath::new(report.require_text("MethodPath")?);

        let rc_devices = XmlElement::parse_str(report.require_text("RCDevicesXml")?)?;
        let scic_devices = XmlElement::parse_str(report.require_text("SCICDevicesXml")?)?;

        let mut devices = element
            .children_named("Devices")
            .map(Device::from_xml)
            .collect::<Result<Vec<_>, _>>()?;

        for section in rc_devices.children_named("Section") {
            attach_rc_section(&mut devices, tag_to_map(section, &[]), section)?;
        }
        for section in scic_devices.children_named("SectionInfo") {
            attach_scic_section(&mut devices, tag_to_map(section, &[]), section)?;
        }

        Ok(Self {
            version,
            name,
            filename,
            devices,
        })
    }
}

impl XmlFile for AcqMethod {
    const FILE_NAME: &'static str = "AcqMethod.xml";
    const SCHEMA: Option<&'static str> = Some(schema::ACQ_METHOD);
}

/// Read `AcqMethod.xml` from the given `AcqData` directory
pub fn read_acq_method(dir: impl AsRef<Path>) -> Result<AcqMethod, ParseError> {
    AcqMethod::read_from_dir(dir, &ParseOptions::default())
}

// Sections are matched on their key's text as written, not its typed value.

// RC sections match on display name.
fn attach_rc_section(
    devices: &mut [Device],
    section: Configuration,
    element: &XmlElement,
) -> Result<(), ParseError> {
    let module = element.require_text("ModuleDisplayName")?;
    let device = devices
        .iter_mut()
        .find(|device| device.rc_device && device.display_name == module)
        .ok_or_else(|| ParseError::UnknownDevice(module.to_string()))?;
    trace!("RC section {:?} -> device {}", module, device.device_id);
    device.configuration.push(section);
    Ok(())
}

// SCIC sections match on the suffix of the device ID.
fn attach_scic_section(
    devices: &mut [Device],
    section: Configuration,
    element: &XmlElement,
) -> Result<(), ParseError> {
    let repeater = element.require_text("RepeaterID1")?;
    let Some(device) = devices
        .iter_mut()
        .find(|device| !device.rc_device && device.device_id.ends_with(repeater))
    else {
        let name = element.child_text("Name").unwrap_or(repeater);
        return Err(ParseError::UnknownDevice(name.to_string()));
    };
    trace!("SCIC section {:?} -> device {}", repeater, device.device_id);
    device.configuration.push(section);
    Ok(())
}
