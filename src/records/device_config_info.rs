//! `DeviceConfigInfo.xml`: configured devices and their parameters.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{required, text};
use crate::schema;
use crate::xml::{FromXml, ParseError, ParseOptions, XmlElement, XmlFile};

/// A device in `DeviceConfigInfo.xml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// ID of the device, e.g. `TCC_1`
    pub device_id: String,
    /// Display name of the device
    pub display_name: String,
}

impl FromXml for Device {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self {
            device_id: required(element, "DeviceID", text)?,
            display_name: required(element, "DisplayName", text)?,
        })
    }
}

/// A configuration parameter in `DeviceConfigInfo.xml`.
///
/// Values are kept as text; units vary from resource to resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// ID of the device this parameter configures
    pub device_id: String,
    /// Name of the resource
    pub resource_name: String,
    /// ID of the resource
    pub resource_id: String,
    /// Value of the parameter
    pub value: String,
    /// Units of the value
    pub units: String,
    /// Display name of the parameter
    pub display_name: String,
}

impl Parameter {
    /// Short description such as `<Parameter(Tag Max. Temp.)>`
    pub fn summary(&self) -> String {
        format!("<Parameter({})>", self.display_name)
    }
}

impl FromXml for Parameter {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self {
            device_id: required(element, "DeviceID", text)?,
            resource_name: required(element, "ResourceName", text)?,
            resource_id: required(element, "ResourceID", text)?,
            value: required(element, "Value", text)?,
            units: required(element, "Units", text)?,
            display_name: required(element, "DisplayName", text)?,
        })
    }
}

/// Device configuration parsed from `DeviceConfigInfo.xml`.
///
/// As with [`DeviceList`](super::DeviceList), device lookups are memoized in
/// a [`OnceCell`] and the type is not `Sync`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfigInfo {
    /// Configuration parameters, in document order
    pub parameters: Vec<Parameter>,
    devices: Vec<Device>,
    #[serde(skip)]
    index: OnceCell<HashMap<String, usize>>,
}

impl DeviceConfigInfo {
    /// Create from parameters and devices, rejecting duplicate device IDs
    pub fn new(parameters: Vec<Parameter>, devices: Vec<Device>) -> Result<Self, ParseError> {
        for (position, device) in devices.iter().enumerate() {
            if devices[..position]
                .iter()
                .any(|other| other.device_id == device.device_id)
            {
                return Err(ParseError::DuplicateDevice(device.device_id.clone()));
            }
        }
        Ok(Self {
            parameters,
            devices,
            index: OnceCell::new(),
        })
    }

    /// Devices, in document order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Device with the given ID.
    ///
    /// Repeated calls on the same instance return the same `&Device`.
    pub fn get_device(&self, device_id: &str) -> Option<&Device> {
        let index = self.index.get_or_init(|| {
            self.devices
                .iter()
                .enumerate()
                .map(|(position, device)| (device.device_id.clone(), position))
                .collect()
        });
        index.get(device_id).map(|&position| &self.devices[position])
    }

    /// Parameters configuring the given device, in document order
    pub fn parameters_for<'a>(&'a self, device_id: &'a str) -> impl Iterator<Item = &'a Parameter> {
        self.parameters
            .iter()
            .filter(move |parameter| parameter.device_id == device_id)
    }
}

impl PartialEq for DeviceConfigInfo {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters && self.devices == other.devices
    }
}

impl FromXml for DeviceConfigInfo {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let devices = element
            .children_named("Device")
            .map(Device::from_xml)
            .collect::<Result<Vec<_>, _>>()?;
        let parameters = element
            .children_named("Parameter")
            .map(Parameter::from_xml)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parameters, devices)
    }
}

impl XmlFile for DeviceConfigInfo {
    const FILE_NAME: &'static str = "DeviceConfigInfo.xml";
    const SCHEMA: Option<&'static str> = Some(schema::DEVICE_CONFIG_INFO);
}

/// Read `DeviceConfigInfo.xml` from the given `AcqData` directory
pub fn read_device_config_xml(dir: impl AsRef<Path>) -> Result<DeviceConfigInfo, ParseError> {
    DeviceConfigInfo::read_from_dir(dir, &ParseOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_CONFIG_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<DeviceConfigInfo>
  <Device>
    <DeviceID>TCC_1</DeviceID>
    <DisplayName>Column Comp.</DisplayName>
  </Device>
  <Device>
    <DeviceID>QTOF_1</DeviceID>
    <DisplayName>Q-TOF</DisplayName>
  </Device>
  <Parameter>
    <DeviceID>TCC_1</DeviceID>
    <ResourceName>MaxTemp</ResourceName>
    <ResourceID>TCC_MaxTemp</ResourceID>
    <Value>80.0</Value>
    <Units>°C</Units>
    <DisplayName>Tag Max. Temp.</DisplayName>
  </Parameter>
  <Parameter>
    <DeviceID>QTOF_1</DeviceID>
    <ResourceName>Ionization</ResourceName>
    <ResourceID>QTOF_Ionization</ResourceID>
    <Value>Dual AJS ESI</Value>
    <Units />
    <DisplayName>Ion Source</DisplayName>
  </Parameter>
  <Parameter>
    <DeviceID>TCC_1</DeviceID>
    <ResourceName>Valve</ResourceName>
    <ResourceID>TCC_Valve</ResourceID>
    <Value></Value>
    <Units></Units>
    <DisplayName>Valve Installed</DisplayName>
  </Parameter>
</DeviceConfigInfo>"#;

    fn config() -> DeviceConfigInfo {
        DeviceConfigInfo::from_xml(&XmlElement::parse_str(DEVICE_CONFIG_XML).unwrap()).unwrap()
    }

    #[test]
    fn test_from_xml() {
        let config = config();
        assert_eq!(config.devices().len(), 2);
        assert_eq!(config.parameters.len(), 3);

        let tcc = &config.devices()[0];
        assert_eq!(tcc.device_id, "TCC_1");
        assert_eq!(tcc.display_name, "Column Comp.");

        let max_temp = &config.parameters[0];
        assert_eq!(max_temp.value, "80.0");
        assert_eq!(max_temp.units, "°C");
        assert_eq!(max_temp.summary(), "<Parameter(Tag Max. Temp.)>");

        let source = &config.parameters[1];
        assert_eq!(source.units, "");
        assert_eq!(config.parameters[2].value, "");
    }

    #[test]
    fn test_lookups() {
        let config = config();
        let first = config.get_device("QTOF_1").unwrap();
        assert!(std::ptr::eq(first, config.get_device("QTOF_1").unwrap()));
        assert!(config.get_device("ALS_1").is_none());

        let names: Vec<&str> = config
            .parameters_for("TCC_1")
            .map(|p| p.resource_name.as_str())
            .collect();
        assert_eq!(names, vec!["MaxTemp", "Valve"]);
    }

    #[test]
    fn test_missing_required_child() {
        let xml = DEVICE_CONFIG_XML.replace("<ResourceName>Valve</ResourceName>", "");
        let err = DeviceConfigInfo::from_xml(&XmlElement::parse_str(&xml).unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { ref name, .. } if name == "ResourceName"));
    }

    #[test]
    fn test_missing_value_or_units() {
        let xml = DEVICE_CONFIG_XML.replace("<Value>80.0</Value>", "");
        let err = DeviceConfigInfo::from_xml(&XmlElement::parse_str(&xml).unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { ref name, .. } if name == "Value"));

        let xml = DEVICE_CONFIG_XML.replace("<Units>°C</Units>", "");
        let err = DeviceConfigInfo::from_xml(&XmlElement::parse_str(&xml).unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { ref name, .. } if name == "Units"));
    }

    #[test]
    fn test_duplicate_device() {
        let xml = DEVICE_CONFIG_XML.replace(
            "<DeviceID>QTOF_1</DeviceID>\n    <DisplayName>Q-TOF",
            "<DeviceID>TCC_1</DeviceID>\n    <DisplayName>Q-TOF",
        );
        let err = DeviceConfigInfo::from_xml(&XmlElement::parse_str(&xml).unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDevice(ref id) if id == "TCC_1"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = config();
        let restored = DeviceConfigInfo::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
        assert!(restored.get_device("TCC_1").is_some());
    }
}
