//! `sample_info.xml`: information about the sample.

use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{optional, text};
use crate::schema;
use crate::xml::{
    to_bool, to_int, FromXml, ParseError, ParseOptions, ScalarValue, VersionedList, XmlElement,
    XmlFile,
};

/// A field of sample information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Name of the field
    pub name: String,
    /// Display name of the field
    pub display_name: String,
    /// Value of the field, typed from its text
    pub value: ScalarValue,
    /// Vendor data type code
    pub data_type: i32,
    /// Units of the value
    pub units: String,
    /// Kind of field, e.g. `SYSTEM`
    pub field_type: String,
    /// Whether the value was overridden
    pub overridden: bool,
}

impl FromXml for Field {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self {
            name: optional(element, "Name", text)?.unwrap_or_default(),
            display_name: optional(element, "DisplayName", text)?.unwrap_or_default(),
            value: element
                .child_text("Value")
                .map(ScalarValue::from_text)
                .unwrap_or_default(),
            data_type: optional(element, "DataType", to_int)?.unwrap_or_default(),
            units: optional(element, "Units", text)?.unwrap_or_default(),
            field_type: optional(element, "FieldType", text)?.unwrap_or_default(),
            overridden: optional(element, "Overridden", |v| to_bool(v))?.unwrap_or_default(),
        })
    }
}

/// Sample information fields listed in `sample_info.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleInfo(VersionedList<Field>);

impl SampleInfo {
    /// Create from existing fields
    pub fn new(version: u32, fields: impl IntoIterator<Item = Field>) -> Self {
        Self(VersionedList::with_items(version, fields))
    }

    /// First field with the given name
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|field| field.name == name)
    }
}

impl Deref for SampleInfo {
    type Target = VersionedList<Field>;

    fn deref(&self) -> &VersionedList<Field> {
        &self.0
    }
}

impl FromXml for SampleInfo {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let mut fields = VersionedList::<Field>::from_xml_element(element)?;
        fields.append_from_element(element, "Field")?;
        Ok(Self(fields))
    }
}

impl XmlFile for SampleInfo {
    const FILE_NAME: &'static str = "sample_info.xml";
    const SCHEMA: Option<&'static str> = Some(schema::SAMPLE_INFO);
}

/// Read `sample_info.xml` from the given `AcqData` directory
pub fn read_sample_info_xml(dir: impl AsRef<Path>) -> Result<SampleInfo, ParseError> {
    SampleInfo::read_from_dir(dir, &ParseOptions::default())
}
