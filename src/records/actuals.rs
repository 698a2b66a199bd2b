//! `MSActualDefs.xml`: definitions of periodically recorded instrument actuals.

use std::fmt;
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{attribute, required, text};
use crate::schema;
use crate::xml::{
    to_float, to_int, CoercionError, FromXml, ParseError, ParseOptions, ScalarValue,
    VersionedList, XmlElement, XmlFile,
};

/// Numeric type of the values recorded for an actual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActualDataType {
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float64,
    /// Unrecognised type code; values are kept as text
    Text,
}

impl ActualDataType {
    /// Type for an explicit `DataType` code: 4 is an integer, 6 a float
    pub fn from_code(code: i64) -> Self {
        match code {
            4 => ActualDataType::Int64,
            6 => ActualDataType::Float64,
            _ => ActualDataType::Text,
        }
    }

    /// Type implied by an actual's ID when no `DataType` code is given.
    ///
    /// IDs in `55..65` and above 345 are integers; all others are floats.
    pub fn infer(actual_id: u32) -> Self {
        if (55..65).contains(&actual_id) || actual_id > 345 {
            ActualDataType::Int64
        } else {
            ActualDataType::Float64
        }
    }

    /// Type for an explicit code if there is one, otherwise inferred from the ID
    pub fn resolve(actual_id: u32, code: Option<i64>) -> Self {
        code.map_or_else(|| Self::infer(actual_id), Self::from_code)
    }

    /// Convert a recorded value to this type
    pub fn convert(&self, value: &str) -> Result<ScalarValue, CoercionError> {
        match self {
            ActualDataType::Int64 => to_int(value).map(ScalarValue::Int),
            ActualDataType::Float64 => to_float(value).map(ScalarValue::Float),
            ActualDataType::Text => Ok(ScalarValue::Text(value.to_string())),
        }
    }
}

/// Definition of one periodic or scan actual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actual {
    /// ID of the actual
    pub actual_id: u32,
    /// Display name, e.g. `Min Range`
    pub display_name: String,
    /// Type of the recorded values
    pub data_type: ActualDataType,
    /// Display format code
    pub display_format: i32,
    /// Display effects code
    pub display_effects: i32,
    /// Number of digits to display
    pub display_digits: i32,
    /// Unit of the recorded values
    pub unit: String,
    /// Category of the actual
    pub category: String,
}

impl Actual {
    /// Short description such as `<Actual('Min Range', id=361)>`
    pub fn summary(&self) -> String {
        format!("<Actual('{}', id={})>", self.display_name, self.actual_id)
    }
}

impl fmt::Display for Actual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

impl FromXml for Actual {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let actual_id = attribute(element, "ActualID", to_int)?;

        // A blank DataType is treated as absent.
        let code = match element.child_text("DataType").map(str::trim) {
            Some(code) if !code.is_empty() => {
                Some(to_int(code).map_err(|e| ParseError::field("DataType", e))?)
            }
            _ => None,
        };

        Ok(Self {
            actual_id,
            display_name: required(element, "DisplayName", text)?,
            data_type: ActualDataType::resolve(actual_id, code),
            display_format: required(element, "DisplayFormat", to_int)?,
            display_effects: required(element, "DisplayEffects", to_int)?,
            display_digits: required(element, "DisplayDigits", to_int)?,
            unit: required(element, "Unit", text)?,
            category: required(element, "Category", text)?,
        })
    }
}

/// Actual definitions for all devices, parsed from `MSActualDefs.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualsDef {
    #[serde(flatten)]
    actuals: VersionedList<Actual>,
    /// `Type` attribute of the `Actuals` element
    #[serde(rename = "type")]
    pub actuals_type: i32,
}

impl ActualsDef {
    /// Create from existing actuals
    pub fn new(version: u32, actuals_type: i32, actuals: impl IntoIterator<Item = Actual>) -> Self {
        Self {
            actuals: VersionedList::with_items(version, actuals),
            actuals_type,
        }
    }

    /// Actual with the given ID
    pub fn get_actual(&self, actual_id: u32) -> Option<&Actual> {
        self.actuals.iter().find(|actual| actual.actual_id == actual_id)
    }
}

impl Deref for ActualsDef {
    type Target = VersionedList<Actual>;

    fn deref(&self) -> &VersionedList<Actual> {
        &self.actuals
    }
}

impl FromXml for ActualsDef {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let mut actuals = VersionedList::<Actual>::from_xml_element(element)?;
        let container = element.require_child("Actuals")?;
        let actuals_type = attribute(container, "Type", to_int)?;
        actuals.append_from_element(container, "Actual")?;
        Ok(Self {
            actuals,
            actuals_type,
        })
    }
}

impl XmlFile for ActualsDef {
    const FILE_NAME: &'static str = "MSActualDefs.xml";
    const SCHEMA: Option<&'static str> = Some(schema::MS_ACTUAL_DEFS);
}

/// Read `MSActualDefs.xml` from the given `AcqData` directory
pub fn read_ms_actual_defs(dir: impl AsRef<Path>) -> Result<ActualsDef, ParseError> {
    ActualsDef::read_from_dir(dir, &ParseOptions::default())
}
