//! `DefaultMassCal.xml`: default mass calibration.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{attribute, required};
use crate::schema;
use crate::xml::{
    enum_from_value_or_member, to_float, to_int, CalibrationFormula, CalibrationTechnique,
    FromXml, ParseError, ParseOptions, VersionedList, XmlElement, XmlFile,
};

/// A step in a mass calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepType {
    /// Step number
    pub number: u32,
    /// Calibration reference technique
    pub calibration_technique: CalibrationTechnique,
    /// Calibration formula
    pub calibration_formula: CalibrationFormula,
    /// Number of coefficients in the formula
    pub number_of_coefficients: u32,
    /// Flags marking which coefficients are in use
    pub value_use_flags: i32,
    /// Coefficient values keyed by their `Number` in the file.
    ///
    /// The numbers are identifiers rather than positions and need not be
    /// contiguous.
    pub values: BTreeMap<u32, f64>,
}

impl FromXml for StepType {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let mut values = BTreeMap::new();
        if let Some(values_element) = element.child("Values") {
            for value in values_element.children_named("Value") {
                let number = attribute(value, "Number", to_int)?;
                let coefficient =
                    to_float(value.text()).map_err(|e| ParseError::field("Value", e))?;
                values.insert(number, coefficient);
            }
        }

        Ok(Self {
            number: attribute(element, "Number", to_int)?,
            calibration_technique: required(element, "CalibrationTechnique", |v| {
                enum_from_value_or_member(v)
            })?,
            calibration_formula: required(element, "CalibrationFormula", |v| {
                enum_from_value_or_member(v)
            })?,
            number_of_coefficients: required(element, "NumberOfCoefficients", to_int)?,
            value_use_flags: required(element, "ValueUseFlags", to_int)?,
            values,
        })
    }
}

/// A mass calibration: an ordered sequence of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// ID of the calibration
    pub calibration_id: u32,
    /// Steps, in document order
    pub steps: Vec<StepType>,
}

impl Deref for Calibration {
    type Target = [StepType];

    fn deref(&self) -> &[StepType] {
        &self.steps
    }
}

impl FromXml for Calibration {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self {
            calibration_id: attribute(element, "DefaultCalibrationID", to_int)?,
            steps: element
                .children_named("Step")
                .map(StepType::from_xml)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Mass calibrations listed in `DefaultMassCal.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationList(VersionedList<Calibration>);

impl CalibrationList {
    /// Create from existing calibrations
    pub fn new(version: u32, calibrations: impl IntoIterator<Item = Calibration>) -> Self {
        Self(VersionedList::with_items(version, calibrations))
    }
}

impl Deref for CalibrationList {
    type Target = VersionedList<Calibration>;

    fn deref(&self) -> &VersionedList<Calibration> {
        &self.0
    }
}

impl FromXml for CalibrationList {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let mut calibrations = VersionedList::<Calibration>::from_xml_element(element)?;
        let container = element.require_child("DefaultCalibrations")?;
        calibrations.append_from_element(container, "DefaultCalibration")?;
        Ok(Self(calibrations))
    }
}

impl XmlFile for CalibrationList {
    const FILE_NAME: &'static str = "DefaultMassCal.xml";
    const SCHEMA: Option<&'static str> = Some(schema::DEFAULT_MASS_CAL);
}

/// Read `DefaultMassCal.xml` from the given `AcqData` directory
pub fn read_mass_cal_xml(dir: impl AsRef<Path>) -> Result<CalibrationList, ParseError> {
    CalibrationList::read_from_dir(dir, &ParseOptions::default())
}
