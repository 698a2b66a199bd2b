//! `Contents.xml`: the summary of a run.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{required, text};
use crate::schema;
use crate::xml::{
    enum_from_value_or_member, parse_vendor_datetime, to_bool, to_duration_seconds, to_int,
    AcqStatus, FromXml, MeasurementType, ParseError, ParseOptions, SeparationTechnique,
    XmlElement, XmlFile,
};

/// Contents of a `.d` datafile, parsed from `Contents.xml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contents {
    /// Version of the contents file
    pub version: u32,
    /// When the data was acquired, with the instrument's UTC offset
    pub acquired_time: DateTime<FixedOffset>,
    /// Acquisition status
    pub acq_status: AcqStatus,
    /// Name of the instrument
    pub instrument_name: String,
    /// Whether the instrument was in locked mode
    pub locked_mode: bool,
    /// How the sample was introduced
    pub measurement_type: MeasurementType,
    /// Separation technique used
    pub separation_technique: SeparationTechnique,
    /// Total acquisition time
    pub total_run_duration: Duration,
    /// Version of the acquisition software
    pub acq_software_version: String,
}

impl FromXml for Contents {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self {
            version: required(element, "Version", to_int)?,
            acquired_time: required(element, "AcquiredTime", parse_vendor_datetime)?,
            acq_status: required(element, "AcqStatus", |v| enum_from_value_or_member(v))?,
            instrument_name: required(element, "InstrumentName", text)?,
            locked_mode: required(element, "LockedMode", |v| to_bool(v))?,
            measurement_type: required(element, "MeasurementType", |v| {
                enum_from_value_or_member(v)
            })?,
            separation_technique: required(
                element,
                "SeparationTechnique",
                |v| enum_from_value_or_member(v),
            )?,
            total_run_duration: required(element, "TotalRunDuration", |v| {
                to_duration_seconds(v)
            })?,
            acq_software_version: required(element, "AcqSoftwareVersion", text)?,
        })
    }
}

impl XmlFile for Contents {
    const FILE_NAME: &'static str = "Contents.xml";
    const SCHEMA: Option<&'static str> = Some(schema::CONTENTS);
}

/// Read `Contents.xml` from the given `AcqData` directory
pub fn read_contents_xml(dir: impl AsRef<Path>) -> Result<Contents, ParseError> {
    Contents::read_from_dir(dir, &ParseOptions::default())
}
