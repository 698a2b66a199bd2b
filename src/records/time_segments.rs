//! `MSTS.xml`: mass spectrometry time segments.

use std::ops::Deref;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{attribute, required};
use crate::schema;
use crate::xml::{
    enum_from_value_or_member, strtobool, to_duration_minutes, to_int, CoercionError, FromXml,
    IrmStatus, ParseError, ParseOptions, VersionedList, XmlElement, XmlFile,
};

/// A contiguous span of the acquisition with its own scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSegment {
    /// ID of the time segment
    pub timesegment_id: u32,
    /// Start of the segment, from the start of the run
    pub start_time: Duration,
    /// End of the segment, from the start of the run
    pub end_time: Duration,
    /// Number of scans in the segment
    pub n_scans: u32,
    /// Whether the segment uses a fixed cycle length
    pub fixed_cycle_length: bool,
}

impl FromXml for TimeSegment {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        Ok(Self {
            timesegment_id: attribute(element, "TimeSegmentID", to_int)?,
            start_time: required(element, "StartTime", |v| to_duration_minutes(v))?,
            end_time: required(element, "EndTime", |v| to_duration_minutes(v))?,
            n_scans: required(element, "NumOfScans", to_int)?,
            fixed_cycle_length: required(element, "FixedCycleLength", strtobool)?,
        })
    }
}

/// Time segments listed in `MSTS.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MSTimeSegments {
    #[serde(flatten)]
    segments: VersionedList<TimeSegment>,
    /// Raw `IRMStatus` code
    pub irm_status: i32,
}

impl MSTimeSegments {
    /// Create from existing time segments
    pub fn new(
        version: u32,
        irm_status: i32,
        segments: impl IntoIterator<Item = TimeSegment>,
    ) -> Self {
        Self {
            segments: VersionedList::with_items(version, segments),
            irm_status,
        }
    }

    /// `irm_status` as a flag set
    pub fn irm_status_flags(&self) -> Result<IrmStatus, CoercionError> {
        enum_from_value_or_member(self.irm_status.to_string().as_str())
    }
}

impl Deref for MSTimeSegments {
    type Target = VersionedList<TimeSegment>;

    fn deref(&self) -> &VersionedList<TimeSegment> {
        &self.segments
    }
}

impl FromXml for MSTimeSegments {
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError> {
        let mut segments = VersionedList::<TimeSegment>::from_xml_element(element)?;
        let irm_status = required(element, "IRMStatus", to_int)?;
        segments.append_from_element(element, "TimeSegment")?;
        Ok(Self {
            segments,
            irm_status,
        })
    }
}

impl XmlFile for MSTimeSegments {
    const FILE_NAME: &'static str = "MSTS.xml";
    const SCHEMA: Option<&'static str> = Some(schema::MSTS);
}

/// Read `MSTS.xml` from the given `AcqData` directory
pub fn read_msts_xml(dir: impl AsRef<Path>) -> Result<MSTimeSegments, ParseError> {
    MSTimeSegments::read_from_dir(dir, &ParseOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MSTS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MSTS xmlns="http://tempuri.org/MSTS.xsd">
  <Version>1</Version>
  <IRMStatus>1</IRMStatus>
  <TimeSegment TimeSegmentID="1">
    <StartTime>0.0520833333333333</StartTime>
    <EndTime>11.9943</EndTime>
    <NumOfScans>1065</NumOfScans>
    <FixedCycleLength>false</FixedCycleLength>
  </TimeSegment>
  <TimeSegment TimeSegmentID="2">
    <StartTime>11.9943</StartTime>
    <EndTime>13.6</EndTime>
    <NumOfScans>98</NumOfScans>
    <FixedCycleLength>True</FixedCycleLength>
  </TimeSegment>
</MSTS>"#;

    fn segments() -> MSTimeSegments {
        MSTimeSegments::from_xml(&XmlElement::parse_str(MSTS_XML).unwrap()).unwrap()
    }

    #[test]
    fn test_from_xml() {
        let segments = segments();
        assert_eq!(segments.version(), 1);
        assert_eq!(segments.irm_status, 1);
        assert_eq!(segments.len(), 2);

        let first = &segments[0];
        assert_eq!(first.timesegment_id, 1);
        assert_eq!(
            first.start_time,
            Duration::from_secs_f64(0.0520833333333333 * 60.0)
        );
        assert_eq!(first.end_time, Duration::from_secs_f64(11.9943 * 60.0));
        assert_eq!(first.n_scans, 1065);
        assert!(!first.fixed_cycle_length);
        assert!(segments[1].fixed_cycle_length);
    }

    #[test]
    fn test_irm_status_flags() {
        let segments = segments();
        assert_eq!(segments.irm_status_flags().unwrap(), IrmStatus::SOME_IONS_MISSED);
        assert!(MSTimeSegments::new(1, 9, Vec::new()).irm_status_flags().is_err());
        assert!(MSTimeSegments::new(1, -1, Vec::new()).irm_status_flags().is_err());
    }

    #[test]
    fn test_fixed_cycle_length_uses_words() {
        let xml = MSTS_XML.replace("<FixedCycleLength>True", "<FixedCycleLength>-1");
        let err = MSTimeSegments::from_xml(&XmlElement::parse_str(&xml).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidField { ref field, .. } if field == "FixedCycleLength"
        ));
    }

    #[test]
    fn test_missing_irm_status() {
        let xml = MSTS_XML.replace("<IRMStatus>1</IRMStatus>", "");
        let err = MSTimeSegments::from_xml(&XmlElement::parse_str(&xml).unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { ref name, .. } if name == "IRMStatus"));
    }

    #[test]
    fn test_json_round_trip() {
        let segments = segments();
        let restored = MSTimeSegments::from_json(&segments.to_json().unwrap()).unwrap();
        assert_eq!(restored, segments);
        assert_eq!(restored.version(), 1);
    }
}
