//! # Record parsers
//!
//! One module per metadata file found in a run directory's `AcqData` folder.
//! Every top-level record implements [`XmlFile`](crate::xml::XmlFile), so it
//! can be built from an already-parsed element with `from_xml` or read from
//! disk with `from_xml_file`.
//!
//! | File | Record |
//! |------|--------|
//! | `Contents.xml` | [`Contents`] |
//! | `Devices.xml` | [`DeviceList`] of [`Device`] |
//! | `DeviceConfigInfo.xml` | [`DeviceConfigInfo`] |
//! | `DefaultMassCal.xml` | [`CalibrationList`] of [`Calibration`] |
//! | `MSActualDefs.xml` | [`ActualsDef`] of [`Actual`] |
//! | `MSTS.xml` | [`MSTimeSegments`] of [`TimeSegment`] |
//! | `sample_info.xml` | [`SampleInfo`] of [`Field`] |
//! | `AcqMethod.xml` | [`AcqMethod`] |

pub mod acq_method;
pub mod actuals;
pub mod contents;
pub mod device_config_info;
pub mod devices;
pub mod mass_cal;
pub mod sample_info;
pub mod time_segments;

pub use acq_method::{read_acq_method, AcqMethod};
pub use actuals::{read_ms_actual_defs, Actual, ActualDataType, ActualsDef};
pub use contents::{read_contents_xml, Contents};
pub use device_config_info::{read_device_config_xml, DeviceConfigInfo, Parameter};
pub use devices::{read_devices_xml, Device, DeviceList};
pub use mass_cal::{read_mass_cal_xml, Calibration, CalibrationList, StepType};
pub use sample_info::{read_sample_info_xml, Field, SampleInfo};
pub use time_segments::{read_msts_xml, MSTimeSegments, TimeSegment};

use crate::xml::{CoercionError, ParseError, XmlElement};

/// Coerce the text of a mandatory child element
pub(crate) fn required<T>(
    element: &XmlElement,
    name: &str,
    coerce: impl FnOnce(&str) -> Result<T, CoercionError>,
) -> Result<T, ParseError> {
    coerce(element.require_text(name)?).map_err(|e| ParseError::field(name, e))
}

/// Coerce the text of an optional child element
pub(crate) fn optional<T>(
    element: &XmlElement,
    name: &str,
    coerce: impl FnOnce(&str) -> Result<T, CoercionError>,
) -> Result<Option<T>, ParseError> {
    element
        .child_text(name)
        .map(coerce)
        .transpose()
        .map_err(|e| ParseError::field(name, e))
}

/// Coerce a mandatory attribute
pub(crate) fn attribute<T>(
    element: &XmlElement,
    name: &str,
    coerce: impl FnOnce(&str) -> Result<T, CoercionError>,
) -> Result<T, ParseError> {
    coerce(element.require_attribute(name)?).map_err(|e| ParseError::field(name, e))
}

/// Text of a child element kept as-is
pub(crate) fn text(value: &str) -> Result<String, CoercionError> {
    Ok(value.to_string())
}

/// Fail on any child not in `known`
pub(crate) fn reject_unknown_children(
    element: &XmlElement,
    known: &[&str],
) -> Result<(), ParseError> {
    match element
        .children()
        .iter()
        .find(|child| !known.contains(&child.name()))
    {
        Some(child) => Err(ParseError::UnexpectedElement {
            parent: element.name().to_string(),
            name: child.name().to_string(),
        }),
        None => Ok(()),
    }
}

macro_rules! impl_json {
    ($($record:ty),+ $(,)?) => {
        $(
            impl $record {
                /// Serialize to JSON
                pub fn to_json(&self) -> Result<String, serde_json::Error> {
                    serde_json::to_string(self)
                }

                /// Deserialize from JSON
                pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
                    serde_json::from_str(json)
                }
            }
        )+
    };
}

impl_json!(
    Contents,
    DeviceList,
    DeviceConfigInfo,
    CalibrationList,
    ActualsDef,
    MSTimeSegments,
    SampleInfo,
    AcqMethod,
);
