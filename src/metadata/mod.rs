//! # Metadata aggregation
//!
//! Composes the eight record parsers into one snapshot of a run directory.
//! A run directory (`<name>.d`) is recognised by the presence of
//! `AcqData/Contents.xml`; every other file is read from the same `AcqData`
//! folder.
//!
//! ```no_run
//! use agilent_metadata::metadata::extract_metadata;
//!
//! let metadata = extract_metadata("Sample_Run.d")?;
//! println!("{}", metadata.contents.instrument_name);
//! for device in metadata.devices.iter() {
//!     println!("{} ({})", device.display_name, device.device_id);
//! }
//! # Ok::<(), agilent_metadata::metadata::MetadataError>(())
//! ```
//!
//! Extraction is a pure composition step: the first parser failure is
//! returned unchanged and no partial result is produced.

mod error;
mod paths;
mod report;

#[cfg(test)]
mod tests;

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::records::{
    AcqMethod, ActualsDef, CalibrationList, Contents, DeviceConfigInfo, DeviceList,
    MSTimeSegments, SampleInfo,
};
use crate::xml::{ParseOptions, XmlFile};

pub use error::MetadataError;
pub use paths::{acq_data_dir, is_datafile, prepare_filepath, ACQ_DATA};
pub use report::{check_datafile, CheckReport, CheckStatus, FileCheck};

/// All metadata extracted from a run directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDict {
    /// The method used to acquire the data, from `AcqMethod.xml`
    pub method: AcqMethod,
    /// Contents of the run, from `Contents.xml`
    pub contents: Contents,
    /// Mass calibrations, from `DefaultMassCal.xml`
    pub default_mass_cal: CalibrationList,
    /// Device configuration, from `DeviceConfigInfo.xml`
    pub device_config_info: DeviceConfigInfo,
    /// Device inventory, from `Devices.xml`
    pub devices: DeviceList,
    /// Actual definitions for all devices, from `MSActualDefs.xml`
    pub ms_actual_defs: ActualsDef,
    /// Time segments, from `MSTS.xml`
    pub ms_time_segments: MSTimeSegments,
    /// Sample information, from `sample_info.xml`
    pub sample_info: SampleInfo,
}

impl MetadataDict {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Extract metadata from a run directory, validating every file against its
/// bundled schema
pub fn extract_metadata(path: impl AsRef<Path>) -> Result<MetadataDict, MetadataError> {
    extract_metadata_with(path, &ParseOptions::default())
}

/// Extract metadata from a run directory with explicit parse options.
///
/// `path` is made absolute first (see [`prepare_filepath`]); no directories
/// are created. Fails with [`MetadataError::NotADatafile`] naming the
/// absolute path when it is not a run directory; otherwise any parser error
/// is returned as-is.
pub fn extract_metadata_with(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<MetadataDict, MetadataError> {
    let path = prepare_filepath(path, false)?;
    let path = path.as_path();
    if !is_datafile(path) {
        return Err(MetadataError::NotADatafile(path.to_path_buf()));
    }

    let dir = acq_data_dir(path);
    let metadata = MetadataDict {
        method: AcqMethod::read_from_dir(&dir, options)?,
        contents: Contents::read_from_dir(&dir, options)?,
        default_mass_cal: CalibrationList::read_from_dir(&dir, options)?,
        device_config_info: DeviceConfigInfo::read_from_dir(&dir, options)?,
        devices: DeviceList::read_from_dir(&dir, options)?,
        ms_actual_defs: ActualsDef::read_from_dir(&dir, options)?,
        ms_time_segments: MSTimeSegments::read_from_dir(&dir, options)?,
        sample_info: SampleInfo::read_from_dir(&dir, options)?,
    };

    info!(
        "Extracted metadata from {} ({} devices, {} time segments)",
        path.display(),
        metadata.devices.len(),
        metadata.ms_time_segments.len()
    );
    Ok(metadata)
}
