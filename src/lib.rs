//! # agilent-metadata - Acquisition Metadata from MassHunter Run Directories
//!
//! `agilent_metadata` reads the static metadata stored alongside an Agilent
//! MassHunter acquisition. A run is a directory (`<name>.d`) whose `AcqData`
//! folder holds a set of small, independently versioned XML files describing
//! the instrument, the method and the sample. This crate parses each of them
//! into typed records and composes them into one [`MetadataDict`].
//!
//! ## Key Features
//!
//! - **Typed records**: Vendor codes become enums and flag sets, durations
//!   become [`std::time::Duration`], timestamps keep their UTC offset.
//!
//! - **Strict by default**: Every file is checked against a bundled structural
//!   schema before any record is built, and malformed values are errors rather
//!   than defaults.
//!
//! - **Cross-referenced devices**: Configuration sections embedded in the
//!   method report are attached to the device they configure.
//!
//! - **JSON output**: Every record serializes with `serde`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agilent_metadata::prelude::*;
//!
//! let metadata = extract_metadata("Sample_Run.d")?;
//!
//! println!("Acquired {} on {}", metadata.contents.acquired_time,
//!     metadata.contents.instrument_name);
//! for device in metadata.method.devices.iter() {
//!     println!("{}: {} configuration section(s)", device.display_name,
//!         device.configuration.len());
//! }
//! # Ok::<(), agilent_metadata::metadata::MetadataError>(())
//! ```
//!
//! Individual files can also be read on their own:
//!
//! ```rust,no_run
//! use agilent_metadata::records::read_msts_xml;
//!
//! let segments = read_msts_xml("Sample_Run.d/AcqData")?;
//! for segment in segments.iter() {
//!     println!("{}: {} scans", segment.timesegment_id, segment.n_scans);
//! }
//! # Ok::<(), agilent_metadata::xml::ParseError>(())
//! ```
//!
//! ## Run Directory Layout
//!
//! ```text
//! Sample_Run.d/
//! └── AcqData/
//!     ├── Contents.xml          # Required; marks the directory as a run
//!     ├── Devices.xml
//!     ├── DeviceConfigInfo.xml
//!     ├── DefaultMassCal.xml
//!     ├── MSActualDefs.xml
//!     ├── MSTS.xml
//!     ├── sample_info.xml
//!     └── AcqMethod.xml
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`xml`]: XML tree, type coercion, vendor enums and the versioned container
//! - [`schema`]: Bundled structural schemas and the schema registry
//! - [`records`]: One parser per metadata file
//! - [`metadata`]: Run directory detection and metadata aggregation

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod metadata;
pub mod records;
pub mod schema;
pub mod xml;

pub use metadata::{extract_metadata, MetadataDict};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::metadata::{
        check_datafile, extract_metadata, extract_metadata_with, is_datafile, prepare_filepath,
        CheckReport, MetadataDict, MetadataError,
    };
    pub use crate::records::{
        AcqMethod, Actual, ActualDataType, ActualsDef, Calibration, CalibrationList, Contents,
        DeviceConfigInfo, DeviceList, Field, MSTimeSegments, Parameter, SampleInfo, StepType,
        TimeSegment,
    };
    pub use crate::xml::{
        FromXml, ParseError, ParseOptions, ScalarValue, VersionedList, WindowsPath, XmlElement,
        XmlFile,
    };
}
