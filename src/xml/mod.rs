//! XML deserialization framework for run directory metadata files.
//!
//! Documents are read into an owned [`XmlElement`] tree, optionally checked
//! against a bundled schema, and then turned into typed records through the
//! [`FromXml`] trait. Raw text goes through the coercion functions in
//! [`coerce`], which are idempotent and never substitute defaults for
//! malformed values.
//!
//! ```no_run
//! use agilent_metadata::records::Contents;
//! use agilent_metadata::xml::XmlFile;
//!
//! let contents = Contents::from_xml_file("Sample.d/AcqData/Contents.xml")?;
//! println!("Acquired on {}", contents.acquired_time);
//! # Ok::<(), agilent_metadata::xml::ParseError>(())
//! ```

pub mod coerce;
mod element;
pub mod enums;
mod error;
mod file;
mod path;
mod versioned;

pub use coerce::{
    camel_to_snake, enum_from_value_or_member, parse_vendor_datetime, strtobool, tag_to_map,
    to_bool, to_duration_minutes, to_duration_seconds, to_float, to_int, to_windows_path,
    MemberOr, RawValue, ScalarValue, VendorEnum,
};
pub use element::XmlElement;
pub use enums::{
    AcqStatus, CalibrationFormula, CalibrationTechnique, DeviceType, DeviceVendor, IrmStatus,
    MeasurementType, SeparationTechnique, StoredDataType,
};
pub use error::{CoercionError, ParseError};
pub use file::{FromXml, ParseOptions, XmlFile};
pub use path::WindowsPath;
pub use versioned::VersionedList;
