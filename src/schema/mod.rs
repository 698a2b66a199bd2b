//! # Bundled structural schemas
//!
//! Each metadata file in a run directory has a schema document describing its
//! expected element structure: which children an element may contain, how
//! often, and the value type of each leaf. The documents are TOML files
//! compiled into the crate and parsed once, the first time [`init`] is called.
//!
//! ## Document format
//!
//! ```toml
//! root = "MSTS"
//!
//! [elements.MSTS]
//! open = true
//! children = [
//!     { name = "Version", type = "int" },
//!     { name = "TimeSegment", type = "element", min = 0, unbounded = true },
//! ]
//!
//! [elements.TimeSegment]
//! attributes = [{ name = "TimeSegmentID", type = "int" }]
//! children = [{ name = "StartTime", type = "float" }]
//! ```
//!
//! Children default to `type = "string"` with exactly one occurrence.
//! Elements reject undeclared children unless marked `open`.

mod document;
mod error;
mod validation;


use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;

use crate::xml::XmlElement;

pub use document::{AttributeRule, ChildRule, ElementRule, SchemaDocument, ValueType};
pub use error::SchemaError;

/// Schema for `Contents.xml`
pub const CONTENTS: &str = "Contents";
/// Schema for `Devices.xml`
pub const DEVICES: &str = "Devices";
/// Schema for `DeviceConfigInfo.xml`
pub const DEVICE_CONFIG_INFO: &str = "DeviceConfigInfo";
/// Schema for `DefaultMassCal.xml`
pub const DEFAULT_MASS_CAL: &str = "DefaultMassCal";
/// Schema for `MSActualDefs.xml`
pub const MS_ACTUAL_DEFS: &str = "MSActualDefs";
/// Schema for `MSTS.xml`
pub const MSTS: &str = "MSTS";
/// Schema for `sample_info.xml`
pub const SAMPLE_INFO: &str = "sample_info";
/// Schema for `AcqMethod.xml`
pub const ACQ_METHOD: &str = "AcqMethod";

const BUNDLED: &[(&str, &str)] = &[
    (CONTENTS, include_str!("documents/contents.toml")),
    (DEVICES, include_str!("documents/devices.toml")),
    (DEVICE_CONFIG_INFO, include_str!("documents/device_config_info.toml")),
    (DEFAULT_MASS_CAL, include_str!("documents/default_mass_cal.toml")),
    (MS_ACTUAL_DEFS, include_str!("documents/ms_actual_defs.toml")),
    (MSTS, include_str!("documents/msts.toml")),
    (SAMPLE_INFO, include_str!("documents/sample_info.toml")),
    (ACQ_METHOD, include_str!("documents/acq_method.toml")),
];

static REGISTRY: OnceLock<Result<SchemaRegistry, SchemaError>> = OnceLock::new();

/// Load the bundled schemas, once per process, and return the registry
pub fn init() -> Result<&'static SchemaRegistry, SchemaError> {
    REGISTRY
        .get_or_init(|| {
            debug!("Loading {} bundled schema documents", BUNDLED.len());
            SchemaRegistry::from_documents(BUNDLED.iter().copied())
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Named collection of schema documents
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    documents: HashMap<String, SchemaDocument>,
}

impl SchemaRegistry {
    /// Parse a set of `(name, toml)` documents
    pub fn from_documents<'a>(
        documents: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, SchemaError> {
        let documents = documents
            .into_iter()
            .map(|(name, source)| Ok((name.to_string(), SchemaDocument::from_toml(name, source)?)))
            .collect::<Result<HashMap<_, _>, SchemaError>>()?;
        Ok(Self { documents })
    }

    /// Schema document registered under `name`
    pub fn get(&self, name: &str) -> Option<&SchemaDocument> {
        self.documents.get(name)
    }

    /// Names of all registered documents
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Validate `root` against the schema registered under `name`
    pub fn validate(&self, name: &str, root: &XmlElement) -> Result<(), SchemaError> {
        let document = self
            .get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))?;
        validation::validate_document(document, root)
    }
}
