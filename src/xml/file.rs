use std::path::Path;

use log::debug;

use super::{ParseError, XmlElement};
use crate::schema;

/// Options controlling how metadata files are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Validate each document against its bundled schema before building records
    pub validate_schema: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate_schema: true,
        }
    }
}

impl ParseOptions {
    /// Options with schema validation disabled
    pub fn without_validation() -> Self {
        Self {
            validate_schema: false,
        }
    }
}

/// A record that can be built from an already-parsed XML element
pub trait FromXml: Sized {
    /// Build the record from `element`
    fn from_xml(element: &XmlElement) -> Result<Self, ParseError>;
}

/// A record read from one of the files in a run directory's `AcqData` folder
pub trait XmlFile: FromXml {
    /// Name of the file within `AcqData`
    const FILE_NAME: &'static str;

    /// Name of the bundled schema document for this file, if there is one
    const SCHEMA: Option<&'static str> = None;

    /// Read, validate and parse the file at `path` with default options
    fn from_xml_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        Self::from_xml_file_with(path, &ParseOptions::default())
    }

    /// Read, optionally validate, and parse the file at `path`.
    ///
    /// Errors are wrapped in [`ParseError::InFile`] naming `path`.
    fn from_xml_file_with(
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Self, ParseError> {
        let path = path.as_ref();
        read_and_build(path, Self::SCHEMA, options).map_err(|e| ParseError::InFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Parse `FILE_NAME` in the given `AcqData` directory
    fn read_from_dir(dir: impl AsRef<Path>, options: &ParseOptions) -> Result<Self, ParseError> {
        Self::from_xml_file_with(dir.as_ref().join(Self::FILE_NAME), options)
    }
}

fn read_and_build<T: FromXml>(
    path: &Path,
    schema_name: Option<&str>,
    options: &ParseOptions,
) -> Result<T, ParseError> {
    debug!("Parsing {}", path.display());
    let element = XmlElement::parse_file(path)?;

    if let (true, Some(name)) = (options.validate_schema, schema_name) {
        debug!("Validating {} against schema {}", path.display(), name);
        schema::init()?.validate(name, &element)?;
    }

    T::from_xml(&element)
}
