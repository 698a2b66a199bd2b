use std::path::PathBuf;

use crate::schema::SchemaError;

/// Errors raised while coercing raw vendor text into typed values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    /// Text is not a recognised boolean literal
    #[error("Invalid truth value: {0:?}")]
    InvalidBool(String),

    /// Text is not a valid number
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    /// Value cannot be represented as a duration (negative, NaN or overflowing)
    #[error("Invalid duration: {0:?}")]
    InvalidDuration(String),

    /// Text is not an ISO 8601 timestamp with a UTC offset
    #[error("Invalid timestamp: {0:?}")]
    InvalidDateTime(String),

    /// The underlying value is valid but names no member of the enumeration
    #[error("{value:?} is not a valid {enum_name}")]
    UnknownMember {
        /// Name of the enumeration
        enum_name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Errors that can occur while parsing a metadata XML document into records
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// I/O error opening or reading an XML file
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 encoding error in text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Document has no root element
    #[error("XML document has no root element")]
    EmptyDocument,

    /// Document ended before an element was closed
    #[error("Unexpected end of document: <{0}> is not closed")]
    UnclosedElement(String),

    /// Element or text found outside the single root element
    #[error("Unexpected content outside the root element: {0}")]
    ContentOutsideRoot(String),

    /// Required child element is missing
    #[error("Missing required element <{name}> in <{parent}>")]
    MissingElement {
        /// Element that should contain the child
        parent: String,
        /// Name of the missing child
        name: String,
    },

    /// Required XML attribute is missing
    #[error("Missing required attribute {name:?} on <{element}>")]
    MissingAttribute {
        /// Element that should carry the attribute
        element: String,
        /// Name of the missing attribute
        name: String,
    },

    /// A field value could not be coerced to its declared type
    #[error("Invalid value for {field}: {source}")]
    InvalidField {
        /// Field (element or attribute) being coerced
        field: String,
        /// Coercion failure
        #[source]
        source: CoercionError,
    },

    /// Element not permitted at this position
    #[error("Unexpected element <{name}> in <{parent}>")]
    UnexpectedElement {
        /// Containing element
        parent: String,
        /// Name of the unexpected child
        name: String,
    },

    /// Two devices in one list share an identifier
    #[error("Duplicate device ID {0}")]
    DuplicateDevice(String),

    /// An embedded configuration section matched no known device
    #[error("Unknown Device {0}")]
    UnknownDevice(String),

    /// Document failed structural validation
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Error raised while parsing a specific file
    #[error("{}: {source}", path.display())]
    InFile {
        /// File being parsed
        path: PathBuf,
        /// Error raised while parsing it
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Wrap a coercion failure with the name of the field being coerced
    pub fn field(field: impl Into<String>, source: CoercionError) -> Self {
        ParseError::InvalidField {
            field: field.into(),
            source,
        }
    }

    /// Innermost error, skipping any file context wrappers
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::InFile { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Xml(quick_xml::Error::from(e))
    }
}
