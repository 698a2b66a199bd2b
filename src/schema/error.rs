/// Errors raised by the schema registry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A bundled schema document could not be parsed
    #[error("Failed to load schema {name}: {message}")]
    Load {
        /// Name of the schema document
        name: String,
        /// Parser error message
        message: String,
    },

    /// A schema document is internally inconsistent
    #[error("Invalid schema {name}: {message}")]
    Invalid {
        /// Name of the schema document
        name: String,
        /// Description of the problem
        message: String,
    },

    /// No schema is registered under this name
    #[error("No schema named {0}")]
    UnknownSchema(String),

    /// A document does not conform to its schema
    #[error("Schema validation failed at {path}: {message}")]
    Violation {
        /// Element path such as `/Devices/Device[2]/Type`
        path: String,
        /// Description of the violation
        message: String,
    },
}

impl SchemaError {
    pub(crate) fn violation(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Violation {
            path: path.into(),
            message: message.into(),
        }
    }
}
