use std::path::PathBuf;

use crate::xml::ParseError;

/// Errors that can occur while extracting metadata from a run directory
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Path is not a directory containing `AcqData/Contents.xml`
    #[error("'{}' does not appear to be a valid .d datafile.", .0.display())]
    NotADatafile(PathBuf),

    /// One of the metadata files could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// I/O error preparing a path
    #[error("Failed to prepare {}: {source}", path.display())]
    Io {
        /// Path being prepared
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
