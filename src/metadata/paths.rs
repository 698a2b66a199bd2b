use std::path::{Path, PathBuf};

use super::MetadataError;
use crate::records::Contents;
use crate::xml::XmlFile;

/// Name of the folder holding the metadata files inside a run directory
pub const ACQ_DATA: &str = "AcqData";

/// Whether `path` is a run directory, i.e. a directory containing
/// `AcqData/Contents.xml`.
///
/// Returns `false` rather than an error for paths that do not exist.
pub fn is_datafile(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    path.is_dir() && path.join(ACQ_DATA).join(Contents::FILE_NAME).exists()
}

/// The `AcqData` folder of a run directory
pub fn acq_data_dir(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().join(ACQ_DATA)
}

/// Make `path` absolute against the working directory, creating its parent
/// directory when `mkdirs` is set and the parent does not exist yet.
///
/// The path is not canonicalized; symlinks and `..` components are kept.
pub fn prepare_filepath(path: impl AsRef<Path>, mkdirs: bool) -> Result<PathBuf, MetadataError> {
    let path = path.as_ref();
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| MetadataError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .join(path)
    };
    if mkdirs {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                std::fs::create_dir_all(parent).map_err(|source| MetadataError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
    }
    Ok(path)
}
