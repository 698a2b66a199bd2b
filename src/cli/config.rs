//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can be kept
//! in a config file:
//!
//! ```toml
//! # agilent-metadata.toml
//! [extraction]
//! validate_schema = false
//!
//! [output]
//! pretty = true
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use agilent_metadata::xml::ParseOptions;

/// Root configuration structure for agilent-metadata.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for reading metadata files.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionConfig {
    /// Validate files against their bundled schemas.
    pub validate_schema: Option<bool>,
}

/// Configuration for JSON output.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Indent the JSON output.
    pub pretty: Option<bool>,
}

/// Settings after merging the config file with command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub options: ParseOptions,
    pub pretty: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply command-line flags on top of the file settings.
    ///
    /// A flag that was given wins over the file in either direction; unset
    /// flags fall back to the file, then to validating and compact output.
    pub fn merge_flags(&self, validate: Option<bool>, pretty: Option<bool>) -> Settings {
        Settings {
            options: ParseOptions {
                validate_schema: validate
                    .or(self.extraction.validate_schema)
                    .unwrap_or(true),
            },
            pretty: pretty.or(self.output.pretty).unwrap_or(false),
        }
    }
}
