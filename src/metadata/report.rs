use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "colorized_output")]
use console::style;
use log::debug;

use super::{acq_data_dir, is_datafile, MetadataError};
use crate::records::{
    AcqMethod, ActualsDef, CalibrationList, Contents, DeviceConfigInfo, DeviceList,
    MSTimeSegments, SampleInfo,
};
use crate::xml::{ParseOptions, XmlFile};

/// Outcome of parsing one metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// File parsed
    Ok,
    /// File is not present
    Missing,
    /// File failed to parse or validate
    Failed(String),
}

/// Result of parsing one metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    /// Name of the file within `AcqData`
    pub file_name: &'static str,
    /// Outcome
    pub status: CheckStatus,
}

impl FileCheck {
    fn run<T: XmlFile>(dir: &Path, options: &ParseOptions) -> Self {
        let path = dir.join(T::FILE_NAME);
        let status = if !path.exists() {
            CheckStatus::Missing
        } else {
            match T::from_xml_file_with(&path, options) {
                Ok(_) => CheckStatus::Ok,
                Err(e) => CheckStatus::Failed(e.root_cause().to_string()),
            }
        };
        debug!("{}: {:?}", T::FILE_NAME, status);
        Self {
            file_name: T::FILE_NAME,
            status,
        }
    }
}

/// Report on every metadata file of a run directory
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Run directory that was checked
    pub run_path: PathBuf,
    /// One entry per metadata file, in extraction order
    pub checks: Vec<FileCheck>,
}

impl CheckReport {
    /// Check if any file failed
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c.status, CheckStatus::Failed(_)))
    }

    /// Count the files that parsed
    pub fn success_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Ok)
            .count()
    }

    /// Count the files that are not present
    pub fn missing_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Missing)
            .count()
    }

    /// Count the files that failed
    pub fn failure_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c.status, CheckStatus::Failed(_)))
            .count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static MISSING: Emoji<'_, '_> = Emoji("⚠", "[MISSING]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Run Directory Check").bold().cyan()));
            output.push_str(&format!("{}\n", style("===================").cyan()));
            output.push_str(&format!(
                "{}: {}\n\n",
                style("Run").bold(),
                self.run_path.display()
            ));

            for check in &self.checks {
                match &check.status {
                    CheckStatus::Ok => {
                        output.push_str(&format!("[{}] {}\n", OK, style(check.file_name).green()));
                    }
                    CheckStatus::Missing => {
                        output.push_str(&format!(
                            "[{}] {} - {}\n",
                            MISSING,
                            style(check.file_name).yellow(),
                            style("not present").yellow()
                        ));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(
                            "[{}] {} - {}: {}\n",
                            FAIL,
                            style(check.file_name).red(),
                            style("FAILED").red().bold(),
                            msg
                        ));
                    }
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} parsed, {} missing, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.missing_count()).yellow(),
                style(self.failure_count()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Directory Check")?;
        writeln!(f, "===================")?;
        writeln!(f, "Run: {}", self.run_path.display())?;
        writeln!(f)?;

        for check in &self.checks {
            match &check.status {
                CheckStatus::Ok => writeln!(f, "[✓] {}", check.file_name)?,
                CheckStatus::Missing => writeln!(f, "[⚠] {} - not present", check.file_name)?,
                CheckStatus::Failed(msg) => {
                    writeln!(f, "[✗] {} - FAILED: {}", check.file_name, msg)?
                }
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} parsed, {} missing, {} failed",
            self.success_count(),
            self.missing_count(),
            self.failure_count()
        )
    }
}

/// Parse each metadata file of a run directory independently and report the
/// outcome for every file.
///
/// Unlike [`extract_metadata`](super::extract_metadata), a failing file does
/// not stop the remaining files from being checked.
pub fn check_datafile(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<CheckReport, MetadataError> {
    let path = path.as_ref();
    if !is_datafile(path) {
        return Err(MetadataError::NotADatafile(path.to_path_buf()));
    }

    let dir = acq_data_dir(path);
    Ok(CheckReport {
        run_path: path.to_path_buf(),
        checks: vec![
            FileCheck::run::<AcqMethod>(&dir, options),
            FileCheck::run::<Contents>(&dir, options),
            FileCheck::run::<CalibrationList>(&dir, options),
            FileCheck::run::<DeviceConfigInfo>(&dir, options),
            FileCheck::run::<DeviceList>(&dir, options),
            FileCheck::run::<ActualsDef>(&dir, options),
            FileCheck::run::<MSTimeSegments>(&dir, options),
            FileCheck::run::<SampleInfo>(&dir, options),
        ],
    })
}
