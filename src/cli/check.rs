use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use agilent_metadata::metadata::check_datafile;

use super::config::Settings;

/// Parse every metadata file of a run directory and print a report
pub fn run(run: PathBuf, settings: Settings) -> Result<()> {
    info!("Checking {}", run.display());

    let report = check_datafile(&run, &settings.options)
        .with_context(|| format!("Failed to check {}", run.display()))?;

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    // Exit with error code if any file failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
