use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use agilent_metadata::metadata::{extract_metadata_with, prepare_filepath};

use super::config::Settings;

/// Extract metadata from a run directory and write it as JSON
pub fn run(run: PathBuf, output: Option<PathBuf>, settings: Settings) -> Result<()> {
    if !settings.options.validate_schema {
        info!("Schema validation disabled");
    }

    let metadata = extract_metadata_with(&run, &settings.options)
        .with_context(|| format!("Failed to extract metadata from {}", run.display()))?;

    let json = if settings.pretty {
        metadata.to_json_pretty()?
    } else {
        metadata.to_json()?
    };

    match output {
        Some(path) => {
            let path = prepare_filepath(&path, true)?;
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote metadata to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
