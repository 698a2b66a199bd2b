//! # agilent-metadata
//!
//! Command-line tool for extracting acquisition metadata from Agilent
//! MassHunter `.d` run directories.
//!
//! ## Usage
//!
//! ```bash
//! # Dump all metadata as JSON
//! agilent-metadata extract Sample_Run.d -o metadata.json --pretty
//!
//! # Check which metadata files parse
//! agilent-metadata check Sample_Run.d
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
