use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod config;
mod extract;

pub use config::Config;

/// agilent-metadata - Acquisition metadata from MassHunter run directories
#[derive(Parser)]
#[command(name = "agilent-metadata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all metadata from a run directory as JSON
    Extract {
        /// Run directory (`<name>.d`)
        #[arg(value_name = "RUN")]
        run: PathBuf,

        /// Write JSON to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        validation: ValidationFlags,

        /// Indent the JSON output
        #[arg(long, overrides_with = "no_pretty")]
        pretty: bool,

        /// Write compact JSON even if the config file asks for indentation
        #[arg(long, overrides_with = "pretty")]
        no_pretty: bool,
    },

    /// Parse each metadata file of a run directory and report the outcome
    Check {
        /// Run directory (`<name>.d`)
        #[arg(value_name = "RUN")]
        run: PathBuf,

        #[command(flatten)]
        validation: ValidationFlags,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct ValidationFlags {
    /// Validate files against their bundled schemas (the default)
    #[arg(long, overrides_with = "no_validate")]
    validate: bool,

    /// Skip structural schema validation
    #[arg(long, overrides_with = "validate")]
    no_validate: bool,
}

impl ValidationFlags {
    fn value(self) -> Option<bool> {
        switch(self.validate, self.no_validate)
    }
}

/// `Some` when one of a `--x`/`--no-x` pair was given
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Extract {
            run,
            output,
            validation,
            pretty,
            no_pretty,
        } => {
            let settings = config.merge_flags(validation.value(), switch(pretty, no_pretty));
            extract::run(run, output, settings)
        }
        Commands::Check { run, validation } => {
            check::run(run, config.merge_flags(validation.value(), None))
        }
    }
}
