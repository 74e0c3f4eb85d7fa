use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod demo;
mod init_case;
mod inspect;
mod validate;

/// fmuio - FMU Export Metadata Engine
#[derive(Parser)]
#[command(name = "fmuio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the metadata recorded for an exported file
    Inspect {
        /// Exported data file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate an exported file against its metadata
    Validate {
        /// Exported data file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export a synthetic surface into a demo case
    Demo {
        /// Directory used as the demo case root
        #[arg(value_name = "OUTPUT", default_value = "fmuio-demo")]
        output: PathBuf,
    },

    /// Initialize case metadata for a case root
    InitCase {
        /// Case root directory
        #[arg(value_name = "CASEPATH")]
        casepath: PathBuf,

        /// Global configuration file (YAML)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Case name; defaults to the case directory name
        #[arg(long)]
        name: Option<String>,

        /// Case owner; defaults to $USER
        #[arg(long)]
        user: Option<String>,
    },
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
    match cli.command {
        Commands::Inspect { file } => inspect::run(file),
        Commands::Validate { file } => validate::run(file),
        Commands::Demo { output } => demo::run(output),
        Commands::InitCase {
            casepath,
            config,
            name,
            user,
        } => init_case::run(casepath, config, name, user),
    }
}
