//! # fmuio
//!
//! A command-line tool around the FMU export metadata engine.
//!
//! ## Usage
//!
//! ```bash
//! # Show the metadata recorded for an exported file
//! fmuio inspect share/results/maps/topvolantis.gri
//!
//! # Check that file and metadata still agree
//! fmuio validate share/results/maps/topvolantis.gri
//!
//! # Produce a self-contained demo case
//! fmuio demo /tmp/fmuio-demo
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
