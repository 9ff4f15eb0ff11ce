//! # xadder
//!
//! A command-line tool for inspecting Bioanalyzer XAD chip data files.
//!
//! ## Usage
//!
//! ```bash
//! # Print a summary of every decoded value
//! xadder decode run.xad
//!
//! # Dump everything as JSON and save the gel preview image
//! xadder decode run.xad --json --images previews/
//!
//! # Short overview
//! xadder info run.xad
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
