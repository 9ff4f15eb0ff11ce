use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod decode;
mod info;

/// xadder - Bioanalyzer XAD chip data decoder
#[derive(Parser)]
#[command(name = "xadder")]
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
    /// Decode an XAD file and print its contents
    Decode {
        /// Input XAD file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the decoded file as JSON
        #[arg(long)]
        json: bool,

        /// Write extracted images (gel previews) into this directory
        #[arg(long, value_name = "DIR")]
        images: Option<PathBuf>,

        /// Cap on inflated payload size in bytes (0 disables the cap)
        #[arg(long, value_name = "N")]
        max_inflated_bytes: Option<usize>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display a short summary of an XAD file
    Info {
        /// Input XAD file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
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
        Commands::Decode {
            file,
            json,
            images,
            max_inflated_bytes,
            config,
        } => decode::run(file, json, images, max_inflated_bytes, config),
        Commands::Info { file } => info::run(file),
    }
}
