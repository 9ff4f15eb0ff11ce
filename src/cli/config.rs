//! TOML configuration file support.
//!
//! Settings for `xadder decode` can live in a config file instead of flags:
//!
//! ```toml
//! # xadder.toml
//! [decode]
//! max_inflated_bytes = 1073741824
//! images_dir = "previews"
//! json = true
//! ```
//!
//! Flags given on the command line take precedence.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for xadder.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Decode-specific settings.
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// Configuration for the decode command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeConfig {
    /// Cap on inflated payload size in bytes; 0 disables the cap.
    pub max_inflated_bytes: Option<usize>,

    /// Directory receiving extracted images.
    pub images_dir: Option<PathBuf>,

    /// Emit JSON instead of the text summary.
    pub json: Option<bool>,
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
}
