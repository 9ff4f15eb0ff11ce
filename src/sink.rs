//! Destinations for binary blobs extracted during decoding
//!
//! Gel images inside preview bundles are not kept in the decoded tree; the
//! decoder hands them to a [`BlobSink`] supplied by the caller and records
//! only the name and size.

use std::fs;
use std::path::{Path, PathBuf};

/// Errors reported by a blob sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// I/O error while storing a blob
    #[error("failed to store blob '{name}': {source}")]
    Io {
        /// Blob name
        name: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The blob name cannot be used by this sink
    #[error("invalid blob name '{0}'")]
    InvalidName(String),
}

/// Receiver for extracted binary blobs
pub trait BlobSink {
    /// Store `bytes` under `name`
    fn store(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

/// Sink that drops every blob
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl BlobSink for DiscardSink {
    fn store(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        log::debug!("discarding blob {} ({} bytes)", name, bytes.len());
        Ok(())
    }
}

/// Sink that keeps blobs in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Stored blobs in arrival order
    pub blobs: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a stored blob by name
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.blobs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b.as_slice())
    }
}

impl BlobSink for MemorySink {
    fn store(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        self.blobs.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Sink that writes each blob to a file in a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink writing into `dir`; the directory is created on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl BlobSink for DirectorySink {
    fn store(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !valid {
            return Err(SinkError::InvalidName(name.to_string()));
        }

        let io_err = |source| SinkError::Io {
            name: name.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(io_err)?;

        log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
        self.written.push(path);
        Ok(())
    }
}
