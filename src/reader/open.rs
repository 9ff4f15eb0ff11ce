use std::fs;
use std::path::Path;

use super::{XadFile, XadReader};
use crate::error::Result;
use crate::sink::BlobSink;

impl XadReader {
    /// Read and decode a file from disk
    pub fn read_path<P: AsRef<Path>>(&self, path: P, sink: &mut dyn BlobSink) -> Result<XadFile> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        self.read_bytes(&bytes, sink)
    }

    /// Decode an outer document held in memory
    ///
    /// The bytes must be UTF-8, the encoding XAD files declare.
    pub fn read_bytes(&self, bytes: &[u8], sink: &mut dyn BlobSink) -> Result<XadFile> {
        let text = std::str::from_utf8(bytes)?;
        self.read_str(text, sink)
    }
}
