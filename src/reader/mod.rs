//! # XAD Reader Module
//!
//! Entry point for decoding a whole XAD file. The outer document is UTF-8
//! XML whose top level holds metadata comments and a single
//! `compressed_data` element:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!--Do not edit this comment tag:<uuid>:<n>:...-->
//! <!--Do not edit this preview information:<uuid>:<base64>-->
//! <!--Do not edit this header information:<uuid>:<base64>-->
//! <compressed_data>base64...</compressed_data>
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use xadder::reader::{DecodeOptions, XadReader};
//! use xadder::sink::MemorySink;
//!
//! let reader = XadReader::new(DecodeOptions::default());
//! let mut images = MemorySink::new();
//! let file = reader.read_path("run.xad", &mut images)?;
//!
//! println!("{} comments", file.comments.len());
//! for chip in file.chips() {
//!     println!("chip {}", chip.text("ID").unwrap_or("?"));
//! }
//! # Ok::<(), xadder::error::XadError>(())
//! ```

mod config;
mod open;

#[cfg(test)]
mod tests;

pub use config::{DecodeOptions, DEFAULT_MAX_INFLATED_BYTES};

use serde::Serialize;

use crate::comment::{decode_comment, CommentRecord};
use crate::compressed::{decode_compressed, CompressedPayload};
use crate::document::{DecodedDocument, DecodedElement};
use crate::encoding::is_xml_whitespace_only;
use crate::error::{Result, XadError};
use crate::sink::BlobSink;
use crate::walker::element_text;
use crate::xml::{parse_document, XmlNode};

/// Name of the payload element in the outer document
pub const COMPRESSED_DATA: &str = "compressed_data";

/// A fully decoded XAD file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XadFile {
    /// Comment records in document order
    pub comments: Vec<CommentRecord>,
    /// The decoded `compressed_data` element
    pub payload: CompressedPayload,
}

impl XadFile {
    /// The `Chipset` tree
    pub fn chipset(&self) -> &DecodedDocument {
        &self.payload.chipset
    }

    /// Every `Chipset/Chips/Chip` element in order
    pub fn chips(&self) -> impl Iterator<Item = &DecodedElement> + '_ {
        self.payload
            .chipset
            .get_all("Chips")
            .filter_map(|chips| chips.as_element())
            .flat_map(|chips| chips.get_all("Chip"))
            .filter_map(|chip| chip.as_element())
    }
}

/// Decoder for XAD files
///
/// Holds no per-file state; one reader can decode any number of files.
#[derive(Debug, Clone, Default)]
pub struct XadReader {
    options: DecodeOptions,
}

impl XadReader {
    /// Create a reader with the given options
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the text of an outer XAD document
    ///
    /// Top-level comments go through the comment classifier; an
    /// unclassifiable comment is fatal. Exactly one `compressed_data`
    /// element must be present. Whitespace between top-level nodes is
    /// ignored; anything else is [`XadError::UnexpectedNode`].
    pub fn read_str(&self, text: &str, sink: &mut dyn BlobSink) -> Result<XadFile> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut comments = Vec::new();
        let mut payload: Option<CompressedPayload> = None;

        for node in parse_document(text)? {
            match node {
                XmlNode::Comment(body, offset) => {
                    let record = decode_comment(&body, sink).map_err(|e| e.at_offset(offset))?;
                    log::debug!("classified comment {} as {}", record.uuid(), record.kind());
                    comments.push(record);
                }
                XmlNode::Element(element) if element.name == COMPRESSED_DATA && payload.is_none() => {
                    let body = element_text(&element, "XAD document")?;
                    payload = Some(decode_compressed(
                        &body,
                        self.options.max_inflated_bytes,
                        sink,
                    )?);
                }
                XmlNode::Text(t, _) if is_xml_whitespace_only(&t) => {}
                other => {
                    return Err(XadError::UnexpectedNode {
                        node: other.describe(),
                        context: "XAD document".to_string(),
                        offset: Some(other.offset()),
                        expected: vec!["#comment", COMPRESSED_DATA],
                    })
                }
            }
        }

        let payload = payload.ok_or_else(|| {
            XadError::ParseFailure(format!("XAD document has no <{COMPRESSED_DATA}> element"))
        })?;
        Ok(XadFile { comments, payload })
    }
}
