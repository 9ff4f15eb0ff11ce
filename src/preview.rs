//! Preview bundles embedded in comments
//!
//! A `preview information` comment carries Base64 of UTF-16LE text laid out
//! as:
//!
//! ```text
//! <preamble> <NUL|SOH> <Preview XML document> <NUL> [trailing]
//! ```
//!
//! The preamble is usually a single code unit of unknown meaning. Files have
//! been observed with both NUL and SOH as the separator, so both are accepted
//! and the one found is reported.

use serde::Serialize;

use crate::document::DecodedDocument;
use crate::encoding::{decode_base64, decode_utf16le, encode_utf16le};
use crate::error::{Result, XadError};
use crate::schema;
use crate::sink::BlobSink;
use crate::walker::Walker;

/// Separator found between preamble and embedded XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreviewSeparator {
    /// U+0000
    Nul,
    /// U+0001
    Soh,
}

/// A decoded preview bundle
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewBundle {
    /// UTF-16LE bytes before the separator
    pub preamble: Vec<u8>,
    /// Which separator matched
    pub separator: PreviewSeparator,
    /// The walked `Preview` document
    pub document: DecodedDocument,
}

/// Embedded XML recovered from a bundle, before walking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEnvelope {
    /// UTF-16LE bytes before the separator
    pub preamble: Vec<u8>,
    /// Which separator matched
    pub separator: PreviewSeparator,
    /// Embedded XML with line endings normalized to `\n`
    pub xml: String,
}

/// Split decoded bundle text into preamble and embedded XML
///
/// The terminator is the last NUL in the text; the separator is the last
/// NUL or SOH before it. XML text cannot contain either character, so any
/// earlier occurrence belongs to the preamble.
pub fn split_envelope(text: &str) -> Result<PreviewEnvelope> {
    let terminator = text
        .rfind('\0')
        .ok_or_else(|| XadError::ParseFailure("preview has no NUL terminator".to_string()))?;
    let separator_at = text[..terminator]
        .rfind(['\0', '\u{1}'])
        .ok_or_else(|| XadError::ParseFailure("preview has no NUL/SOH separator".to_string()))?;

    let separator = match text.as_bytes()[separator_at] {
        0 => PreviewSeparator::Nul,
        _ => PreviewSeparator::Soh,
    };
    let xml = text[separator_at + 1..terminator]
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    Ok(PreviewEnvelope {
        preamble: encode_utf16le(&text[..separator_at]),
        separator,
        xml,
    })
}

/// Decode the Base64 body of a preview comment and walk its document
///
/// Gel images are stored in `sink` as `preview-<uuid>-GelImage.png`.
pub fn decode_preview(base64_text: &str, uuid: &str, sink: &mut dyn BlobSink) -> Result<PreviewBundle> {
    let bytes = decode_base64(base64_text)?;
    let text = decode_utf16le(&bytes)?;
    let envelope = split_envelope(&text)?;
    log::debug!(
        "preview {}: {} preamble bytes, {} chars of XML",
        uuid,
        envelope.preamble.len(),
        envelope.xml.len()
    );

    let mut walker = Walker::new(sink, format!("preview-{uuid}-"));
    let document = walker.walk_document(&schema::PREVIEW, &envelope.xml, "embedded preview document")?;

    Ok(PreviewBundle {
        preamble: envelope.preamble,
        separator: envelope.separator,
        document,
    })
}
