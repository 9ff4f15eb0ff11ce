//! The `compressed_data` payload
//!
//! The text of the outer document's `compressed_data` element is Base64 of:
//!
//! ```text
//! +-----------------+------------------------+----------------+
//! | header 76 bytes | raw DEFLATE stream     | footer 9 bytes |
//! +-----------------+------------------------+----------------+
//! ```
//!
//! The DEFLATE stream has no zlib or gzip framing. It inflates to UTF-16LE
//! text: the `Chipset` document holding all measurement data.

use std::io;

use flate2::{Decompress, FlushDecompress, Status};
use serde::Serialize;

use crate::document::DecodedDocument;
use crate::encoding::{decode_base64, decode_utf16le};
use crate::error::{Result, XadError};
use crate::header::{DecodedHeader, HEADER_LEN};
use crate::schema;
use crate::sink::BlobSink;
use crate::walker::Walker;

/// Size of the opaque footer after the DEFLATE stream
pub const FOOTER_LEN: usize = 9;

/// Smallest decoded payload that can hold header and footer
pub const MIN_PAYLOAD_LEN: usize = HEADER_LEN + FOOTER_LEN;

const INFLATE_CHUNK: usize = 64 * 1024;

/// Decoded `compressed_data` element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressedPayload {
    /// Header in front of the DEFLATE stream
    pub header: DecodedHeader,
    /// Trailing bytes, kept uninterpreted
    pub footer: [u8; FOOTER_LEN],
    /// The walked `Chipset` document
    pub chipset: DecodedDocument,
}

/// Inflate a raw DEFLATE stream
///
/// A stream that ends before its final block is an
/// [`XadError::InflateFailure`], as is corrupt data. With `limit` set,
/// output beyond `limit` bytes fails with [`XadError::InflateLimitExceeded`].
pub fn inflate_raw(data: &[u8], limit: Option<usize>) -> Result<Vec<u8>> {
    // `false`: no zlib header/trailer
    let mut inflater = Decompress::new(false);
    let mut out: Vec<u8> = Vec::with_capacity(growth(0, limit));

    loop {
        if out.len() == out.capacity() {
            out.reserve_exact(growth(out.len(), limit));
        }
        let consumed = inflater.total_in() as usize;
        let produced = out.len();

        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| XadError::InflateFailure(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        if let Some(limit) = limit {
            if out.len() > limit {
                return Err(XadError::InflateLimitExceeded { limit });
            }
        }

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                let progressed = inflater.total_in() as usize > consumed || out.len() > produced;
                if !progressed {
                    return Err(XadError::InflateFailure(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "raw DEFLATE stream ends before its final block",
                    )));
                }
            }
        }
    }
}

/// How many bytes to add to an output buffer holding `len` bytes
///
/// Doubles the buffer, but never past one byte beyond `limit`: that byte is
/// enough to detect the overflow.
fn growth(len: usize, limit: Option<usize>) -> usize {
    let doubled = len.max(INFLATE_CHUNK);
    match limit {
        Some(limit) => doubled.min(limit.saturating_add(1).saturating_sub(len).max(1)),
        None => doubled,
    }
}

/// Decode the text of a `compressed_data` element
///
/// Steps, each a precondition for the next: Base64 decode, split header /
/// stream / footer, inflate, decode UTF-16LE, walk the `Chipset` document.
pub fn decode_compressed(
    text: &str,
    max_inflated_bytes: Option<usize>,
    sink: &mut dyn BlobSink,
) -> Result<CompressedPayload> {
    let decoded = decode_base64(text)?;
    if decoded.len() < MIN_PAYLOAD_LEN {
        return Err(XadError::MalformedHeader {
            expected: MIN_PAYLOAD_LEN,
            actual: decoded.len(),
        });
    }

    let header = DecodedHeader::decode(&decoded[..HEADER_LEN])?;
    let body_end = decoded.len() - FOOTER_LEN;
    let mut footer = [0u8; FOOTER_LEN];
    footer.copy_from_slice(&decoded[body_end..]);

    let inflated = inflate_raw(&decoded[HEADER_LEN..body_end], max_inflated_bytes)?;
    log::debug!(
        "inflated {} compressed bytes to {} bytes",
        body_end - HEADER_LEN,
        inflated.len()
    );

    let text = decode_utf16le(&inflated)?;
    let xml = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut walker = Walker::new(sink, "payload-");
    let chipset = walker.walk_document(&schema::CHIPSET, xml, "compressed payload document")?;

    Ok(CompressedPayload {
        header,
        footer,
        chipset,
    })
}
