//! Shared decoding primitives for the text layers of the format
//!
//! Base64 bodies in XAD files are wrapped across lines, and every string the
//! instrument writes itself (header labels, the inner documents) is UTF-16LE.

use base64::prelude::*;
use byteorder::{ByteOrder, LittleEndian};

use crate::error::EncodingError;

/// Base64-decode text, ignoring embedded ASCII whitespace and line breaks
pub fn decode_base64(text: &str) -> Result<Vec<u8>, EncodingError> {
    if text.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Ok(BASE64_STANDARD.decode(compact)?)
    } else {
        Ok(BASE64_STANDARD.decode(text)?)
    }
}

/// Decode UTF-16LE bytes into a `String`
///
/// Embedded NULs are preserved; callers that want a C-style label should use
/// [`trim_nul`].
pub fn decode_utf16le(bytes: &[u8]) -> Result<String, EncodingError> {
    if bytes.len() % 2 != 0 {
        return Err(EncodingError::OddUtf16Length(bytes.len()));
    }
    let mut units = vec![0u16; bytes.len() / 2];
    LittleEndian::read_u16_into(bytes, &mut units);
    Ok(String::from_utf16(&units)?)
}

/// Encode a string as UTF-16LE bytes
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut bytes = vec![0u8; units.len() * 2];
    LittleEndian::write_u16_into(&units, &mut bytes);
    bytes
}

/// Cut a string at its first NUL
pub fn trim_nul(text: &str) -> &str {
    match text.find('\0') {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// True for text made only of `\r` and `\n`
///
/// This is the one place the decoder is lenient: bare line endings between
/// elements are ignored wherever structure is expected.
pub fn is_line_ending_only(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b == b'\n' || b == b'\r')
}

/// True for text made only of XML whitespace (space, tab, `\r`, `\n`)
///
/// Used outside the root element, where whitespace is not content.
pub fn is_xml_whitespace_only(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}
