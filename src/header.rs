//! Fixed 76-byte binary header
//!
//! The same header layout appears in front of the compressed payload and at
//! the start of `header information` comments:
//!
//! ```text
//! offset  size  field
//! 0       4     u32 LE
//! 4       4     u32 LE
//! 8       4     u32 LE
//! 12      4     u32 LE
//! 16      4     u32 LE
//! 20      56    UTF-16LE label, 28 code units, NUL padded
//! ```
//!
//! The integers are instrument-internal and are extracted, not interpreted.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use crate::encoding::{decode_utf16le, trim_nul};
use crate::error::{Result, XadError};

/// Size of the binary header in bytes
pub const HEADER_LEN: usize = 76;

/// Number of leading little-endian `u32` fields
pub const HEADER_INT_COUNT: usize = 5;

/// Number of UTF-16 code units in the trailing label
pub const HEADER_LABEL_UNITS: usize = 28;

/// A decoded binary header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedHeader {
    /// The five leading integers, in file order
    pub values: [u32; HEADER_INT_COUNT],
    /// The 28-unit label, including any NUL padding
    pub text: String,
}

impl DecodedHeader {
    /// Decode the first [`HEADER_LEN`] bytes of `bytes`
    ///
    /// Extra bytes are ignored; callers that care about them slice them off
    /// first.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(XadError::MalformedHeader {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let mut cursor = Cursor::new(&bytes[..HEADER_INT_COUNT * 4]);
        let mut values = [0u32; HEADER_INT_COUNT];
        cursor.read_u32_into::<LittleEndian>(&mut values)?;

        let text = decode_utf16le(&bytes[HEADER_INT_COUNT * 4..HEADER_LEN])?;

        log::debug!("decoded header {:?} label {:?}", values, trim_nul(&text));
        Ok(Self { values, text })
    }

    /// The label with its NUL padding removed
    pub fn label(&self) -> &str {
        trim_nul(&self.text)
    }
}
