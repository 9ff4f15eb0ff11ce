//! Error types for XAD decoding
//!
//! Every failure aborts the decode of the current file. There is no partial
//! result: a structural surprise means either corruption or an undocumented
//! variant of the format, and the caller gets one terminal error naming it.

use crate::sink::SinkError;

/// Failures while undoing one of the text/binary encoding layers
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// Base64 text could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// UTF-16LE input must contain a whole number of code units
    #[error("UTF-16LE data has odd length {0}")]
    OddUtf16Length(usize),

    /// UTF-16LE input contained an unpaired surrogate
    #[error("Invalid UTF-16LE text: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),

    /// UTF-8 input (XML names, comments, CDATA) was not valid
    #[error("Invalid UTF-8 text: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Errors that can occur while decoding an XAD file
#[derive(Debug, thiserror::Error)]
pub enum XadError {
    /// Not enough bytes for a fixed binary layout
    #[error("Malformed header: need {expected} bytes, got {actual}")]
    MalformedHeader {
        /// Minimum number of bytes the layout requires
        expected: usize,
        /// Number of bytes that were available
        actual: usize,
    },

    /// A sentinel matched but the structure behind it was not found
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// A node with no matching schema entry
    #[error("Unexpected node {node} under {context}{}{}", fmt_offset(.offset), fmt_expected(.expected))]
    UnexpectedNode {
        /// Description of the offending node, e.g. `<Bogus>` or `#comment`
        node: String,
        /// Path of the parent element, e.g. `Chipset/Chips/Chip`
        context: String,
        /// Byte offset of the node within the XML document it was found in
        offset: Option<u64>,
        /// Child names the schema accepts at this position
        expected: Vec<&'static str>,
    },

    /// `vartype` attribute not one of LE_R4, LE_I2, LE_UI1
    #[error("Unsupported packed value type: {0}")]
    UnsupportedPackedValueType(String),

    /// Declared element count does not match the decoded byte length
    #[error("Array length mismatch: {declared} values of {width} bytes declared, {actual_bytes} bytes decoded")]
    ArrayLengthMismatch {
        /// Value of the `numvalues` attribute
        declared: usize,
        /// Width of one element in bytes
        width: usize,
        /// Number of bytes the Base64 body decoded to
        actual_bytes: usize,
    },

    /// Raw DEFLATE stream is corrupt or truncated
    #[error("Inflate failure: {0}")]
    InflateFailure(#[source] std::io::Error),

    /// Inflated payload grew past the configured cap
    #[error("Inflated payload exceeds limit of {limit} bytes")]
    InflateLimitExceeded {
        /// Configured maximum in bytes
        limit: usize,
    },

    /// Base64, UTF-16LE or UTF-8 decoding failed
    #[error("Encoding failure: {0}")]
    EncodingFailure(#[from] EncodingError),

    /// Required XML attribute is missing
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: &'static str,
    },

    /// Invalid value for an XML attribute
    #[error("Invalid attribute value: {0}")]
    InvalidAttributeValue(String),

    /// Error tokenizing XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob sink refused an extracted binary
    #[error("Blob sink error: {0}")]
    Sink(#[from] SinkError),
}

impl XadError {
    /// Build an [`XadError::UnexpectedNode`] without expected-name hints
    pub fn unexpected(node: impl Into<String>, context: impl Into<String>) -> Self {
        XadError::UnexpectedNode {
            node: node.into(),
            context: context.into(),
            offset: None,
            expected: Vec::new(),
        }
    }

    /// Fill in the offset of an [`XadError::UnexpectedNode`] that has none
    ///
    /// Other variants, and nodes that already carry an offset, are returned
    /// unchanged.
    pub fn at_offset(self, at: u64) -> Self {
        match self {
            XadError::UnexpectedNode {
                node,
                context,
                offset: None,
                expected,
            } => XadError::UnexpectedNode {
                node,
                context,
                offset: Some(at),
                expected,
            },
            other => other,
        }
    }
}

impl From<base64::DecodeError> for XadError {
    fn from(e: base64::DecodeError) -> Self {
        XadError::EncodingFailure(EncodingError::Base64(e))
    }
}

impl From<std::str::Utf8Error> for XadError {
    fn from(e: std::str::Utf8Error) -> Self {
        XadError::EncodingFailure(EncodingError::Utf8(e))
    }
}

impl From<quick_xml::events::attributes::AttrError> for XadError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        XadError::Xml(quick_xml::Error::from(e))
    }
}

fn fmt_offset(offset: &Option<u64>) -> String {
    offset.map(|o| format!(" at byte {o}")).unwrap_or_default()
}

fn fmt_expected(expected: &[&'static str]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(" (expected one of: {})", expected.join(", "))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, XadError>;
