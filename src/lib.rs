//! # xadder - Bioanalyzer XAD Chip Data Decoder
//!
//! `xadder` decodes the XAD files written by the Agilent 2100 Bioanalyzer.
//! An XAD file is an XML document that wraps its measurement data in several
//! layers of envelope encoding:
//!
//! ```text
//! XAD file (UTF-8 XML)
//! ├── <!-- comment tag:<uuid>:<n>:... -->          opaque tagged blob
//! ├── <!-- preview information:<uuid>:<b64> -->    UTF-16LE, embedded <Preview> XML
//! ├── <!-- header information:<uuid>:<b64> -->     76-byte binary header + extra
//! └── <compressed_data>b64</compressed_data>
//!     └── header(76) ∥ raw DEFLATE ∥ footer(9)
//!         └── UTF-16LE <Chipset> XML
//!             └── Chips/Chip/...                   packed Base64 signal arrays
//! ```
//!
//! Decoding is strict: every element is checked against a fixed schema and
//! an unknown element aborts the decode with [`error::XadError::UnexpectedNode`],
//! naming the node, its parent path and what was expected there.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xadder::prelude::*;
//!
//! let reader = XadReader::new(DecodeOptions::default());
//! let mut images = DirectorySink::new("images");
//! let file = reader.read_path("run.xad", &mut images)?;
//!
//! for chip in file.chips() {
//!     if let Some(Value::Packed(values)) = chip.lookup("RawSignals/Sample1/Channel/SignalData/RawSignal") {
//!         println!("chip {}: {} samples", chip.text("ID").unwrap_or("?"), values.len());
//!     }
//! }
//! # Ok::<(), xadder::error::XadError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`reader`]: outer document driver and [`reader::DecodeOptions`]
//! - [`comment`]: classifies metadata comments by sentinel
//! - [`preview`]: preview bundles embedded in comments
//! - [`compressed`]: the `compressed_data` payload envelope
//! - [`header`]: the 76-byte binary header
//! - [`walker`] and [`schema`]: schema-driven descent over XML trees
//! - [`packed`]: fixed-width little-endian arrays in element text
//! - [`document`]: the decoded value tree
//! - [`sink`]: destinations for extracted images
//! - [`xml`] and [`encoding`]: tokenizer tree and text codecs

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod comment;
pub mod compressed;
pub mod document;
pub mod encoding;
pub mod error;
pub mod header;
pub mod packed;
pub mod preview;
pub mod reader;
pub mod schema;
pub mod sink;
pub mod walker;
pub mod xml;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::comment::CommentRecord;
    pub use crate::compressed::CompressedPayload;
    pub use crate::document::{DecodedDocument, DecodedElement, Value};
    pub use crate::error::{EncodingError, XadError};
    pub use crate::header::DecodedHeader;
    pub use crate::packed::{PackedArray, PackedValueType};
    pub use crate::preview::PreviewSeparator;
    pub use crate::reader::{DecodeOptions, XadFile, XadReader};
    pub use crate::sink::{BlobSink, DirectorySink, DiscardSink, MemorySink, SinkError};
}
