//! Schema tables for the decoded XML documents
//!
//! Each element type the decoder understands has a [`Schema`]: a table from
//! child element name to the [`Handler`] that decodes it. The tables are
//! plain `static` data, shared by every decode, and are consulted by one
//! generic walker ([`crate::walker`]). Supporting a newly observed tag is a
//! table edit, not new traversal code.
//!
//! ## Chipset document (inflated payload)
//!
//! ```text
//! Chipset
//! ├── Method, LogBook               (raw fragments)
//! ├── FileType, Type, Class, ...   (text)
//! └── Chips
//!     └── Chip*
//!         ├── AssayBody
//!         │   ├── DAAssaySetpoints
//!         │   ├── DASampleSetpoints
//!         │   └── DALadderSequence
//!         ├── Script
//!         │   └── ScriptText       (packed bytes, UTF-16LE)
//!         ├── RawSignals
//!         │   └── <signal set>*
//!         │       ├── Channel | Voltage | Current
//!         │       │   └── SignalData
//!         │       └── SignalData
//!         │           ├── RawSignal    (packed)
//!         │           └── ScriptStep   (packed)
//!         └── Packet               (packed)
//! ```
//!
//! ## Preview document (embedded in a comment)
//!
//! ```text
//! Preview
//! ├── Title                        (text)
//! ├── ChipInfo, SamplesInfo        (one Table each)
//! └── GelImage                     (Base64 PNG, sent to the blob sink)
//! ```

mod tables;


pub use tables::*;

/// How a child element is decoded
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    /// Walk the child with a nested schema
    Nested(&'static Schema),
    /// At most one text node; empty elements decode to `""`
    Text,
    /// Packed numeric array (`numvalues`/`vartype` attributes)
    Packed,
    /// Packed `LE_UI1` array holding UTF-16LE text
    PackedText,
    /// Subtree kept as serialized XML without interpretation
    Fragment,
    /// Exactly one `Table` child, kept as serialized XML
    Table,
    /// Base64 binary image handed to the blob sink
    Image,
}

/// Child table for one element type
#[derive(Debug)]
pub struct Schema {
    /// Element name this schema applies to; `None` matches any name
    pub name: Option<&'static str>,
    /// Known children and their handlers
    pub children: &'static [(&'static str, Handler)],
    /// Handler for children not listed in `children`, if any name is allowed
    pub any_child: Option<Handler>,
}

impl Schema {
    /// Name used in paths and error messages
    pub fn display_name(&self) -> &'static str {
        self.name.unwrap_or("*")
    }

    /// Whether an element named `name` conforms to this schema's tag
    pub fn matches(&self, name: &str) -> bool {
        self.name.map_or(true, |n| n == name)
    }

    /// Look up the handler for a child element name
    pub fn handler(&self, child: &str) -> Option<Handler> {
        self.children
            .iter()
            .find(|(name, _)| *name == child)
            .map(|(_, handler)| *handler)
            .or(self.any_child)
    }

    /// Names of the listed children, for diagnostics
    pub fn expected_children(&self) -> Vec<&'static str> {
        self.children.iter().map(|(name, _)| *name).collect()
    }
}
