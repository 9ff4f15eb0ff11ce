//! Decoded output tree
//!
//! The walker produces a [`DecodedElement`] per schema element. Entries keep
//! document order and may repeat (a `Chips` element holds several `Chip`
//! entries), so the tree is a list of named values rather than a map.

use serde::Serialize;

use crate::packed::PackedArray;

/// A decoded value attached to an element name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Plain element text
    Text(String),
    /// Packed numeric array
    Packed(PackedArray),
    /// Packed bytes reinterpreted as UTF-16LE text
    ScriptText(String),
    /// Subtree kept verbatim as serialized XML
    Fragment(String),
    /// Serialized `Table` element of a preview info block
    Table(String),
    /// Binary payload that was handed to the blob sink
    Blob {
        /// Name the blob was stored under
        name: String,
        /// Size in bytes
        len: usize,
    },
    /// Nested decoded element
    Element(DecodedElement),
}

impl Value {
    /// Borrow the string content of text-like values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::ScriptText(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow a nested element
    pub fn as_element(&self) -> Option<&DecodedElement> {
        match self {
            Value::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow a packed array
    pub fn as_packed(&self) -> Option<&PackedArray> {
        match self {
            Value::Packed(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow serialized XML of fragments and tables
    pub fn as_xml(&self) -> Option<&str> {
        match self {
            Value::Fragment(s) | Value::Table(s) => Some(s),
            _ => None,
        }
    }
}

/// An element decoded against its schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedElement {
    /// Element tag name
    pub name: String,
    /// Decoded children in document order
    pub entries: Vec<(String, Value)>,
}

/// Root of a decoded document (`Chipset` or `Preview`)
pub type DecodedDocument = DecodedElement;

impl DecodedElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a decoded child
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// First child value with the given name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// All child values with the given name
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Text of the first child with the given name
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Follow a slash-separated path of child names, taking the first match
    /// at each step
    ///
    /// ```
    /// use xadder::document::{DecodedElement, Value};
    ///
    /// let mut chip = DecodedElement::new("Chip");
    /// chip.push("ID", Value::Text("7".into()));
    /// let mut chips = DecodedElement::new("Chips");
    /// chips.push("Chip", Value::Element(chip));
    ///
    /// assert_eq!(chips.lookup("Chip/ID").and_then(Value::as_text), Some("7"));
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_element()?.get(segment)?;
        }
        Some(current)
    }

    /// Flatten the tree into `(path, value)` pairs for every leaf
    ///
    /// Paths start with this element's name; repeated names are indexed,
    /// e.g. `Chipset/Chips/Chip[1]/ID`.
    pub fn paths(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.collect_paths(&self.name, &mut out);
        out
    }

    fn collect_paths<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
        for (index, (name, value)) in self.entries.iter().enumerate() {
            let repeated = self.entries.iter().filter(|(n, _)| n == name).count() > 1;
            let segment = if repeated {
                let ordinal = self.entries[..index].iter().filter(|(n, _)| n == name).count();
                format!("{name}[{ordinal}]")
            } else {
                name.clone()
            };
            let path = format!("{prefix}/{segment}");
            match value {
                Value::Element(child) => child.collect_paths(&path, out),
                leaf => out.push((path, leaf)),
            }
        }
    }
}
