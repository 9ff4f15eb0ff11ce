//! Minimal owned XML tree on top of quick-xml
//!
//! All three documents in an XAD file (the outer container, the embedded
//! preview and the inflated chipset payload) are small enough to hold in
//! memory, and the schema walker needs to look at whole child lists, so
//! events are folded into a node tree instead of being consumed as a stream.

use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Decoder, Reader, Writer};

use crate::error::{Result, XadError};

/// An element as produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    /// Tag name, including any prefix
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
    /// Byte offset of the start tag within its document
    pub offset: u64,
}

/// A node inside an element or at document level
///
/// Non-element variants carry their content and the byte offset where the
/// node starts in its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Nested element
    Element(RawElement),
    /// Character data with entities resolved
    Text(String, u64),
    /// CDATA section
    CData(String, u64),
    /// Comment body, without the `<!--`/`-->` delimiters
    Comment(String, u64),
    /// Processing instruction content
    ProcessingInstruction(String, u64),
    /// Document type declaration
    DocType(String, u64),
}

impl XmlNode {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            XmlNode::Element(e) => format!("<{}>", e.name),
            XmlNode::Text(t, _) => format!("#text {:?}", preview(t)),
            XmlNode::CData(t, _) => format!("#cdata {:?}", preview(t)),
            XmlNode::Comment(t, _) => format!("#comment {:?}", preview(t)),
            XmlNode::ProcessingInstruction(t, _) => format!("#pi {:?}", preview(t)),
            XmlNode::DocType(t, _) => format!("#doctype {:?}", preview(t)),
        }
    }

    /// Byte offset where the node starts within its document
    pub fn offset(&self) -> u64 {
        match self {
            XmlNode::Element(e) => e.offset,
            XmlNode::Text(_, offset)
            | XmlNode::CData(_, offset)
            | XmlNode::Comment(_, offset)
            | XmlNode::ProcessingInstruction(_, offset)
            | XmlNode::DocType(_, offset) => *offset,
        }
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() > MAX {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

impl RawElement {
    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize this element and its subtree back to XML text
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        let bytes = writer.into_inner();
        Ok(std::str::from_utf8(&bytes)?.to_string())
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &RawElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t, _) => writer.write_event(Event::Text(BytesText::new(t)))?,
            XmlNode::CData(t, _) => {
                writer.write_event(Event::CData(BytesCData::new(t.as_str())))?
            }
            XmlNode::Comment(t, _) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(t.as_str())))?
            }
            XmlNode::ProcessingInstruction(t, _) => {
                writer.write_event(Event::PI(BytesPI::new(t.as_str())))?
            }
            XmlNode::DocType(t, _) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(t.as_str())))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<String> {
    Ok(std::str::from_utf8(bytes)?.to_string())
}

fn start_element(e: &BytesStart, decoder: Decoder, offset: u64) -> Result<RawElement> {
    let name = utf8(e.name().as_ref())?;
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        attributes.push((key, value));
    }
    Ok(RawElement {
        name,
        attributes,
        children: Vec::new(),
        offset,
    })
}

/// Parse an XML document into its top-level nodes
///
/// The XML declaration is dropped; everything else at document level
/// (comments, whitespace, the root element) is returned in order so the
/// caller can decide what is acceptable. Adjacent text runs are merged.
pub fn parse_document(xml: &str) -> Result<Vec<XmlNode>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut top: Vec<XmlNode> = Vec::new();
    let mut stack: Vec<RawElement> = Vec::new();

    loop {
        let offset = reader.buffer_position();
        let node = match reader.read_event()? {
            Event::Start(e) => {
                stack.push(start_element(&e, reader.decoder(), offset)?);
                continue;
            }
            Event::End(_) => {
                // quick-xml checks that end names match their start tags
                let element = stack.pop().ok_or_else(|| {
                    XadError::ParseFailure(format!("unbalanced end tag at byte {offset}"))
                })?;
                XmlNode::Element(element)
            }
            Event::Empty(e) => XmlNode::Element(start_element(&e, reader.decoder(), offset)?),
            Event::Text(e) => XmlNode::Text(e.unescape()?.into_owned(), offset),
            Event::CData(e) => XmlNode::CData(utf8(&e)?, offset),
            Event::Comment(e) => XmlNode::Comment(utf8(&e)?, offset),
            Event::PI(e) => XmlNode::ProcessingInstruction(utf8(&e)?, offset),
            Event::DocType(e) => XmlNode::DocType(utf8(&e)?, offset),
            Event::Decl(_) => continue,
            Event::Eof => break,
        };

        let siblings = match stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut top,
        };
        push_merged(siblings, node);
    }

    if let Some(open) = stack.last() {
        return Err(XadError::ParseFailure(format!(
            "element <{}> at byte {} is never closed",
            open.name, open.offset
        )));
    }

    Ok(top)
}

fn push_merged(siblings: &mut Vec<XmlNode>, node: XmlNode) {
    // a merged run keeps the offset of its first piece
    if let (Some(XmlNode::Text(prev, _)), XmlNode::Text(next, _)) = (siblings.last_mut(), &node) {
        prev.push_str(next);
        return;
    }
    siblings.push(node);
}
