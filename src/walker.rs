//! Schema-driven tree walker
//!
//! One recursive descent serves every element type: children are visited in
//! document order and dispatched through the parent's [`Schema`] table. A
//! child the table does not list aborts the walk with
//! [`XadError::UnexpectedNode`]; the format is reverse-engineered, and an
//! unknown tag means data the decoder would otherwise lose without notice.

use crate::document::{DecodedDocument, DecodedElement, Value};
use crate::encoding::{
    decode_base64, decode_utf16le, is_line_ending_only, is_xml_whitespace_only,
};
use crate::error::{Result, XadError};
use crate::packed::PackedArray;
use crate::schema::{Handler, Schema};
use crate::sink::BlobSink;
use crate::xml::{parse_document, RawElement, XmlNode};

/// Walks raw XML elements against schema tables
pub struct Walker<'s> {
    sink: &'s mut dyn BlobSink,
    blob_prefix: String,
}

impl<'s> Walker<'s> {
    /// Create a walker that hands extracted images to `sink`
    ///
    /// Blob names are `<blob_prefix><ElementName>.png`.
    pub fn new(sink: &'s mut dyn BlobSink, blob_prefix: impl Into<String>) -> Self {
        Self {
            sink,
            blob_prefix: blob_prefix.into(),
        }
    }

    /// Decode `element`, which must carry the tag `schema` describes
    pub fn walk(&mut self, schema: &'static Schema, element: &RawElement) -> Result<DecodedElement> {
        if !schema.matches(&element.name) {
            return Err(XadError::UnexpectedNode {
                node: format!("<{}>", element.name),
                context: "document root".to_string(),
                offset: Some(element.offset),
                expected: vec![schema.display_name()],
            });
        }
        self.walk_at(schema, element, "")
    }

    /// Parse a standalone XML document and walk its single root element
    ///
    /// Only whitespace may surround the root; a second element, a
    /// comment or other text at document level is an
    /// [`XadError::UnexpectedNode`]. `context` names the document in errors.
    pub fn walk_document(
        &mut self,
        schema: &'static Schema,
        xml: &str,
        context: &str,
    ) -> Result<DecodedDocument> {
        let mut root: Option<DecodedDocument> = None;
        for node in parse_document(xml)? {
            match node {
                XmlNode::Element(element) if root.is_none() && schema.matches(&element.name) => {
                    root = Some(self.walk(schema, &element)?);
                }
                XmlNode::Text(t, _) if is_xml_whitespace_only(&t) => {}
                other => {
                    return Err(XadError::UnexpectedNode {
                        node: other.describe(),
                        context: context.to_string(),
                        offset: Some(other.offset()),
                        expected: vec![schema.display_name()],
                    })
                }
            }
        }

        root.ok_or_else(|| {
            XadError::ParseFailure(format!(
                "{context} has no <{}> element",
                schema.display_name()
            ))
        })
    }

    fn walk_at(
        &mut self,
        schema: &'static Schema,
        element: &RawElement,
        parent_path: &str,
    ) -> Result<DecodedElement> {
        let path = if parent_path.is_empty() {
            element.name.clone()
        } else {
            format!("{parent_path}/{}", element.name)
        };

        let mut decoded = DecodedElement::new(element.name.as_str());
        for node in &element.children {
            let child = match node {
                XmlNode::Element(child) => child,
                XmlNode::Text(t, _) if is_line_ending_only(t) => continue,
                other => return Err(unexpected(other, schema, &path)),
            };

            let handler = schema
                .handler(&child.name)
                .ok_or_else(|| unexpected(node, schema, &path))?;
            log::trace!("{path}: <{}> -> {handler:?}", child.name);

            let value = self.dispatch(handler, child, &path)?;
            decoded.push(child.name.as_str(), value);
        }

        Ok(decoded)
    }

    fn dispatch(&mut self, handler: Handler, child: &RawElement, path: &str) -> Result<Value> {
        let value = match handler {
            Handler::Nested(sub) => {
                if !sub.matches(&child.name) {
                    return Err(XadError::UnexpectedNode {
                        node: format!("<{}>", child.name),
                        context: path.to_string(),
                        offset: Some(child.offset),
                        expected: vec![sub.display_name()],
                    });
                }
                Value::Element(self.walk_at(sub, child, path)?)
            }
            Handler::Text => Value::Text(element_text(child, path)?),
            Handler::Packed => Value::Packed(PackedArray::from_element(child, path)?),
            Handler::PackedText => match PackedArray::from_element(child, path)? {
                PackedArray::UInt8(bytes) => Value::ScriptText(decode_utf16le(&bytes)?),
                other => {
                    return Err(XadError::UnsupportedPackedValueType(format!(
                        "{} (text in <{}> must be LE_UI1)",
                        other.value_type().vartype(),
                        child.name
                    )))
                }
            },
            Handler::Fragment => Value::Fragment(child.to_xml()?),
            Handler::Table => Value::Table(table_xml(child, path)?),
            Handler::Image => {
                let bytes = decode_base64(&element_text(child, path)?)?;
                let name = format!("{}{}.png", self.blob_prefix, child.name);
                self.sink.store(&name, &bytes)?;
                log::debug!("stored {} ({} bytes)", name, bytes.len());
                Value::Blob {
                    name,
                    len: bytes.len(),
                }
            }
        };
        Ok(value)
    }
}

fn unexpected(node: &XmlNode, schema: &Schema, path: &str) -> XadError {
    XadError::UnexpectedNode {
        node: node.describe(),
        context: path.to_string(),
        offset: Some(node.offset()),
        expected: schema.expected_children(),
    }
}

/// Text content of an element with at most one text child
///
/// An empty element yields `""`. More than one child, or a child that is
/// not text, is an [`XadError::UnexpectedNode`].
pub fn element_text(element: &RawElement, context: &str) -> Result<String> {
    match element.children.as_slice() {
        [] => Ok(String::new()),
        [XmlNode::Text(t, _)] | [XmlNode::CData(t, _)] => Ok(t.clone()),
        [other] => Err(XadError::UnexpectedNode {
            node: other.describe(),
            context: format!("{context}/{} (not a text node)", element.name),
            offset: Some(other.offset()),
            expected: Vec::new(),
        }),
        [_, second, ..] => Err(XadError::UnexpectedNode {
            node: second.describe(),
            context: format!("{context}/{} (more than one child node)", element.name),
            offset: Some(second.offset()),
            expected: Vec::new(),
        }),
    }
}

fn table_xml(element: &RawElement, context: &str) -> Result<String> {
    let path = format!("{context}/{}", element.name);
    let mut nodes = element
        .children
        .iter()
        .filter(|n| !matches!(n, XmlNode::Text(t, _) if is_line_ending_only(t)));

    let table = match nodes.next() {
        Some(XmlNode::Element(table)) if table.name == "Table" => table,
        Some(other) => {
            return Err(XadError::UnexpectedNode {
                node: other.describe(),
                context: path,
                offset: Some(other.offset()),
                expected: vec!["Table"],
            })
        }
        None => {
            return Err(XadError::UnexpectedNode {
                node: format!("<{}>", element.name),
                context: format!("{context} (Table missing)"),
                offset: Some(element.offset),
                expected: vec!["Table"],
            })
        }
    };

    if let Some(extra) = nodes.next() {
        return Err(XadError::UnexpectedNode {
            node: extra.describe(),
            context: format!("{path} (more than one child node for table)"),
            offset: Some(extra.offset()),
            expected: Vec::new(),
        });
    }

    table.to_xml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use crate::sink::{DiscardSink, MemorySink};
    use base64::prelude::*;

    fn root(xml: &str) -> RawElement {
        parse_document(xml)
            .unwrap()
            .into_iter()
            .find_map(|n| match n {
                XmlNode::Element(e) => Some(e),
                _ => None,
            })
            .unwrap()
    }

    fn walk(schema: &'static Schema, xml: &str) -> Result<DecodedElement> {
        let mut sink = DiscardSink;
        Walker::new(&mut sink, "").walk(schema, &root(xml))
    }

    #[test]
    fn test_walk_chipset_text_fields() {
        let decoded = walk(
            &schema::CHIPSET,
            "<Chipset><FileType>XAD</FileType><Type/><Class>Assay</Class></Chipset>",
        )
        .unwrap();
        assert_eq!(decoded.text("FileType"), Some("XAD"));
        assert_eq!(decoded.text("Type"), Some(""));
        assert_eq!(decoded.text("Class"), Some("Assay"));
    }

    #[test]
    fn test_line_endings_between_children_are_ignored() {
        let decoded = walk(
            &schema::CHIPSET,
            "<Chipset>\r\n<FileType>XAD</FileType>\n</Chipset>",
        )
        .unwrap();
        assert_eq!(decoded.entries.len(), 1);
    }

    #[test]
    fn test_indentation_is_not_line_ending_only() {
        let err = walk(&schema::CHIPSET, "<Chipset>\n  <FileType>XAD</FileType></Chipset>").unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { ref node, .. } if node.starts_with("#text")));
    }

    #[test]
    fn test_unknown_child_names_path_and_offset() {
        let xml = "<Chipset><Chips><Chip><ID>1</ID><Bogus/></Chip></Chips></Chipset>";
        let err = walk(&schema::CHIPSET, xml).unwrap_err();
        match err {
            XadError::UnexpectedNode {
                node,
                context,
                offset,
                expected,
            } => {
                assert_eq!(node, "<Bogus>");
                assert_eq!(context, "Chipset/Chips/Chip");
                assert_eq!(offset, Some(xml.find("<Bogus/>").unwrap() as u64));
                assert!(expected.contains(&"AssayBody"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_wrong_root_name() {
        let err = walk(&schema::CHIPSET, "<Preview/>").unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { ref node, .. } if node == "<Preview>"));
    }

    #[test]
    fn test_walk_document_root_rules() {
        let mut sink = DiscardSink;
        let mut walker = Walker::new(&mut sink, "");

        let decoded = walker
            .walk_document(&schema::CHIPSET, "<?xml version=\"1.0\"?>\n<Chipset/>\n", "payload")
            .unwrap();
        assert!(decoded.entries.is_empty());

        let err = walker
            .walk_document(&schema::CHIPSET, "<Other/>", "payload")
            .unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { ref node, .. } if node == "<Other>"));

        let err = walker
            .walk_document(&schema::CHIPSET, "<Chipset/><Chipset/>", "payload")
            .unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { .. }));

        let err = walker
            .walk_document(&schema::CHIPSET, "<!-- only a comment --><Chipset/>", "payload")
            .unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { ref node, .. } if node.starts_with("#comment")));

        let err = walker.walk_document(&schema::CHIPSET, "\n", "payload").unwrap_err();
        assert!(matches!(err, XadError::ParseFailure(_)));
    }

    #[test]
    fn test_document_level_whitespace_and_stray_text() {
        let mut sink = DiscardSink;
        let mut walker = Walker::new(&mut sink, "");

        let decoded = walker
            .walk_document(&schema::CHIPSET, " \t\r\n<Chipset/>\n\t", "payload")
            .unwrap();
        assert!(decoded.entries.is_empty());

        let xml = "<Chipset/>\nstray";
        let err = walker.walk_document(&schema::CHIPSET, xml, "payload").unwrap_err();
        match err {
            XadError::UnexpectedNode { node, offset, .. } => {
                assert!(node.starts_with("#text"));
                assert_eq!(offset, Some(xml.find('\n').unwrap() as u64));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_indentation_error_carries_offset() {
        let xml = "<Chipset>\n  <FileType>XAD</FileType></Chipset>";
        match walk(&schema::CHIPSET, xml).unwrap_err() {
            XadError::UnexpectedNode { offset, context, .. } => {
                assert_eq!(context, "Chipset");
                assert_eq!(offset, Some("<Chipset>".len() as u64));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_text_with_element_child_fails() {
        let err = walk(&schema::CHIPSET, "<Chipset><FileType><b/></FileType></Chipset>").unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { ref context, .. } if context.contains("not a text node")));
    }

    #[test]
    fn test_comment_inside_schema_element_fails() {
        let err = walk(&schema::CHIPSET, "<Chipset><!-- note --></Chipset>").unwrap_err();
        assert!(matches!(err, XadError::UnexpectedNode { ref node, .. } if node.starts_with("#comment")));
    }

    #[test]
    fn test_fragment_keeps_subtree() {
        let decoded = walk(
            &schema::CHIPSET,
            r#"<Chipset><Method><Step n="1">a</Step></Method></Chipset>"#,
        )
        .unwrap();
        assert_eq!(
            decoded.get("Method").and_then(Value::as_xml),
            Some(r#"<Method><Step n="1">a</Step></Method>"#)
        );
    }

    #[test]
    fn test_raw_signals_accept_any_set_name() {
        let raw: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let xml = format!(
            concat!(
                "<Chip><RawSignals><Sample1>",
                "<HasData>true</HasData>",
                "<Channel><SignalData><Name>Fluorescence</Name>",
                r#"<RawSignal numvalues="2" vartype="LE_R4">{}</RawSignal>"#,
                "</SignalData></Channel>",
                "</Sample1><Ladder/></RawSignals></Chip>"
            ),
            BASE64_STANDARD.encode(raw)
        );
        let decoded = walk(&schema::CHIP, &xml).unwrap();

        let signal = decoded
            .lookup("RawSignals/Sample1/Channel/SignalData/RawSignal")
            .and_then(Value::as_packed)
            .unwrap();
        assert_eq!(signal.as_f32(), Some(&[1.5f32, -2.0][..]));
        assert!(decoded.lookup("RawSignals/Ladder").is_some());
    }

    #[test]
    fn test_script_text_is_utf16le() {
        let bytes = crate::encoding::encode_utf16le("LOAD\r\nRUN");
        let xml = format!(
            r#"<Script><AllowEdit>false</AllowEdit><ScriptText numvalues="{}" vartype="LE_UI1">{}</ScriptText></Script>"#,
            bytes.len(),
            BASE64_STANDARD.encode(&bytes)
        );
        let decoded = walk(&schema::SCRIPT, &xml).unwrap();
        assert_eq!(decoded.text("ScriptText"), Some("LOAD\r\nRUN"));
        assert_eq!(decoded.get("ScriptText"), Some(&Value::ScriptText("LOAD\r\nRUN".into())));
    }

    #[test]
    fn test_script_text_rejects_floats() {
        let xml = r#"<Script><ScriptText numvalues="1" vartype="LE_R4">AACAPw==</ScriptText></Script>"#;
        let err = walk(&schema::SCRIPT, xml).unwrap_err();
        assert!(matches!(err, XadError::UnsupportedPackedValueType(_)));
    }

    #[test]
    fn test_preview_table_and_image() {
        let png = b"\x89PNG\r\n\x1a\n";
        let xml = format!(
            "<Preview><Title>Run</Title><ChipInfo><Table><Row/></Table></ChipInfo><GelImage>{}</GelImage></Preview>",
            BASE64_STANDARD.encode(png)
        );
        let mut sink = MemorySink::new();
        let decoded = Walker::new(&mut sink, "preview-x-")
            .walk(&schema::PREVIEW, &root(&xml))
            .unwrap();

        assert_eq!(decoded.text("Title"), Some("Run"));
        assert_eq!(
            decoded.get("ChipInfo").and_then(Value::as_xml),
            Some("<Table><Row/></Table>")
        );
        assert_eq!(
            decoded.get("GelImage"),
            Some(&Value::Blob {
                name: "preview-x-GelImage.png".into(),
                len: png.len()
            })
        );
        assert_eq!(sink.get("preview-x-GelImage.png"), Some(&png[..]));
    }

    #[test]
    fn test_table_requires_exactly_one_table() {
        for body in ["", "<Row/>", "<Table/><Table/>"] {
            let xml = format!("<Preview><SamplesInfo>{body}</SamplesInfo></Preview>");
            let err = walk(&schema::PREVIEW, &xml).unwrap_err();
            assert!(
                matches!(err, XadError::UnexpectedNode { .. }),
                "body {body:?} gave {err:?}"
            );
        }
    }
}
