use std::io::Write;

use base64::prelude::*;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use tempfile::tempdir;

use super::*;
use crate::encoding::encode_utf16le;
use crate::header::HEADER_LEN;
use crate::sink::{DiscardSink, MemorySink};

fn compressed_data(chipset_xml: &str) -> String {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&encode_utf16le(chipset_xml)).unwrap();
    let mut raw = vec![0u8; HEADER_LEN];
    raw.extend(encoder.finish().unwrap());
    raw.extend_from_slice(&[0u8; 9]);
    BASE64_STANDARD.encode(raw)
}

fn xad(comments: &[String], chipset_xml: &str) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n");
    for comment in comments {
        doc.push_str(&format!("<!--{comment}-->\r\n"));
    }
    doc.push_str(&format!(
        "<compressed_data>{}</compressed_data>\r\n",
        compressed_data(chipset_xml)
    ));
    doc
}

const MINIMAL: &str = "<Chipset><FileType>XAD</FileType></Chipset>";

#[test]
fn test_read_minimal() -> Result<()> {
    let file = XadReader::default().read_str(&xad(&[], MINIMAL), &mut DiscardSink)?;
    assert!(file.comments.is_empty());
    assert_eq!(file.chipset().text("FileType"), Some("XAD"));
    assert_eq!(file.chips().count(), 0);
    Ok(())
}

#[test]
fn test_read_comments_in_order() -> Result<()> {
    let header = BASE64_STANDARD.encode([0u8; HEADER_LEN]);
    let comments = vec![
        "Do not edit this comment tag:0123-ab:1:first".to_string(),
        format!("Do not edit this header information:cd-45:{header}"),
    ];
    let file = XadReader::default().read_str(&xad(&comments, MINIMAL), &mut DiscardSink)?;

    let kinds: Vec<_> = file.comments.iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, ["comment tag", "header information"]);
    assert_eq!(file.comments[0].uuid(), "0123-ab");
    assert_eq!(file.comments[1].uuid(), "cd-45");
    Ok(())
}

#[test]
fn test_chips_iterates_every_chip() -> Result<()> {
    let chipset = "<Chipset><Chips>\
                   <Chip><ID>a</ID></Chip>\
                   <Chip><ID>b</ID></Chip>\
                   </Chips></Chipset>";
    let file = XadReader::default().read_str(&xad(&[], chipset), &mut DiscardSink)?;
    let ids: Vec<_> = file.chips().filter_map(|c| c.text("ID")).collect();
    assert_eq!(ids, ["a", "b"]);
    Ok(())
}

#[test]
fn test_missing_compressed_data() {
    let doc = "<?xml version=\"1.0\"?>\n<!--comment tag:ab:1:x-->\n";
    let err = XadReader::default().read_str(doc, &mut DiscardSink).unwrap_err();
    assert!(matches!(err, XadError::ParseFailure(_)));
}

#[test]
fn test_second_compressed_data_rejected() {
    let body = compressed_data(MINIMAL);
    let doc = format!(
        "<compressed_data>{body}</compressed_data>\n<compressed_data>{body}</compressed_data>"
    );
    let err = XadReader::default().read_str(&doc, &mut DiscardSink).unwrap_err();
    assert!(matches!(
        err,
        XadError::UnexpectedNode { ref node, .. } if node == "<compressed_data>"
    ));
}

#[test]
fn test_unknown_top_level_element() {
    let doc = "<chipdata/>";
    let err = XadReader::default().read_str(doc, &mut DiscardSink).unwrap_err();
    match err {
        XadError::UnexpectedNode {
            node,
            context,
            offset,
            expected,
        } => {
            assert_eq!(node, "<chipdata>");
            assert_eq!(context, "XAD document");
            assert_eq!(offset, Some(0));
            assert_eq!(expected, vec!["#comment", "compressed_data"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unclassified_comment_is_fatal() {
    let doc = xad(&["hand edited".to_string()], MINIMAL);
    let err = XadReader::default().read_str(&doc, &mut DiscardSink).unwrap_err();
    match err {
        XadError::UnexpectedNode { node, offset, .. } => {
            assert!(node.starts_with("#comment"));
            assert_eq!(offset, Some(doc.find("<!--hand").unwrap() as u64));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_stray_top_level_text_reports_offset() {
    let doc = format!(
        "junk<compressed_data>{}</compressed_data>",
        compressed_data(MINIMAL)
    );
    match XadReader::default().read_str(&doc, &mut DiscardSink).unwrap_err() {
        XadError::UnexpectedNode { node, offset, .. } => {
            assert!(node.starts_with("#text"));
            assert_eq!(offset, Some(0));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_top_level_indentation_is_ignored() -> Result<()> {
    let header = BASE64_STANDARD.encode([0u8; HEADER_LEN]);
    let doc = format!(
        "<?xml version=\"1.0\"?>\n\t<!--Do not edit this header information:ab:{header}-->\n  \
         <compressed_data>{}</compressed_data>\n\t",
        compressed_data(MINIMAL)
    );
    let file = XadReader::default().read_str(&doc, &mut DiscardSink)?;
    assert_eq!(file.comments.len(), 1);
    assert_eq!(file.chipset().text("FileType"), Some("XAD"));
    Ok(())
}

#[test]
fn test_inflate_cap_from_options() {
    let big = format!("<Chipset><LogBook>{}</LogBook></Chipset>", "x".repeat(10_000));
    let reader = XadReader::new(DecodeOptions::default().with_max_inflated_bytes(Some(1024)));
    let err = reader.read_str(&xad(&[], &big), &mut DiscardSink).unwrap_err();
    assert!(matches!(err, XadError::InflateLimitExceeded { limit: 1024 }));

    let reader = XadReader::new(DecodeOptions::default().with_max_inflated_bytes(None));
    assert!(reader.read_str(&xad(&[], &big), &mut DiscardSink).is_ok());
}

#[test]
fn test_default_options() {
    assert_eq!(
        XadReader::default().options().max_inflated_bytes,
        Some(DEFAULT_MAX_INFLATED_BYTES)
    );
}

#[test]
fn test_read_bytes_rejects_invalid_utf8() {
    let err = XadReader::default()
        .read_bytes(b"<compressed_data>\xff</compressed_data>", &mut DiscardSink)
        .unwrap_err();
    assert!(matches!(err, XadError::EncodingFailure(_)));
}

#[test]
fn test_read_path_with_preview_image() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let png = b"\x89PNG\r\n\x1a\n\0\0";
    let preview_xml = format!(
        "<?xml version=\"1.0\"?>\r\n<Preview><Title>Run</Title><GelImage>{}</GelImage></Preview>",
        BASE64_STANDARD.encode(png)
    );
    let bundle = BASE64_STANDARD.encode(encode_utf16le(&format!("\u{1}\u{1}{preview_xml}\0")));
    let comments = vec![format!("Do not edit this preview information:9a-bc:{bundle}")];

    let dir = tempdir()?;
    let path = dir.path().join("run.xad");
    std::fs::write(&path, xad(&comments, MINIMAL))?;

    let mut sink = MemorySink::new();
    let file = XadReader::default().read_path(&path, &mut sink)?;

    assert_eq!(file.comments.len(), 1);
    assert_eq!(sink.get("preview-9a-bc-GelImage.png"), Some(&png[..]));
    Ok(())
}
