use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use xadder::comment::CommentRecord;
use xadder::document::Value;
use xadder::packed::PackedArray;
use xadder::reader::{DecodeOptions, XadFile, XadReader};
use xadder::sink::{BlobSink, DirectorySink, DiscardSink};

use super::config::Config;

/// Decode an XAD file and print it as a text summary or JSON
pub fn run(
    file: PathBuf,
    json: bool,
    images: Option<PathBuf>,
    max_inflated_bytes: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let json = json || config.decode.json.unwrap_or(false);
    let images = images.or(config.decode.images_dir);
    let mut options = DecodeOptions::default();
    if let Some(limit) = max_inflated_bytes.or(config.decode.max_inflated_bytes) {
        options = options.with_max_inflated_bytes((limit > 0).then_some(limit));
    }

    info!("Decoding {}", file.display());
    let mut sink: Box<dyn BlobSink> = match images {
        Some(dir) => Box::new(DirectorySink::new(dir)),
        None => Box::new(DiscardSink),
    };

    let decoded = XadReader::new(options)
        .read_path(&file, sink.as_mut())
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    if json {
        let text = serde_json::to_string_pretty(&decoded).context("Failed to serialize JSON")?;
        println!("{text}");
    } else {
        print_summary(&decoded);
    }

    Ok(())
}

fn print_summary(file: &XadFile) {
    println!("Comments:");
    for comment in &file.comments {
        println!("  {}", describe_comment(comment));
    }
    println!();

    let header = &file.payload.header;
    println!("Payload header: {:?} {:?}", header.values, header.label());
    println!("Payload footer: {}", hex(&file.payload.footer));
    println!();

    for (path, value) in file.chipset().paths() {
        println!("{path}: {}", describe_value(value));
    }
}

fn describe_comment(comment: &CommentRecord) -> String {
    match comment {
        CommentRecord::TaggedBlob {
            uuid,
            sequence,
            bytes,
        } => format!("comment tag {uuid} #{sequence}: {} bytes", bytes.len()),
        CommentRecord::PreviewBundle {
            uuid,
            preamble,
            separator,
            document,
        } => format!(
            "preview information {uuid}: preamble {}, {separator:?} separator, title {:?}",
            hex(preamble),
            document.text("Title").unwrap_or_default()
        ),
        CommentRecord::HeaderBundle { uuid, header, extra } => format!(
            "header information {uuid}: {:?} {:?} (+{} bytes)",
            header.values,
            header.label(),
            extra.len()
        ),
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Text(text) => format!("{text:?}"),
        Value::ScriptText(text) => format!("script, {} chars", text.chars().count()),
        Value::Packed(array) => describe_packed(array),
        Value::Fragment(xml) => format!("XML fragment, {} bytes", xml.len()),
        Value::Table(xml) => format!("table, {} bytes", xml.len()),
        Value::Blob { name, len } => format!("image {name} ({len} bytes)"),
        Value::Element(element) => format!("<{}> with {} entries", element.name, element.entries.len()),
    }
}

fn describe_packed(array: &PackedArray) -> String {
    const SHOWN: usize = 4;
    let head: Vec<String> = match array {
        PackedArray::Float32(v) => v.iter().take(SHOWN).map(|x| x.to_string()).collect(),
        PackedArray::Int16(v) => v.iter().take(SHOWN).map(|x| x.to_string()).collect(),
        PackedArray::UInt8(v) => v.iter().take(SHOWN).map(|x| x.to_string()).collect(),
    };
    let ellipsis = if array.len() > SHOWN { ", ..." } else { "" };
    format!(
        "{} x {} [{}{ellipsis}]",
        array.len(),
        array.value_type().vartype(),
        head.join(", ")
    )
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
