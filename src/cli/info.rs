use anyhow::{Context, Result};
use std::path::PathBuf;

use xadder::reader::XadReader;
use xadder::sink::DiscardSink;

/// Display a short summary of an XAD file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let decoded = XadReader::default()
        .read_path(&file, &mut DiscardSink)
        .with_context(|| format!("Failed to decode {}", file.display()))?;
    let chipset = decoded.chipset();

    println!("XAD File Information");
    println!("====================");
    println!("File: {}", file.display());
    println!();

    let header = &decoded.payload.header;
    println!("Payload Header:");
    for (i, value) in header.values.iter().enumerate() {
        println!("  int[{i}]: {value}");
    }
    println!("  label: {}", header.label());
    println!();

    println!("Comments:");
    for comment in &decoded.comments {
        println!("  {} ({})", comment.kind(), comment.uuid());
    }
    println!();

    println!("Chipset:");
    for key in ["FileType", "Type", "Class", "DataType"] {
        if let Some(text) = chipset.text(key) {
            println!("  {key}: {text}");
        }
    }
    println!("  Chips: {}", decoded.chips().count());
    for chip in decoded.chips() {
        println!("    {}", chip.text("ID").unwrap_or("<no ID>"));
    }

    Ok(())
}
