//! Metadata carried in XML comments
//!
//! The instrument writes three kinds of comments around the payload, each
//! introduced by an English sentinel and a UUID:
//!
//! ```text
//! <!-- Do not edit this comment tag:<uuid>:<n>:<blob> -->
//! <!-- Do not edit this preview information:<uuid>:<base64> -->
//! <!-- Do not edit this header information:<uuid>:<base64> -->
//! ```
//!
//! Some files spell the second sentinel `preview infomation`; both are
//! accepted. Sentinels are tried most specific first.

use serde::Serialize;

use crate::document::DecodedDocument;
use crate::encoding::decode_base64;
use crate::error::{Result, XadError};
use crate::header::{DecodedHeader, HEADER_LEN};
use crate::preview::{decode_preview, PreviewSeparator};
use crate::sink::BlobSink;

/// A classified and decoded comment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentRecord {
    /// `comment tag:` blob, kept as raw bytes
    TaggedBlob {
        /// UUID token
        uuid: String,
        /// Sequence number
        sequence: u64,
        /// UTF-8 bytes of everything after the sequence number
        bytes: Vec<u8>,
    },
    /// `preview information:` bundle with its embedded document
    PreviewBundle {
        /// UUID token
        uuid: String,
        /// UTF-16LE bytes before the separator
        preamble: Vec<u8>,
        /// Which separator split preamble from document
        separator: PreviewSeparator,
        /// The decoded `Preview` document
        document: DecodedDocument,
    },
    /// `header information:` bundle
    HeaderBundle {
        /// UUID token
        uuid: String,
        /// The leading binary header
        header: DecodedHeader,
        /// Bytes after the header, structure unknown
        extra: Vec<u8>,
    },
}

impl CommentRecord {
    /// UUID token of the record
    pub fn uuid(&self) -> &str {
        match self {
            CommentRecord::TaggedBlob { uuid, .. }
            | CommentRecord::PreviewBundle { uuid, .. }
            | CommentRecord::HeaderBundle { uuid, .. } => uuid,
        }
    }

    /// Short name of the record kind
    pub fn kind(&self) -> &'static str {
        match self {
            CommentRecord::TaggedBlob { .. } => "comment tag",
            CommentRecord::PreviewBundle { .. } => "preview information",
            CommentRecord::HeaderBundle { .. } => "header information",
        }
    }
}

const TAG_SENTINELS: &[&str] = &["comment tag:"];
// "infomation" is an upstream misspelling found in real files.
const PREVIEW_SENTINELS: &[&str] = &["preview information:", "preview infomation:"];
const HEADER_SENTINELS: &[&str] = &["header information:"];

/// Fields following a sentinel
struct SentinelMatch<'a> {
    uuid: &'a str,
    sequence: Option<&'a str>,
    rest: &'a str,
}

/// Find the last occurrence of any of `sentinels` that is followed by
/// `<uuid>:` (and `<digits>:` when `with_sequence` is set)
///
/// Any text may precede the sentinel. The last viable occurrence wins so a
/// sentinel-like string inside free text before it cannot shadow it.
fn match_sentinel<'a>(text: &'a str, sentinels: &[&str], with_sequence: bool) -> Option<SentinelMatch<'a>> {
    let mut starts: Vec<usize> = sentinels
        .iter()
        .flat_map(|s| text.match_indices(s).map(|(i, m)| i + m.len()))
        .collect();
    starts.sort_unstable_by(|a, b| b.cmp(a));

    starts.into_iter().find_map(|start| {
        let after = &text[start..];
        let (uuid, after) = take_token(after, |c| c.is_ascii_digit() || ('a'..='f').contains(&c) || c == '-')?;
        if with_sequence {
            let (sequence, rest) = take_token(after, |c| c.is_ascii_digit())?;
            Some(SentinelMatch {
                uuid,
                sequence: Some(sequence),
                rest,
            })
        } else {
            Some(SentinelMatch {
                uuid,
                sequence: None,
                rest: after,
            })
        }
    })
}

/// Split a non-empty run of `accept` characters terminated by `:`
fn take_token(text: &str, accept: impl Fn(char) -> bool) -> Option<(&str, &str)> {
    let end = text.find(|c: char| !accept(c)).unwrap_or(text.len());
    if end == 0 || !text[end..].starts_with(':') {
        return None;
    }
    Some((&text[..end], &text[end + 1..]))
}

/// Classify and decode one comment body
///
/// Preview bundles are decoded all the way down; their gel image goes to
/// `sink`. A comment matching no sentinel is [`XadError::UnexpectedNode`].
pub fn decode_comment(text: &str, sink: &mut dyn BlobSink) -> Result<CommentRecord> {
    if let Some(m) = match_sentinel(text, TAG_SENTINELS, true) {
        let raw_sequence = m.sequence.unwrap_or_default();
        let sequence = raw_sequence.parse::<u64>().map_err(|_| {
            XadError::ParseFailure(format!("comment tag sequence number {raw_sequence} out of range"))
        })?;
        let bytes = m.rest.as_bytes().to_vec();
        log::debug!("comment tag {} #{} ({} bytes)", m.uuid, sequence, bytes.len());
        return Ok(CommentRecord::TaggedBlob {
            uuid: m.uuid.to_string(),
            sequence,
            bytes,
        });
    }

    if let Some(m) = match_sentinel(text, PREVIEW_SENTINELS, false) {
        let bundle = decode_preview(m.rest, m.uuid, sink)?;
        log::debug!(
            "preview information {} split on {:?}",
            m.uuid,
            bundle.separator
        );
        return Ok(CommentRecord::PreviewBundle {
            uuid: m.uuid.to_string(),
            preamble: bundle.preamble,
            separator: bundle.separator,
            document: bundle.document,
        });
    }

    if let Some(m) = match_sentinel(text, HEADER_SENTINELS, false) {
        let decoded = decode_base64(m.rest)?;
        let header = DecodedHeader::decode(&decoded)?;
        let extra = decoded[HEADER_LEN..].to_vec();
        log::debug!("header information {} ({} extra bytes)", m.uuid, extra.len());
        return Ok(CommentRecord::HeaderBundle {
            uuid: m.uuid.to_string(),
            header,
            extra,
        });
    }

    Err(XadError::unexpected(
        format!("#comment {:?}", comment_preview(text)),
        "XAD document (no known sentinel)",
    ))
}

fn comment_preview(text: &str) -> String {
    text.chars().take(60).collect()
}
