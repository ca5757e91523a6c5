//! Text encoding fallback for ground-truth files.
//!
//! Annotation files come from several labelling tools and are not always
//! UTF-8. A file is decoded by trying an ordered list of candidate
//! encodings and keeping the first one that decodes without error.
//!
//! Supported candidates:
//! - UTF-8 (a leading byte-order mark is removed)
//! - Latin-1 / ISO-8859-1 (every byte maps to U+0000..U+00FF)
//! - Windows-1252

use std::fmt;
use std::str::FromStr;

use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::error::GtPrepError;

/// UTF-8 BOM: EF BB BF
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A candidate text encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Cp1252,
    Iso8859_1,
}

impl TextEncoding {
    /// Default fallback order.
    pub const DEFAULT_CANDIDATES: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
        TextEncoding::Iso8859_1,
    ];

    /// Canonical label, as accepted in configuration and shown in reports.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Decodes `bytes`, returning `None` if they are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|text| text.into_owned())
            }
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Some(encoding_rs::mem::decode_latin1(bytes).into_owned())
            }
            TextEncoding::Cp1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = GtPrepError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "l1" => Ok(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Iso8859_1),
            _ => Err(GtPrepError::UnknownEncoding(label.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = GtPrepError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(encoding: TextEncoding) -> Self {
        encoding.name().to_string()
    }
}

/// Decodes `bytes` with the first candidate that accepts them.
pub fn decode_with_fallback(
    bytes: &[u8],
    candidates: &[TextEncoding],
) -> Option<(TextEncoding, String)> {
    candidates
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
}

/// Comma-separated candidate names, for messages.
pub fn candidate_names(candidates: &[TextEncoding]) -> String {
    candidates
        .iter()
        .map(TextEncoding::name)
        .collect::<Vec<_>>()
        .join(", ")
}
