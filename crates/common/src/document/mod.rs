//! Unified content representation
//!
//! Every supported file format is parsed into exactly one [`Document`]
//! variant. The analysis agent holds at most one of these at a time.

mod table;

pub use table::{CellValue, Column, DType, Record, Table, HEAD_ROWS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A loaded document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Spreadsheet-like data with named, typed columns
    Tabular(Table),
    /// Free text (plain text, DOCX paragraphs, PDF pages)
    Text(String),
    /// Raw image bytes, kept base64-encoded for transport
    Image(ImageContent),
}

/// Image payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// MIME type derived from the file extension
    pub media_type: String,
    /// Standard base64 encoding of the file bytes
    pub base64: String,
}

/// Document variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Tabular,
    Text,
    Image,
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Tabular(_) => DocumentKind::Tabular,
            Document::Text(_) => DocumentKind::Text,
            Document::Image(_) => DocumentKind::Image,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Document::Tabular(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Document::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match self {
            Document::Image(image) => Some(image),
            _ => None,
        }
    }
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Tabular => "tabular",
            DocumentKind::Text => "text",
            DocumentKind::Image => "image",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First `n` Unicode scalar values of `text`
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
