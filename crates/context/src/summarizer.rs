//! Document summaries
//!
//! One summary shape per document variant. Summaries are recomputed on
//! every call and depend only on the loaded document.

use analystforge_common::document::{char_prefix, DType, Document, Record, HEAD_ROWS};
use analystforge_common::errors::{AppError, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Characters of text shown in a text summary preview
pub const PREVIEW_CHARS: usize = 500;

/// Fixed message for image documents
pub const IMAGE_SUMMARY_MESSAGE: &str =
    "Image summary is not available. Ask questions about the image content.";

/// Variant-specific summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Summary {
    Tabular(TabularSummary),
    Text(TextSummary),
    Image(ImageSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub missing_per_column: IndexMap<String, usize>,
    pub dtype_per_column: IndexMap<String, DType>,
    pub sample_rows: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    pub char_length: usize,
    pub word_count: usize,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub message: String,
}

/// Summarize the loaded document
pub fn summarize(document: Option<&Document>) -> Result<Summary> {
    let document = document.ok_or(AppError::NoDataLoaded)?;

    let summary = match document {
        Document::Tabular(table) => {
            let (row_count, column_count) = table.shape();
            Summary::Tabular(TabularSummary {
                row_count,
                column_count,
                missing_per_column: table
                    .columns()
                    .iter()
                    .map(|c| (c.name.clone(), c.missing_count()))
                    .collect(),
                dtype_per_column: table
                    .columns()
                    .iter()
                    .map(|c| (c.name.clone(), c.dtype))
                    .collect(),
                sample_rows: table.head(HEAD_ROWS),
            })
        }
        Document::Text(text) => Summary::Text(TextSummary {
            char_length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            preview: char_prefix(text, PREVIEW_CHARS).to_string(),
        }),
        Document::Image(_) => Summary::Image(ImageSummary {
            message: IMAGE_SUMMARY_MESSAGE.to_string(),
        }),
    };

    Ok(summary)
}
