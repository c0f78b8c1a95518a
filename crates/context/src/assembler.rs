//! Context assembly
//!
//! Renders the loaded document into the bounded text block embedded in
//! every completion prompt. Assembly never fails: with nothing loaded the
//! context is empty.

use analystforge_common::document::{char_prefix, Document, HEAD_ROWS};

/// Characters of text carried into the prompt
pub const CONTEXT_TEXT_CHARS: usize = 1000;

/// Placeholder for image documents, which have no text rendering
pub const IMAGE_PLACEHOLDER: &str = "Image content is available but cannot be displayed in text form.";

/// Build the context block for the loaded document.
///
/// Segments are emitted in the fixed order tabular, text, image.
pub fn assemble_context(document: Option<&Document>) -> String {
    let mut context = String::new();

    if let Some(table) = document.and_then(Document::as_table) {
        let (rows, cols) = table.shape();
        context.push_str(&format!(
            "Dataset Info: {}\nShape: ({}, {})\n",
            table.render_head(HEAD_ROWS),
            rows,
            cols
        ));
    }

    if let Some(text) = document.and_then(Document::as_text) {
        if !text.is_empty() {
            context.push_str(&format!(
                "Text Content: {}...\n",
                char_prefix(text, CONTEXT_TEXT_CHARS)
            ));
        }
    }

    if document.and_then(Document::as_image).is_some() {
        context.push_str(IMAGE_PLACEHOLDER);
        context.push('\n');
    }

    context
}
