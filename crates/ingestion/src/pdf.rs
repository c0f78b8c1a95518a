//! PDF text extraction module
//!
//! Extracts text page by page using lopdf. Pages that yield no text, or
//! whose content stream cannot be decoded, are skipped.

use crate::errors::IngestionError;
use std::path::Path;
use tracing::{debug, warn};

/// Extract text content from a PDF file, one entry per page joined by newlines
pub fn extract_text_from_pdf(path: &Path) -> Result<String, IngestionError> {
    let doc = lopdf::Document::load(path).map_err(|e| IngestionError::PdfParseError {
        path: path.display().to_string(),
        message: format!("Failed to load PDF: {}", e),
    })?;

    let pages = doc.get_pages();

    debug!(page_count = pages.len(), "Extracting text from PDF");

    let mut page_texts = Vec::with_capacity(pages.len());

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => {
                let text = text.trim_end_matches(['\n', '\r']);
                if text.trim().is_empty() {
                    debug!(page = page_num, "Page has no extractable text, skipping");
                    continue;
                }
                page_texts.push(text.to_string());
            }
            Err(e) => {
                warn!(page = page_num, error = %e, "Failed to extract text from page, skipping");
            }
        }
    }

    let text = page_texts.join("\n");

    debug!(
        pages_with_text = page_texts.len(),
        text_len = text.len(),
        "Text extraction complete"
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_pdf;
    use std::io::Write;

    #[test]
    fn test_pages_joined_and_empty_pages_skipped() {
        let file = write_pdf(&["Alpha", "", "Beta"]);
        let text = extract_text_from_pdf(file.path()).unwrap();
        assert_eq!(text, "Alpha\nBeta");
    }

    #[test]
    fn test_pdf_without_text() {
        let file = write_pdf(&[""]);
        assert_eq!(extract_text_from_pdf(file.path()).unwrap(), "");
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 truncated nonsense").unwrap();

        let err = extract_text_from_pdf(file.path()).unwrap_err();
        assert!(matches!(err, IngestionError::PdfParseError { .. }));
        assert!(err.to_string().contains("Failed to load PDF"));
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let err = extract_text_from_pdf(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, IngestionError::PdfParseError { .. }));
    }
}
