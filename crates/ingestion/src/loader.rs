//! Document loader
//!
//! Maps a file extension to exactly one parser and returns the parsed
//! [`Document`]. The mapping is closed: anything outside
//! [`DocumentFormat`] is `UnsupportedFormat`.

use crate::docx::extract_text_from_docx;
use crate::errors::IngestionError;
use crate::image::encode_image;
use crate::pdf::extract_text_from_pdf;
use crate::tabular::{read_csv, read_xlsx};
use analystforge_common::document::{Document, DocumentKind};
use analystforge_common::errors::{AppError, Result};
use analystforge_common::metrics;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Csv,
    Xlsx,
    Txt,
    Docx,
    Pdf,
    Png,
    Jpeg,
}

impl DocumentFormat {
    /// Match a bare extension (no dot), case-insensitively
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(DocumentFormat::Csv),
            "xlsx" => Some(DocumentFormat::Xlsx),
            "txt" => Some(DocumentFormat::Txt),
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            "png" => Some(DocumentFormat::Png),
            "jpg" | "jpeg" => Some(DocumentFormat::Jpeg),
            _ => None,
        }
    }

    /// Resolve the format of `path` from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_extension(&extension).ok_or_else(|| AppError::UnsupportedFormat {
            extension: if extension.is_empty() {
                String::new()
            } else {
                format!(".{}", extension.to_ascii_lowercase())
            },
        })
    }

    /// Document variant this format produces
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentFormat::Csv | DocumentFormat::Xlsx => DocumentKind::Tabular,
            DocumentFormat::Txt | DocumentFormat::Docx | DocumentFormat::Pdf => DocumentKind::Text,
            DocumentFormat::Png | DocumentFormat::Jpeg => DocumentKind::Image,
        }
    }

    fn parse(&self, path: &Path) -> std::result::Result<Document, IngestionError> {
        match self {
            DocumentFormat::Csv => read_csv(path).map(Document::Tabular),
            DocumentFormat::Xlsx => read_xlsx(path).map(Document::Tabular),
            DocumentFormat::Txt => read_utf8_text(path).map(Document::Text),
            DocumentFormat::Docx => extract_text_from_docx(path).map(Document::Text),
            DocumentFormat::Pdf => extract_text_from_pdf(path).map(Document::Text),
            DocumentFormat::Png => encode_image(path, "image/png").map(Document::Image),
            DocumentFormat::Jpeg => encode_image(path, "image/jpeg").map(Document::Image),
        }
    }

    fn success_message(&self, document: &Document) -> String {
        match (self, document) {
            (_, Document::Tabular(table)) => {
                let (rows, cols) = table.shape();
                format!("Data loaded successfully. Shape: ({}, {})", rows, cols)
            }
            (DocumentFormat::Docx, _) => "DOCX file loaded successfully.".to_string(),
            (DocumentFormat::Pdf, _) => "PDF file loaded successfully.".to_string(),
            (_, Document::Text(_)) => "Text file loaded successfully.".to_string(),
            (_, Document::Image(_)) => "Image file loaded successfully.".to_string(),
        }
    }
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadOutcome {
    pub kind: DocumentKind,
    pub format: DocumentFormat,
    pub message: String,
}

/// A parsed document together with its load outcome
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub outcome: LoadOutcome,
}

/// Parse the file at `path` into a [`Document`].
///
/// Fails with `UnsupportedFormat` for unknown extensions and
/// `ParseFailure` for anything the parser rejects (including I/O errors).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_document(path: &Path) -> Result<LoadedDocument> {
    let result = DocumentFormat::from_path(path)
        .and_then(|format| format.parse(path).map(|doc| (format, doc)).map_err(AppError::from));

    match result {
        Ok((format, document)) => {
            let outcome = LoadOutcome {
                kind: document.kind(),
                format,
                message: format.success_message(&document),
            };
            metrics::record_load(outcome.kind.as_str(), true, None);
            info!(kind = %outcome.kind, format = ?format, "{}", outcome.message);
            Ok(LoadedDocument { document, outcome })
        }
        Err(e) => {
            metrics::record_load("", false, Some(e.code().label()));
            warn!(error = %e, "Document load failed");
            Err(e)
        }
    }
}

fn read_utf8_text(path: &Path) -> std::result::Result<String, IngestionError> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| IngestionError::EncodingError {
        path: path.display().to_string(),
        message: e.utf8_error().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_docx, write_pdf, write_xlsx};
    use std::io::Write;

    fn write_temp(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_extension_dispatch_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("Report.CSV")).unwrap(),
            DocumentFormat::Csv
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("photo.JpG")).unwrap(),
            DocumentFormat::Jpeg
        );
        assert_eq!(DocumentFormat::Jpeg.kind(), DocumentKind::Image);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentFormat::from_path(Path::new("archive.tar.GZ")).unwrap_err();
        assert_eq!(err, AppError::UnsupportedFormat { extension: ".gz".to_string() });

        let err = DocumentFormat::from_path(Path::new("Makefile")).unwrap_err();
        assert_eq!(err, AppError::UnsupportedFormat { extension: String::new() });
    }

    #[test]
    fn test_load_text() {
        let file = write_temp(".txt", b"Hello world");
        let loaded = load_document(file.path()).unwrap();

        assert_eq!(loaded.document, Document::Text("Hello world".to_string()));
        assert_eq!(loaded.outcome.message, "Text file loaded successfully.");
    }

    #[test]
    fn test_load_csv_reports_shape() {
        let file = write_temp(".csv", b"a,b\n1,2\n3,4\n5,6\n");
        let loaded = load_document(file.path()).unwrap();

        assert_eq!(loaded.outcome.kind, DocumentKind::Tabular);
        assert_eq!(loaded.outcome.message, "Data loaded successfully. Shape: (3, 2)");
    }

    #[test]
    fn test_load_xlsx_reports_shape() {
        let file = write_xlsx(&[&["region", "sales"], &["north", "12.5"], &["south", "7"]]);
        let loaded = load_document(file.path()).unwrap();

        assert_eq!(loaded.outcome.format, DocumentFormat::Xlsx);
        assert_eq!(loaded.outcome.message, "Data loaded successfully. Shape: (2, 2)");
        let table = loaded.document.as_table().unwrap();
        assert_eq!(table.numeric_columns().count(), 1);
    }

    #[test]
    fn test_load_docx() {
        let file = write_docx(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Board minutes</w:t></w:r></w:p><w:p><w:r><w:t>Approved</w:t></w:r></w:p></w:body></w:document>"#,
        );
        let loaded = load_document(file.path()).unwrap();

        assert_eq!(loaded.outcome.kind, DocumentKind::Text);
        assert_eq!(loaded.outcome.message, "DOCX file loaded successfully.");
        assert_eq!(loaded.document, Document::Text("Board minutes\nApproved".to_string()));
    }

    #[test]
    fn test_load_pdf() {
        let file = write_pdf(&["Alpha", "", "Beta"]);
        let loaded = load_document(file.path()).unwrap();

        assert_eq!(loaded.outcome.format, DocumentFormat::Pdf);
        assert_eq!(loaded.outcome.message, "PDF file loaded successfully.");
        assert_eq!(loaded.document, Document::Text("Alpha\nBeta".to_string()));
    }

    #[test]
    fn test_load_image() {
        let file = write_temp(".jpeg", &[0xFF, 0xD8, 0xFF]);
        let loaded = load_document(file.path()).unwrap();

        let image = loaded.document.as_image().unwrap();
        assert_eq!(image.media_type, "image/jpeg");
        assert_eq!(image.base64, "/9j/");
    }

    #[test]
    fn test_invalid_utf8_text_is_parse_failure() {
        let file = write_temp(".txt", &[0x48, 0xFF, 0x49]);
        let err = load_document(file.path()).unwrap_err();
        assert!(matches!(err, AppError::ParseFailure { .. }));
    }

    #[test]
    fn test_missing_file_is_parse_failure() {
        let err = load_document(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, AppError::ParseFailure { .. }));
    }
}
