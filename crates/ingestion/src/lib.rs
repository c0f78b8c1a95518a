//! AnalystForge Ingestion
//!
//! Turns a file on disk into a [`Document`](analystforge_common::Document):
//! 1. Resolves the format from the file extension
//! 2. Runs the matching parser (CSV, XLSX, TXT, DOCX, PDF, PNG/JPEG)
//! 3. Reports a load outcome, or a structured error

pub mod docx;
pub mod errors;
pub mod image;
pub mod loader;
pub mod pdf;
pub mod tabular;

pub use errors::IngestionError;
pub use loader::{load_document, DocumentFormat, LoadOutcome, LoadedDocument};
