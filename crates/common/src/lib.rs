//! AnalystForge Common Library
//!
//! Shared code for the AnalystForge crates including:
//! - Unified document model (tabular, text, image)
//! - Completion service client abstraction
//! - Error types and handling
//! - Configuration management
//! - Metrics and tracing setup

pub mod completion;
pub mod config;
pub mod document;
pub mod errors;
pub mod metrics;
pub mod telemetry;

// Re-export commonly used types
pub use completion::{ChatTurn, CompletionClient, Role};
pub use config::AppConfig;
pub use document::{Document, DocumentKind};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default completion model
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8";

/// Default maximum output tokens per answer
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
