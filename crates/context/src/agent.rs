//! Analysis agent session
//!
//! An [`AnalystAgent`] owns the content store (at most one loaded document)
//! and the analysis history for its whole lifetime. Mutating operations take
//! `&mut self`, so one agent serves one session with one operation in
//! flight at a time.

use crate::assembler;
use crate::history::{AnalysisHistory, AnalysisRecord};
use crate::summarizer::{self, Summary};
use crate::visualization::{self, VisualizationSpec};
use analystforge_common::completion::{create_client, CompletionClient};
use analystforge_common::config::LlmConfig;
use analystforge_common::document::{Document, DocumentKind};
use analystforge_common::errors::Result;
use analystforge_common::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use analystforge_ingestion::{load_document, LoadOutcome, LoadedDocument};
use std::path::Path;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Stateful single-document analysis agent
pub struct AnalystAgent<C = Box<dyn CompletionClient>> {
    pub(crate) session_id: Uuid,
    pub(crate) document: Option<Document>,
    pub(crate) history: AnalysisHistory,
    pub(crate) client: C,
    pub(crate) model: String,
    pub(crate) max_tokens: u32,
}

impl AnalystAgent {
    /// Create an agent with the completion client described by `config`
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = create_client(config)?;
        Ok(Self::new(client, config.model.clone(), config.max_tokens))
    }
}

impl<C: CompletionClient> AnalystAgent<C> {
    /// Create an agent around an existing client
    pub fn new(client: C, model: impl Into<String>, max_tokens: u32) -> Self {
        let session_id = Uuid::new_v4();
        let model = model.into();
        debug!(session = %session_id, model = %model, client = client.name(), "Analyst agent created");

        Self {
            session_id,
            document: None,
            history: AnalysisHistory::new(),
            client,
            model,
            max_tokens,
        }
    }

    /// Create an agent with the default model and output budget
    pub fn with_client(client: C) -> Self {
        Self::new(client, DEFAULT_MODEL, DEFAULT_MAX_TOKENS)
    }

    /// Load a document, replacing whatever was loaded before.
    ///
    /// On failure the previously loaded document stays in place.
    #[instrument(skip_all, fields(session = %self.session_id, path = %path.display()))]
    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome> {
        let LoadedDocument { document, outcome } = load_document(path)?;

        if let Some(previous) = self.document.replace(document) {
            debug!(previous = %previous.kind(), "Replaced previously loaded document");
        }

        Ok(outcome)
    }

    /// Structured summary of the loaded document
    pub fn summarize(&self) -> Result<Summary> {
        summarizer::summarize(self.document.as_ref())
    }

    /// Chart specifications for the loaded table
    pub fn plan_visualizations(&self) -> Result<Vec<VisualizationSpec>> {
        visualization::plan_visualizations(self.document.as_ref())
    }

    /// Prompt context for the loaded document (empty when nothing is loaded)
    pub fn assemble_context(&self) -> String {
        assembler::assemble_context(self.document.as_ref())
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_kind(&self) -> Option<DocumentKind> {
        self.document.as_ref().map(Document::kind)
    }

    /// Answered questions, oldest first
    pub fn history(&self) -> &[AnalysisRecord] {
        self.history.records()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
