//! AnalystForge Context Engine
//!
//! Single-document analysis agent providing:
//! - Content store holding the one loaded document
//! - Document summaries and chart planning
//! - Prompt context assembly
//! - LLM question answering with an append-only analysis history

pub mod agent;
pub mod assembler;
pub mod history;
pub mod pipeline;
pub mod summarizer;
pub mod visualization;

pub use agent::AnalystAgent;
pub use history::{AnalysisHistory, AnalysisRecord};
pub use pipeline::{QaAnswer, QuantitativeAnswer, PARSE_FAILURE_ANSWER};
pub use summarizer::Summary;
pub use visualization::{ChartKind, VisualizationSpec};

#[cfg(test)]
pub(crate) mod testing {
    use analystforge_common::completion::{
        CompletionClient, CompletionRequest, CompletionResponse, TransportError,
    };
    use std::sync::Mutex;

    /// Client that replays one fixed reply and records every request
    pub struct ScriptedClient {
        reply: Result<CompletionResponse, TransportError>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        pub fn replying(reply: Result<CompletionResponse, TransportError>) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn answering(content: &str) -> Self {
            Self::replying(Ok(CompletionResponse::with_content(content)))
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl CompletionClient for ScriptedClient {
        fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
