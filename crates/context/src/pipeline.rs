//! Question answering pipeline
//!
//! Builds the prompt from prior conversation turns and the assembled
//! context, sends it to the completion service, and records the answer in
//! the analysis history.
//!
//! ## Outcomes
//!
//! - usable content: returned and recorded
//! - reachable service without usable content: [`PARSE_FAILURE_ANSWER`] is
//!   returned and recorded
//! - transport failure: `ServiceError`, nothing recorded

use crate::agent::AnalystAgent;
use analystforge_common::completion::{ChatTurn, CompletionClient, CompletionRequest};
use analystforge_common::errors::{AppError, Result};
use analystforge_common::metrics;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Answer returned when the service replied without usable content
pub const PARSE_FAILURE_ANSWER: &str = "Could not parse response";

/// Fixed quantitative section of every answer
pub const NO_QUANTITATIVE_DETAILS: &str = "No specific quantitative data extracted.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantitativeAnswer {
    pub details: String,
}

impl Default for QuantitativeAnswer {
    fn default() -> Self {
        Self {
            details: NO_QUANTITATIVE_DETAILS.to_string(),
        }
    }
}

/// Answer to one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub quantitative: QuantitativeAnswer,
}

/// Prior turns followed by one user turn carrying the context and question
pub fn build_messages(history: &[ChatTurn], context: &str, question: &str) -> Vec<ChatTurn> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.extend_from_slice(history);
    messages.push(ChatTurn::user(format!(
        "Context: {}\nQuestion: {}",
        context, question
    )));
    messages
}

impl<C: CompletionClient> AnalystAgent<C> {
    /// Answer a question about the loaded document.
    ///
    /// `history` holds caller-supplied conversation turns, sent before the
    /// question in the order given. Questions may be asked with nothing
    /// loaded; the context is then empty.
    #[instrument(skip_all, fields(session = %self.session_id, turns = history.len()))]
    pub fn answer(&mut self, question: &str, history: &[ChatTurn]) -> Result<QaAnswer> {
        let context = self.assemble_context();

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(history, &context, question),
            max_tokens: self.max_tokens,
        };

        let start = Instant::now();
        let response = self.client.send(&request);
        let elapsed = start.elapsed().as_secs_f64();

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                metrics::record_question(elapsed, &self.model, "error");
                warn!(error = %e, client = self.client.name(), "Completion request failed");
                return Err(AppError::from(e));
            }
        };

        let (answer, status) = match response.first_content() {
            Some(content) => (content.to_string(), "answered"),
            None => {
                warn!("Completion response had no usable content");
                (PARSE_FAILURE_ANSWER.to_string(), "sentinel")
            }
        };

        metrics::record_question(elapsed, &self.model, status);

        let record = self
            .history
            .append(question.to_string(), answer.clone(), context);
        info!(
            status,
            answer_chars = record.answer.chars().count(),
            context_chars = record.context.chars().count(),
            duration_ms = (elapsed * 1000.0) as u64,
            "Question answered"
        );

        Ok(QaAnswer {
            answer,
            quantitative: QuantitativeAnswer::default(),
        })
    }
}
