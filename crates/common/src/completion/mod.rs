//! Completion service abstraction
//!
//! A narrow, blocking chat-completions boundary:
//! - OpenAI-compatible HTTP client (Together, OpenAI, local gateways)
//! - Offline mock for development
//!
//! Transport failures (network, non-2xx, error objects) are reported as
//! [`TransportError`]. A reachable service whose body does not match the
//! expected shape yields an empty [`CompletionResponse`] instead, so callers
//! can tell "unreachable" from "unparseable".

use crate::config::LlmConfig;
use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Chat-completions request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: u32,
}

/// Chat-completions response body.
///
/// Every level is optional; the caller decides what a usable answer is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<CompletionChoice>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Response carrying a single answer
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: Some(vec![CompletionChoice {
                message: Some(CompletionMessage { content: Some(content.into()) }),
            }]),
        }
    }

    /// Content of the first choice, if present and non-empty
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
    }
}

/// Failure to reach the service or to get a successful reply from it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service error: {0}")]
    Service(String),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::ServiceError { message: err.to_string() }
    }
}

/// Trait for completion backends
pub trait CompletionClient {
    /// Send one request and wait for the reply
    fn send(&self, request: &CompletionRequest) -> std::result::Result<CompletionResponse, TransportError>;

    /// Short backend name, for logs
    fn name(&self) -> &str;
}

impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    fn send(&self, request: &CompletionRequest) -> std::result::Result<CompletionResponse, TransportError> {
        (**self).send(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: CompletionClient + ?Sized> CompletionClient for Box<T> {
    fn send(&self, request: &CompletionRequest) -> std::result::Result<CompletionResponse, TransportError> {
        (**self).send(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// OpenAI-compatible chat-completions client
pub struct HttpCompletionClient {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

/// Error object some providers return with a 2xx status
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: serde_json::Value,
}

impl ErrorEnvelope {
    /// `message` field, a bare string, or the error's JSON text
    fn message(&self) -> Option<String> {
        match &self.error {
            serde_json::Value::Null => None,
            serde_json::Value::String(message) => Some(message.clone()),
            other => Some(
                other
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            ),
        }
    }
}

impl HttpCompletionClient {
    /// Create a new client from the LLM configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        let endpoint = format!("{}/chat/completions", config.api_base().trim_end_matches('/'));

        Ok(Self { client, api_key, endpoint })
    }
}

impl CompletionClient for HttpCompletionClient {
    fn send(&self, request: &CompletionRequest) -> std::result::Result<CompletionResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body });
        }

        parse_body(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Decode a 2xx body. Error objects are transport failures; any other
/// shape mismatch decodes to an empty response.
fn parse_body(body: &str) -> std::result::Result<CompletionResponse, TransportError> {
    if let Some(message) = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message())
    {
        return Err(TransportError::Service(message));
    }

    match serde_json::from_str::<CompletionResponse>(body) {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::warn!(error = %e, body_len = body.len(), "Unparseable completion response");
            Ok(CompletionResponse::default())
        }
    }
}

/// Offline client that echoes the question back.
///
/// Used for development without an API key.
pub struct MockCompletionClient;

impl CompletionClient for MockCompletionClient {
    fn send(&self, request: &CompletionRequest) -> std::result::Result<CompletionResponse, TransportError> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let question = prompt
            .rfind("\nQuestion: ")
            .map(|idx| &prompt[idx + "\nQuestion: ".len()..])
            .unwrap_or(prompt);

        Ok(CompletionResponse::with_content(format!(
            "Based on the provided context, here is an answer to your question: {}\n\n\
            [Mock response - completion API key not configured]",
            question.trim()
        )))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Create a completion client based on configuration
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn CompletionClient>> {
    match config.provider.as_str() {
        "together" | "openai" => Ok(Box::new(HttpCompletionClient::new(config)?)),
        "mock" => Ok(Box::new(MockCompletionClient)),
        other => Err(AppError::Configuration {
            message: format!("Unknown completion provider: {}", other),
        }),
    }
}
