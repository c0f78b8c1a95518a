//! Configuration management for AnalystForge
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values
//!
//! The completion-service credential additionally falls back to
//! `TOGETHER_API_KEY`, which is what hosted deployments export.

use crate::errors::{AppError, Result};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable consulted when `llm.api_key` is not configured
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Completion service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Completion provider: together, openai, mock
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key for the completion service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum output tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds. Unset means the request may block
    /// indefinitely; timeouts are the caller's policy.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_provider() -> String { "together".to_string() }
fn default_model() -> String { crate::DEFAULT_MODEL.to_string() }
fn default_max_tokens() -> u32 { crate::DEFAULT_MAX_TOKENS }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }
fn default_service_name() -> String { "analystforge".to_string() }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            api_base: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: 0,
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("llm.provider", default_provider())?
            .set_default("llm.model", default_model())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__LLM__MODEL=meta-llama/Llama-3.3-70B-Instruct-Turbo
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.llm.apply_env_fallback();
        Ok(config)
    }

    /// Load from a specific configuration file
    pub fn from_file(path: &str) -> std::result::Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.llm.apply_env_fallback();
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Fill a missing API key from `TOGETHER_API_KEY`
    fn apply_env_fallback(&mut self) {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            self.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
    }

    /// The API key, required for every remote provider
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(AppError::Configuration {
                message: format!(
                    "{} not found in .env file or provided (provider: {})",
                    API_KEY_ENV, self.provider
                ),
            }),
        }
    }

    /// Base URL of the chat-completions API for the configured provider
    pub fn api_base(&self) -> &str {
        if let Some(base) = self.api_base.as_deref() {
            return base;
        }
        match self.provider.as_str() {
            "openai" => "https://api.openai.com/v1",
            _ => "https://api.together.xyz/v1",
        }
    }

    /// Get request timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, crate::DEFAULT_MODEL);
        assert_eq!(config.llm.max_tokens, 1000);
        assert!(config.llm.timeout().is_none());
        assert_eq!(config.observability.metrics_port, 0);
    }

    #[test]
    fn test_api_base_by_provider() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.api_base(), "https://api.together.xyz/v1");

        llm.provider = "openai".to_string();
        assert_eq!(llm.api_base(), "https://api.openai.com/v1");

        llm.api_base = Some("http://localhost:8000/v1".to_string());
        assert_eq!(llm.api_base(), "http://localhost:8000/v1");
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let llm = LlmConfig {
            api_key: Some(String::new()),
            ..LlmConfig::default()
        };
        let err = llm.require_api_key().unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_mock_provider_needs_no_key() {
        let llm = LlmConfig {
            provider: "mock".to_string(),
            api_key: None,
            ..LlmConfig::default()
        };
        assert!(crate::completion::create_client(&llm).is_ok());
    }
}
