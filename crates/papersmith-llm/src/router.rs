//! Backend factory: turns a configured provider into one injected `LlmBackend`.
//! A run talks to exactly one generation backend; the handle is passed
//! explicitly to the drafter.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{
    AnthropicBackend, LlmBackend, LlmError, OllamaBackend, OpenAiBackend, OpenAiCompatibleBackend,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Ollama,
    #[serde(alias = "openai")]
    OpenAi,
    #[serde(alias = "openai_compatible")]
    OpenAiCompatible,
    Anthropic,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Ollama           => "ollama",
            BackendKind::OpenAi           => "open_ai",
            BackendKind::OpenAiCompatible => "open_ai_compatible",
            BackendKind::Anthropic        => "anthropic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// HTTP-level timeout for a single completion request.
    pub timeout: Duration,
}

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const OPENAI_URL: &str = "https://api.openai.com";
const ANTHROPIC_URL: &str = "https://api.anthropic.com";

impl BackendConfig {
    /// The base URL requests will go to, if one is known.
    pub fn endpoint(&self) -> Option<&str> {
        match self.kind {
            BackendKind::Ollama => Some(self.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)),
            BackendKind::OpenAi => Some(OPENAI_URL),
            BackendKind::OpenAiCompatible => self.base_url.as_deref(),
            BackendKind::Anthropic => Some(ANTHROPIC_URL),
        }
    }
}

/// Build the configured backend. Remote providers without an API key are rejected
/// here rather than failing on every section.
pub fn build_backend(cfg: &BackendConfig) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let client = reqwest::Client::builder()
        .timeout(cfg.timeout)
        .build()?;

    let backend: Arc<dyn LlmBackend> = match cfg.kind {
        BackendKind::Ollama => {
            let base_url = cfg.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
            Arc::new(OllamaBackend::new(base_url, &cfg.model).with_client(client))
        }
        BackendKind::OpenAi => {
            let key = required_key(cfg)?;
            Arc::new(OpenAiBackend::new(key, &cfg.model).with_client(client))
        }
        BackendKind::OpenAiCompatible => {
            let base_url = cfg.base_url.as_deref().ok_or_else(|| {
                LlmError::Unavailable("open_ai_compatible backend requires base_url".to_string())
            })?;
            Arc::new(
                OpenAiCompatibleBackend::new(base_url, &cfg.model, cfg.api_key.clone())
                    .with_client(client),
            )
        }
        BackendKind::Anthropic => {
            let key = required_key(cfg)?;
            Arc::new(AnthropicBackend::new(key, &cfg.model).with_client(client))
        }
    };

    tracing::info!(
        backend = cfg.kind.as_str(),
        model = backend.model_id(),
        is_local = backend.is_local(),
        timeout_secs = cfg.timeout.as_secs(),
        "Generation backend ready"
    );

    Ok(backend)
}

fn required_key(cfg: &BackendConfig) -> Result<String, LlmError> {
    cfg.api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| LlmError::Unavailable(format!("{} backend requires an API key", cfg.kind.as_str())))
}
