//! Configuration loading for Papersmith.
//! Reads papersmith.toml from the current directory, the path in the
//! PAPERSMITH_CONFIG env var, or the path given on the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use papersmith_llm::{BackendConfig, BackendKind};

pub const DEFAULT_CONFIG_FILE: &str = "papersmith.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub drafting: DraftingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_max_papers")]
    pub max_papers: usize,
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    #[serde(default = "default_evidence_per_section")]
    pub evidence_per_section: usize,
    #[serde(default = "default_max_concurrent_sections")]
    pub max_concurrent_sections: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_topic()                   -> String  { "Contrastive Learning in Computer Vision".to_string() }
fn default_max_papers()              -> usize   { 5 }
fn default_evidence_per_section()    -> usize   { 3 }
fn default_max_concurrent_sections() -> usize   { 1 }
fn default_output_dir()              -> PathBuf { PathBuf::from(".") }

fn default_sections() -> Vec<String> {
    ["Abstract", "Introduction", "Related Work", "Methodology", "Results", "Discussion", "Conclusion"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            max_papers: default_max_papers(),
            sections: default_sections(),
            evidence_per_section: default_evidence_per_section(),
            max_concurrent_sections: default_max_concurrent_sections(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    /// Falls back to the provider's env var when unset.
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_backend()     -> BackendKind { BackendKind::OpenAi }
fn default_model()       -> String      { "gpt-4o".to_string() }
fn default_temperature() -> f32         { 0.7 }
fn default_max_tokens()  -> u32         { 1024 }
fn default_llm_timeout() -> u64         { 120 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: default_model(),
            base_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_min_fragment_chars")]
    pub min_fragment_chars: usize,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub extra_allowed_domains: Vec<String>,
}

fn default_min_fragment_chars() -> usize { 50 }
fn default_http_timeout()       -> u64   { 60 }

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            min_fragment_chars: default_min_fragment_chars(),
            http_timeout_secs: default_http_timeout(),
            extra_allowed_domains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftingSettings {
    #[serde(default = "default_length_hint")]
    pub length_hint: String,
}

fn default_length_hint() -> String { "roughly 2-4 paragraphs".to_string() }

impl Default for DraftingSettings {
    fn default() -> Self {
        Self { length_hint: default_length_hint() }
    }
}

mod tests;

impl Config {
    /// Load configuration from `path`, else PAPERSMITH_CONFIG, else
    /// papersmith.toml. A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var("PAPERSMITH_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE)),
        };

        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The generation backend settings, with the API key resolved from the
    /// environment when the file leaves it empty.
    pub fn backend_config(&self) -> BackendConfig {
        let api_key = self
            .llm
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| api_key_from_env(self.llm.backend, |name| std::env::var(name).ok()));

        BackendConfig {
            kind: self.llm.backend,
            model: self.llm.model.clone(),
            api_key,
            base_url: self.llm.base_url.clone(),
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }
}

/// Env vars consulted for a backend's key, in order.
pub fn api_key_env_vars(kind: BackendKind) -> &'static [&'static str] {
    match kind {
        BackendKind::OpenAi | BackendKind::OpenAiCompatible => {
            &["PAPERSMITH_OPENAI_API_KEY", "OPENAI_API_KEY"]
        }
        BackendKind::Anthropic => &["PAPERSMITH_ANTHROPIC_API_KEY", "ANTHROPIC_API_KEY"],
        BackendKind::Ollama => &[],
    }
}

fn api_key_from_env(kind: BackendKind, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    api_key_env_vars(kind)
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|v| !v.trim().is_empty())
}
