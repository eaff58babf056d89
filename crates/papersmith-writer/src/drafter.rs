//! Section drafting: one grounded generation call per section.
//!
//! Any generation failure (timeout, HTTP/API error, empty or unusable output)
//! is absorbed here and the section body becomes [`PLACEHOLDER_TEXT`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use papersmith_ingestion::Fragment;
use papersmith_llm::{LlmBackend, LlmError, LlmRequest};
use tracing::{debug, info, instrument, warn};

use crate::prompt::build_section_prompt;
use crate::sanitizer::OutputSanitizer;

pub const PLACEHOLDER_TEXT: &str = "[Content for this section could not be generated.]";

#[derive(Debug, Clone)]
pub struct DraftingConfig {
    /// Length band written into the prompt.
    pub length_hint: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on one generation call, on top of any HTTP timeout.
    pub timeout: Duration,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            length_hint: "roughly 2-4 paragraphs".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    Generated,
    Placeholder { reason: String },
}

impl DraftOutcome {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, DraftOutcome::Placeholder { .. })
    }
}

#[derive(Debug, Clone)]
pub struct DraftedSection {
    pub name: String,
    pub text: String,
    /// The evidence offered to the model. Ordinals in `text` are not checked.
    pub cited: Vec<Fragment>,
    pub outcome: DraftOutcome,
}

pub struct SectionDrafter {
    backend: Arc<dyn LlmBackend>,
    sanitizer: OutputSanitizer,
    config: DraftingConfig,
}

impl SectionDrafter {
    pub fn new(backend: Arc<dyn LlmBackend>, sanitizer: OutputSanitizer, config: DraftingConfig) -> Self {
        Self { backend, sanitizer, config }
    }

    #[instrument(skip(self, evidence), fields(n_evidence = evidence.len()))]
    pub async fn draft(&self, topic: &str, section_name: &str, evidence: Vec<Fragment>) -> DraftedSection {
        let prompt = build_section_prompt(topic, section_name, &evidence, &self.config.length_hint);
        let t0 = Instant::now();

        let (text, outcome) = match self.generate(prompt).await {
            Ok(text) => {
                info!(
                    chars = text.len(),
                    latency_ms = t0.elapsed().as_millis() as u64,
                    "Section drafted"
                );
                (text, DraftOutcome::Generated)
            }
            Err(e) => {
                warn!(error = %e, "Generation failed, using placeholder");
                (
                    PLACEHOLDER_TEXT.to_string(),
                    DraftOutcome::Placeholder { reason: e.to_string() },
                )
            }
        };

        DraftedSection {
            name: section_name.to_string(),
            text,
            cited: evidence,
            outcome,
        }
    }

    /// Exactly one call to the backend, bounded by the configured timeout.
    async fn generate(&self, prompt: String) -> Result<String, LlmError> {
        let req = LlmRequest {
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
            ..LlmRequest::single_prompt(prompt)
        };

        let resp = tokio::time::timeout(self.config.timeout, self.backend.complete(req))
            .await
            .map_err(|_| LlmError::Timeout(self.config.timeout))??;

        debug!(
            model = %resp.model,
            prompt_tokens = resp.prompt_tokens,
            completion_tokens = resp.completion_tokens,
            "Generation response received"
        );

        let cleaned = self.sanitizer.sanitize(&resp.content);
        if cleaned.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(cleaned)
    }
}
