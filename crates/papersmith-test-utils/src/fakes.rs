use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use papersmith_common::{PapersmithError, Result};
use papersmith_ingestion::fulltext::FullTextFetcher;
use papersmith_ingestion::sources::LiteratureSource;
use papersmith_ingestion::PaperMetadata;
use papersmith_llm::{LlmBackend, LlmError, LlmRequest, LlmResponse};

// ── Literature sources ───────────────────────────────────────────────────────

pub struct StaticSource {
    pub papers: Vec<PaperMetadata>,
}

#[async_trait]
impl LiteratureSource for StaticSource {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<PaperMetadata>> {
        Ok(self.papers.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &'static str { "static" }
}

pub struct FailingSource;

#[async_trait]
impl LiteratureSource for FailingSource {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<PaperMetadata>> {
        Err(PapersmithError::Xml("catalog returned an HTML error page".to_string()))
    }

    fn name(&self) -> &'static str { "failing" }
}

// ── Full-text fetchers ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Text(String),
    FetchFails(String),
    ExtractFails(String),
}

/// Answers by URL; unknown URLs fail to fetch.
#[derive(Default)]
pub struct MapFetcher {
    outcomes: HashMap<String, FetchOutcome>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, outcome: FetchOutcome) -> Self {
        self.outcomes.insert(url.into(), outcome);
        self
    }
}

#[async_trait]
impl FullTextFetcher for MapFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        match self.outcomes.get(url) {
            Some(FetchOutcome::Text(t)) => Ok(t.clone()),
            Some(FetchOutcome::FetchFails(e)) => Err(PapersmithError::Fetch(e.clone())),
            Some(FetchOutcome::ExtractFails(e)) => Err(PapersmithError::Extract(e.clone())),
            None => Err(PapersmithError::Fetch(format!("no such document: {url}"))),
        }
    }
}

// ── Generation backends ──────────────────────────────────────────────────────

type Responder = Box<dyn Fn(&str) -> std::result::Result<String, LlmError> + Send + Sync>;
type Delay = Box<dyn Fn(&str) -> Duration + Send + Sync>;

/// A generation backend driven by a closure over the prompt text.
/// Every prompt it receives is recorded.
pub struct ScriptedBackend {
    responder: Responder,
    delay: Option<Delay>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(
        responder: impl Fn(&str) -> std::result::Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `text`.
    pub fn fixed(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fails with a 503 API error.
    pub fn failing() -> Self {
        Self::new(|_| {
            Err(LlmError::ApiError {
                status: 503,
                message: "service unavailable".to_string(),
            })
        })
    }

    pub fn with_delay(mut self, delay: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, req: LlmRequest) -> std::result::Result<LlmResponse, LlmError> {
        let prompt = req.prompt_text();
        self.prompts.lock().unwrap().push(prompt.clone());

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(&prompt)).await;
        }

        let content = (self.responder)(&prompt)?;
        Ok(LlmResponse {
            content,
            model: "scripted".to_string(),
            prompt_tokens: 0,
            completion_tokens: 0,
        })
    }

    fn model_id(&self) -> &str { "scripted" }
    fn is_local(&self) -> bool { true }
}
