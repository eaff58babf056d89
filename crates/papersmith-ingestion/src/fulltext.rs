//! Full-text retrieval: download a paper's PDF and pull its plain text out.

use async_trait::async_trait;
use papersmith_common::{PapersmithError, Result, SandboxClient};
use tracing::{debug, instrument};

use crate::pdf_parser::extract_pdf_text;

/// Turns a retrieval URL into raw text. Failures are `Fetch` or `Extract` errors
/// and only ever cost the run that one document.
#[async_trait]
pub trait FullTextFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

pub struct PdfFetcher {
    client: SandboxClient,
}

impl PdfFetcher {
    pub fn new(client: SandboxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FullTextFetcher for PdfFetcher {
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let request = self.client
            .get(url)
            .map_err(|e| PapersmithError::Fetch(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| PapersmithError::Fetch(format!("download failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(PapersmithError::Fetch(format!("PDF download failed: HTTP {}", resp.status())));
        }

        let pdf_bytes = resp
            .bytes()
            .await
            .map_err(|e| PapersmithError::Fetch(format!("body read failed: {e}")))?;

        let parsed = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf_bytes))
            .await
            .map_err(|e| PapersmithError::Extract(format!("extraction task failed: {e}")))??;

        debug!(
            page_count = parsed.page_count,
            pages_failed = parsed.pages_failed,
            chars = parsed.full_text.len(),
            "PDF text extracted"
        );

        Ok(parsed.full_text)
    }
}
