//! Literature source clients.

pub mod arxiv;

use async_trait::async_trait;
use papersmith_common::Result;

use crate::models::PaperMetadata;

/// Common interface for literature source clients. Ranking is the source's job.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Search for papers matching a query, most relevant first.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperMetadata>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
