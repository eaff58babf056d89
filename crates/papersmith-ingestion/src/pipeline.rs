//! Document collection for one run.
//!
//! Orchestrates:
//!   1. Search the literature source for the topic (failure aborts the run)
//!   2. Fetch and extract full text for each hit, one at a time
//!   3. Record per-document failures and keep going
//!
//! A document whose text could not be obtained is still returned, with empty
//! `full_text`, so it contributes zero fragments to the knowledge base.

use tracing::{error, info, instrument, warn};

use papersmith_common::{PapersmithError, Result};

use crate::fulltext::FullTextFetcher;
use crate::models::SourceDocument;
use crate::sources::LiteratureSource;

/// One contained failure while collecting documents.
#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub source_id: String,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub papers_found: usize,
    pub papers_with_text: usize,
    pub failures: Vec<DocumentFailure>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub documents: Vec<SourceDocument>,
    pub report: IngestionReport,
}

/// Search `source` for `topic` and fetch the text of up to `max_papers` hits.
///
/// Only a failed search is an error. Fetch and extraction failures are logged,
/// recorded in the report and leave that document without text.
#[instrument(skip(source, fetcher))]
pub async fn collect_documents(
    source: &dyn LiteratureSource,
    fetcher: &dyn FullTextFetcher,
    topic: &str,
    max_papers: usize,
) -> Result<Collection> {
    let t0 = std::time::Instant::now();

    let hits = source
        .search(topic, max_papers)
        .await
        .map_err(|e| match e {
            PapersmithError::Retrieval(_) => e,
            other => PapersmithError::Retrieval(format!("{} search failed: {other}", source.name())),
        })?;

    info!(source = source.name(), n = hits.len(), "Papers found");

    let mut report = IngestionReport {
        papers_found: hits.len(),
        ..Default::default()
    };
    let mut documents = Vec::with_capacity(hits.len());

    for meta in hits {
        let full_text = match fetcher.fetch_text(&meta.pdf_url).await {
            Ok(text) if !text.trim().is_empty() => {
                report.papers_with_text += 1;
                info!(title = %meta.title, chars = text.len(), "Fetched and parsed");
                text
            }
            Ok(_) => {
                let failure = failure_for(&meta.id, &meta.title, "no text extracted".to_string());
                warn!(title = %meta.title, "PDF contained no extractable text");
                report.failures.push(failure);
                String::new()
            }
            Err(e) if e.is_document_scoped() => {
                warn!(title = %meta.title, error = %e, "Failed to process paper");
                report.failures.push(failure_for(&meta.id, &meta.title, e.to_string()));
                String::new()
            }
            Err(e) => {
                error!(title = %meta.title, error = %e, "Unexpected error while processing paper");
                report.failures.push(failure_for(&meta.id, &meta.title, e.to_string()));
                String::new()
            }
        };
        documents.push(SourceDocument::from_metadata(meta, full_text));
    }

    report.duration_ms = t0.elapsed().as_millis() as u64;

    info!(
        papers_found = report.papers_found,
        papers_with_text = report.papers_with_text,
        failures = report.failures.len(),
        duration_ms = report.duration_ms,
        "Document collection complete"
    );

    Ok(Collection { documents, report })
}

fn failure_for(id: &str, title: &str, error: String) -> DocumentFailure {
    DocumentFailure {
        source_id: id.to_string(),
        title: title.to_string(),
        error,
    }
}
