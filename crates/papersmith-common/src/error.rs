use thiserror::Error;

#[derive(Debug, Error)]
pub enum PapersmithError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(String),

    /// The literature source could not be queried. Fatal to a run.
    #[error("Literature retrieval failed: {0}")]
    Retrieval(String),

    #[error("Document fetch failed: {0}")]
    Fetch(String),

    #[error("Text extraction failed: {0}")]
    Extract(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PapersmithError {
    /// True for errors scoped to a single document (fetch or extraction).
    pub fn is_document_scoped(&self) -> bool {
        matches!(self, PapersmithError::Fetch(_) | PapersmithError::Extract(_))
    }
}

pub type Result<T> = std::result::Result<T, PapersmithError>;
