//! Data models for the ingestion side of a run.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;

/// A search hit before its full text has been fetched.
#[derive(Debug, Clone)]
pub struct PaperMetadata {
    /// Stable catalog identifier (the arXiv entry id).
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: NaiveDate,
    pub summary: String,
    /// Where the full-text PDF can be retrieved.
    pub pdf_url: String,
}

/// One retrieved paper. `full_text` is empty when fetch or extraction failed.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: NaiveDate,
    pub summary: String,
    pub full_text: String,
    pub url: String,
}

impl SourceDocument {
    pub fn from_metadata(meta: PaperMetadata, full_text: String) -> Self {
        Self {
            id: meta.id,
            title: meta.title,
            authors: meta.authors,
            published_date: meta.published,
            summary: meta.summary,
            full_text,
            url: meta.pdf_url,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.full_text.trim().is_empty()
    }
}

/// One citable excerpt tagged with its document's citation metadata.
///
/// Fields are only readable: a fragment is never mutated after creation.
/// Two fragments are the same reference when `(text, source_id)` match,
/// which is what `PartialEq` and `Hash` compare.
#[derive(Debug, Clone)]
pub struct Fragment {
    text: String,
    source_title: String,
    source_authors: Vec<String>,
    source_url: String,
    source_id: String,
}

impl Fragment {
    /// Create a fragment from `text`, copying `doc`'s metadata.
    /// Returns `None` unless the text is longer than `min_chars` characters.
    pub fn new(text: impl Into<String>, doc: &SourceDocument, min_chars: usize) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() || text.chars().count() <= min_chars {
            return None;
        }
        Some(Self {
            text,
            source_title: doc.title.clone(),
            source_authors: doc.authors.clone(),
            source_url: doc.url.clone(),
            source_id: doc.id.clone(),
        })
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn source_title(&self) -> &str { &self.source_title }
    pub fn source_authors(&self) -> &[String] { &self.source_authors }
    pub fn source_url(&self) -> &str { &self.source_url }
    pub fn source_id(&self) -> &str { &self.source_id }

    /// The deduplication identity of this fragment.
    pub fn citation_key(&self) -> (&str, &str) {
        (&self.text, &self.source_id)
    }
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        self.citation_key() == other.citation_key()
    }
}

impl Eq for Fragment {}

impl Hash for Fragment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.citation_key().hash(state);
    }
}
