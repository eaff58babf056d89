//! papersmith-ingestion: Literature ingestion and knowledge-base construction.
//! Covers:
//! - Paper discovery (arXiv)
//! - Full-text retrieval and PDF text extraction
//! - Sentence-boundary fragment extraction
//! - The ordered knowledge base and evidence selection

pub mod sources;
pub mod models;
pub mod pdf_parser;
pub mod fulltext;
pub mod fragmenter;
pub mod knowledge_base;
pub mod pipeline;

pub use fragmenter::{Fragmenter, FragmenterConfig};
pub use knowledge_base::{EvidenceCondition, EvidenceSelector, KnowledgeBase, PrefixSelector, Selection};
pub use models::{Fragment, PaperMetadata, SourceDocument};
