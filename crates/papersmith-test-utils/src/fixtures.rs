use chrono::NaiveDate;
use papersmith_ingestion::{PaperMetadata, SourceDocument};

/// A sentence comfortably over the default 50-character fragment threshold.
pub fn fragment_sentence(doc_id: &str, i: usize) -> String {
    format!("Finding {i} from {doc_id} shows that contrastive pretraining improves linear probe accuracy.")
}

pub fn paper(id: &str, title: &str, authors: &[&str]) -> PaperMetadata {
    PaperMetadata {
        id: id.to_string(),
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        published: NaiveDate::from_ymd_opt(2020, 2, 13).unwrap(),
        summary: format!("Summary of {title}."),
        pdf_url: format!("https://arxiv.org/pdf/{id}"),
    }
}

/// A document whose text splits into exactly `n_fragments` fragments.
pub fn document(id: &str, n_fragments: usize) -> SourceDocument {
    let full_text = (0..n_fragments)
        .map(|i| fragment_sentence(id, i))
        .collect::<Vec<_>>()
        .join(" ");
    SourceDocument::from_metadata(
        paper(id, &format!("Paper {id}"), &["Ting Chen", "Simon Kornblith", "Geoffrey Hinton"]),
        full_text,
    )
}
