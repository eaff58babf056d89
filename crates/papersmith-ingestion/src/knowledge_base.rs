//! The run's knowledge base: every fragment in document-processing order.
//!
//! Selection goes through [`EvidenceSelector`]. The baseline [`PrefixSelector`]
//! is positional: it returns the first `count` fragments whatever the section.

use tracing::debug;

use crate::fragmenter::Fragmenter;
use crate::models::{Fragment, SourceDocument};

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    fragments: Vec<Fragment>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from documents in processing order. Documents without text add nothing.
    pub fn from_documents(documents: &[SourceDocument], fragmenter: &Fragmenter) -> Self {
        let mut kb = Self::new();
        for doc in documents {
            let before = kb.len();
            kb.append(fragmenter.fragments(doc));
            debug!(source_id = %doc.id, n_fragments = kb.len() - before, "Document fragmented");
        }
        kb
    }

    pub fn append(&mut self, fragments: impl IntoIterator<Item = Fragment>) {
        self.fragments.extend(fragments);
    }

    /// Positional selection: the first `count` fragments. `section_name` is ignored.
    pub fn select_for(&self, section_name: &str, count: usize) -> Selection {
        PrefixSelector.select(self, section_name, count)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn as_slice(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn fragments_from<'a>(&'a self, source_id: &'a str) -> impl Iterator<Item = &'a Fragment> + 'a {
        self.fragments.iter().filter(move |f| f.source_id() == source_id)
    }
}

/// How a selection compares with what was asked for. Never an error:
/// a short or empty selection is still valid grounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceCondition {
    Sufficient,
    Short { available: usize },
    Empty,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub fragments: Vec<Fragment>,
    pub requested: usize,
}

impl Selection {
    pub fn condition(&self) -> EvidenceCondition {
        match self.fragments.len() {
            0 if self.requested > 0 => EvidenceCondition::Empty,
            n if n < self.requested => EvidenceCondition::Short { available: n },
            _ => EvidenceCondition::Sufficient,
        }
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }
}

/// Picks grounding evidence for a section. A similarity-ranked selector can
/// replace the positional one without touching the assembler.
pub trait EvidenceSelector: Send + Sync {
    fn select(&self, kb: &KnowledgeBase, section_name: &str, count: usize) -> Selection;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixSelector;

impl EvidenceSelector for PrefixSelector {
    fn select(&self, kb: &KnowledgeBase, _section_name: &str, count: usize) -> Selection {
        Selection {
            fragments: kb.fragments.iter().take(count).cloned().collect(),
            requested: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(id: &str, sentences: usize) -> SourceDocument {
        let full_text = (0..sentences)
            .map(|i| format!("Sentence number {i} of document {id} is long enough to become a fragment."))
            .collect::<Vec<_>>()
            .join(" ");
        SourceDocument {
            id: id.to_string(),
            title: format!("Paper {id}"),
            authors: vec!["A. Author".to_string()],
            published_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            summary: String::new(),
            full_text,
            url: format!("http://arxiv.org/pdf/{id}"),
        }
    }

    #[test]
    fn test_order_is_document_then_fragment_order() {
        let docs = vec![doc("a", 2), doc("b", 3)];
        let fragmenter = Fragmenter::default();
        let kb = KnowledgeBase::from_documents(&docs, &fragmenter);

        let expected: Vec<Fragment> = docs.iter().flat_map(|d| fragmenter.fragments(d)).collect();
        assert_eq!(kb.as_slice(), expected.as_slice());
        assert_eq!(kb.len(), 5);
        assert_eq!(kb.fragments_from("a").count(), 2);
        assert_eq!(kb.fragments_from("b").count(), 3);
    }

    #[test]
    fn test_select_for_ignores_section_name() {
        let kb = KnowledgeBase::from_documents(&[doc("a", 2), doc("b", 3)], &Fragmenter::default());
        let abstract_ = kb.select_for("Abstract", 3);
        let conclusion = kb.select_for("Conclusion", 3);
        assert_eq!(abstract_.fragments, conclusion.fragments);
        assert_eq!(abstract_.fragments.as_slice(), &kb.as_slice()[..3]);
        assert_eq!(abstract_.condition(), EvidenceCondition::Sufficient);
    }

    #[test]
    fn test_short_and_empty_conditions() {
        let kb = KnowledgeBase::from_documents(&[doc("a", 2)], &Fragmenter::default());
        let sel = kb.select_for("Results", 3);
        assert_eq!(sel.fragments.len(), 2);
        assert_eq!(sel.condition(), EvidenceCondition::Short { available: 2 });

        let empty = KnowledgeBase::new();
        let sel = empty.select_for("Results", 3);
        assert!(sel.fragments.is_empty());
        assert_eq!(sel.condition(), EvidenceCondition::Empty);
    }

    #[test]
    fn test_document_without_text_contributes_nothing() {
        let mut failed = doc("failed", 0);
        failed.full_text.clear();
        let kb = KnowledgeBase::from_documents(&[failed, doc("ok", 4)], &Fragmenter::default());
        assert_eq!(kb.len(), 4);
        assert_eq!(kb.fragments_from("failed").count(), 0);
    }
}
