//! The assembled paper: sections in requested order plus a deduplicated,
//! first-cited-ordered reference list.

use std::collections::HashSet;

use papersmith_ingestion::Fragment;

use crate::drafter::DraftOutcome;

#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub body: String,
    pub outcome: DraftOutcome,
}

/// Fragments in the order they were first cited. A fragment is the same
/// reference as another when text and source id both match.
#[derive(Debug, Clone, Default)]
pub struct ReferenceList {
    entries: Vec<Fragment>,
    seen: HashSet<Fragment>,
}

impl ReferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a citation. Returns false when the fragment is already listed.
    pub fn cite(&mut self, fragment: &Fragment) -> bool {
        if self.seen.contains(fragment) {
            return false;
        }
        self.seen.insert(fragment.clone());
        self.entries.push(fragment.clone());
        true
    }

    pub fn extend<'a>(&mut self, fragments: impl IntoIterator<Item = &'a Fragment>) {
        for f in fragments {
            self.cite(f);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Fragment] {
        &self.entries
    }

    /// `(n, fragment)` with n counting from 1.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Fragment)> {
        self.entries.iter().enumerate().map(|(i, f)| (i + 1, f))
    }
}

/// `[n] Title by A, B. url`
///
/// The first two authors are listed, with "et al." when more exist; no
/// authors drops the "by" clause.
pub fn format_reference(n: usize, fragment: &Fragment) -> String {
    let authors = fragment.source_authors();
    let byline = match authors.len() {
        0 => String::new(),
        1 | 2 => format!(" by {}.", authors.join(", ")),
        _ => format!(" by {} et al.", authors[..2].join(", ")),
    };
    let title = fragment.source_title().trim_end_matches('.');
    if byline.is_empty() {
        format!("[{n}] {title}. {}", fragment.source_url())
    } else {
        format!("[{n}] {title}{byline} {}", fragment.source_url())
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub topic: String,
    pub sections: Vec<Section>,
    pub references: ReferenceList,
}

impl GeneratedDocument {
    pub fn placeholder_count(&self) -> usize {
        self.sections.iter().filter(|s| s.outcome.is_placeholder()).count()
    }

    pub fn formatted_references(&self) -> Vec<String> {
        self.references
            .numbered()
            .map(|(n, f)| format_reference(n, f))
            .collect()
    }
}
