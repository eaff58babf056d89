//! Sentence-boundary fragment extraction.
//!
//! Text is split wherever `.`, `!` or `?` is followed by whitespace and an
//! ASCII uppercase letter. This is a heuristic, not a sentence tokenizer:
//! abbreviations ("Dr. Smith"), some decimals and quoted dialogue split in
//! the wrong place, and that is accepted.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Fragment, SourceDocument};

/// Configuration for the fragmenter.
#[derive(Debug, Clone)]
pub struct FragmenterConfig {
    /// Pieces with this many characters or fewer are discarded.
    pub min_chars: usize,
}

impl Default for FragmenterConfig {
    fn default() -> Self {
        Self { min_chars: 50 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fragmenter {
    config: FragmenterConfig,
}

impl Fragmenter {
    pub fn new(config: FragmenterConfig) -> Self {
        Self { config }
    }

    /// Lazily yield the citable fragments of `doc`, in text order.
    /// A document without text yields nothing.
    pub fn fragments<'a>(&'a self, doc: &'a SourceDocument) -> impl Iterator<Item = Fragment> + 'a {
        split_sentences(&doc.full_text)
            .filter_map(move |piece| Fragment::new(piece, doc, self.config.min_chars))
    }
}

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+[A-Z]").unwrap())
}

/// Split `text` at heuristic sentence boundaries. The punctuation stays with the
/// preceding piece, the whitespace is dropped, the capital starts the next piece.
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences {
        text,
        start: 0,
        boundaries: sentence_boundary().find_iter(text),
        done: false,
    }
}

pub struct Sentences<'a> {
    text: &'a str,
    start: usize,
    boundaries: regex::Matches<'static, 'a>,
    done: bool,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }
        match self.boundaries.next() {
            Some(m) => {
                // Punctuation and capital are both single-byte ASCII.
                let piece = &self.text[self.start..m.start() + 1];
                self.start = m.end() - 1;
                Some(piece)
            }
            None => {
                self.done = true;
                Some(&self.text[self.start..])
            }
        }
    }
}
