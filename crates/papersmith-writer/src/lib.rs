//! Section drafting, document assembly and rendering.

pub mod assembler;
pub mod document;
pub mod drafter;
pub mod prompt;
pub mod render;
pub mod sanitizer;

pub use assembler::{AssemblerConfig, DocumentAssembler};
pub use document::{format_reference, GeneratedDocument, ReferenceList, Section};
pub use drafter::{DraftOutcome, DraftedSection, DraftingConfig, SectionDrafter, PLACEHOLDER_TEXT};
pub use render::{HtmlRenderer, MarkdownRenderer, Renderer};
pub use sanitizer::OutputSanitizer;
