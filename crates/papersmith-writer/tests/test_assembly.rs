//! End-to-end assembly against a scripted generation backend.

use std::sync::Arc;
use std::time::Duration;

use papersmith_ingestion::{Fragmenter, KnowledgeBase};
use papersmith_llm::LlmBackend;
use papersmith_test_utils::{document, ScriptedBackend};
use papersmith_writer::{
    AssemblerConfig, DocumentAssembler, DraftingConfig, MarkdownRenderer, OutputSanitizer, Renderer,
    SectionDrafter, PLACEHOLDER_TEXT,
};
use pretty_assertions::assert_eq;

fn sections() -> Vec<String> {
    ["Abstract", "Introduction", "Methodology", "Conclusion"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn assembler(backend: Arc<dyn LlmBackend>, drafting: DraftingConfig) -> DocumentAssembler {
    let sanitizer = OutputSanitizer::for_sections(&sections()).unwrap();
    DocumentAssembler::new(
        SectionDrafter::new(backend, sanitizer, drafting),
        AssemblerConfig::default(),
    )
}

fn two_document_kb() -> KnowledgeBase {
    KnowledgeBase::from_documents(&[document("2002.05709", 3), document("1911.05722", 2)], &Fragmenter::default())
}

#[tokio::test]
async fn test_five_fragments_two_documents_three_references() {
    let kb = two_document_kb();
    assert_eq!(kb.len(), 5);

    let backend = Arc::new(ScriptedBackend::fixed("Contrastive methods learn invariances [1][2]."));
    let doc = assembler(backend.clone(), DraftingConfig::default())
        .assemble("Contrastive Learning", &sections(), &kb)
        .await;

    assert_eq!(backend.call_count(), 4);
    assert_eq!(doc.placeholder_count(), 0);
    assert_eq!(doc.references.len(), 3);
    assert!(doc.references.entries().iter().all(|f| f.source_id() == "2002.05709"));

    let refs = doc.formatted_references();
    assert_eq!(refs.len(), 3);
    for (i, line) in refs.iter().enumerate() {
        assert!(line.starts_with(&format!("[{}] Paper 2002.05709 by", i + 1)));
    }
}

#[tokio::test]
async fn test_every_section_degrades_when_backend_is_down() {
    let kb = two_document_kb();
    let doc = assembler(Arc::new(ScriptedBackend::failing()), DraftingConfig::default())
        .assemble("Contrastive Learning", &sections(), &kb)
        .await;

    let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Abstract", "Introduction", "Methodology", "Conclusion"]);
    assert!(doc.sections.iter().all(|s| s.body == PLACEHOLDER_TEXT));
    assert_eq!(doc.placeholder_count(), 4);
    // offered evidence is still referenced
    assert_eq!(doc.references.len(), 3);

    let md = MarkdownRenderer.render(&doc);
    assert!(md.contains("## References\n\n[1] "));
}

#[tokio::test]
async fn test_one_slow_section_degrades_alone() {
    let kb = two_document_kb();
    let backend = ScriptedBackend::fixed("Body text [1].").with_delay(|p| {
        if p.contains("**Methodology**") {
            Duration::from_secs(5)
        } else {
            Duration::ZERO
        }
    });
    let drafting = DraftingConfig { timeout: Duration::from_millis(50), ..Default::default() };

    let doc = assembler(Arc::new(backend), drafting)
        .assemble("Contrastive Learning", &sections(), &kb)
        .await;

    let bodies: Vec<&str> = doc.sections.iter().map(|s| s.body.as_str()).collect();
    assert_eq!(bodies, vec!["Body text [1].", "Body text [1].", PLACEHOLDER_TEXT, "Body text [1]."]);
    assert_eq!(doc.placeholder_count(), 1);
}

#[tokio::test]
async fn test_empty_knowledge_base_produces_document_without_references() {
    let kb = KnowledgeBase::new();
    let backend = Arc::new(ScriptedBackend::fixed("A general overview of the field."));
    let doc = assembler(backend.clone(), DraftingConfig::default())
        .assemble("Contrastive Learning", &sections(), &kb)
        .await;

    assert_eq!(doc.sections.len(), 4);
    assert!(doc.references.is_empty());
    assert!(backend.prompts().iter().all(|p| p.contains("Excerpts:\n(none)")));

    let md = MarkdownRenderer.render(&doc);
    assert!(md.ends_with("## References\n\n"));
}

#[tokio::test]
async fn test_leaked_headings_are_removed_from_bodies() {
    let kb = two_document_kb();
    let backend = ScriptedBackend::new(|_| {
        Ok("## Introduction\n\n**Key Points:**\nAugmentation strength matters [1].\n\nConclusion\n".to_string())
    });
    let doc = assembler(Arc::new(backend), DraftingConfig::default())
        .assemble("Contrastive Learning", &sections(), &kb)
        .await;

    assert!(doc.sections.iter().all(|s| s.body == "Augmentation strength matters [1]."));
}
