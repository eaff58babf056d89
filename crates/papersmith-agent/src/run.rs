//! One end-to-end run: collect documents, build the knowledge base, assemble, write.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use papersmith_ingestion::fulltext::FullTextFetcher;
use papersmith_ingestion::pipeline::{collect_documents, IngestionReport};
use papersmith_ingestion::sources::LiteratureSource;
use papersmith_ingestion::{Fragmenter, FragmenterConfig, KnowledgeBase};
use papersmith_llm::LlmBackend;
use papersmith_writer::{
    AssemblerConfig, DocumentAssembler, DraftingConfig, GeneratedDocument, HtmlRenderer, MarkdownRenderer,
    OutputSanitizer, Renderer, SectionDrafter,
};

use crate::config::Config;

pub const OUTPUT_STEM: &str = "research_paper";

#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub report: IngestionReport,
    pub fragments: usize,
    pub document: GeneratedDocument,
    pub outputs: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Run the whole pipeline with the given collaborators. Only a failed
/// literature search, an invalid section list or a failed write is an error.
#[instrument(skip_all, fields(topic = %config.run.topic))]
pub async fn execute(
    config: &Config,
    source: &dyn LiteratureSource,
    fetcher: &dyn FullTextFetcher,
    backend: Arc<dyn LlmBackend>,
) -> anyhow::Result<RunOutcome> {
    let run_id = Uuid::new_v4();
    let t0 = Instant::now();
    let run = &config.run;
    info!(%run_id, model = backend.model_id(), max_papers = run.max_papers, "Run started");

    let collection = collect_documents(source, fetcher, &run.topic, run.max_papers)
        .await
        .context("literature retrieval failed")?;

    let fragmenter = Fragmenter::new(FragmenterConfig { min_chars: config.ingestion.min_fragment_chars });
    let kb = KnowledgeBase::from_documents(&collection.documents, &fragmenter);
    info!(documents = collection.documents.len(), fragments = kb.len(), "Knowledge base built");
    if kb.is_empty() {
        warn!("Knowledge base is empty, sections will be drafted without evidence");
    }

    let sanitizer = OutputSanitizer::for_sections(&run.sections).context("invalid section name")?;
    let drafter = SectionDrafter::new(
        backend,
        sanitizer,
        DraftingConfig {
            length_hint: config.drafting.length_hint.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout: Duration::from_secs(config.llm.timeout_secs),
        },
    );
    let assembler = DocumentAssembler::new(
        drafter,
        AssemblerConfig {
            evidence_per_section: run.evidence_per_section,
            max_concurrent_sections: run.max_concurrent_sections,
        },
    );
    let document = assembler.assemble(&run.topic, &run.sections, &kb).await;

    let renderers: [&dyn Renderer; 2] = [&MarkdownRenderer, &HtmlRenderer];
    let outputs = write_outputs(&document, &run.output_dir, &renderers).await?;

    Ok(RunOutcome {
        run_id,
        report: collection.report,
        fragments: kb.len(),
        document,
        outputs,
        elapsed: t0.elapsed(),
    })
}

/// Render `doc` with each renderer into `dir/research_paper.<ext>`.
pub async fn write_outputs(
    doc: &GeneratedDocument,
    dir: &Path,
    renderers: &[&dyn Renderer],
) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(renderers.len());
    for renderer in renderers {
        let path = dir.join(format!("{OUTPUT_STEM}.{}", renderer.extension()));
        tokio::fs::write(&path, renderer.render(doc))
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!(path = %path.display(), "Wrote output");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use papersmith_test_utils::{document, paper, FailingSource, FetchOutcome, MapFetcher, ScriptedBackend, StaticSource};
    use papersmith_writer::PLACEHOLDER_TEXT;

    fn config(output_dir: &Path) -> Config {
        let mut config = Config::default();
        config.run.topic = "Contrastive Learning".to_string();
        config.run.sections = vec!["Abstract".to_string(), "Conclusion".to_string()];
        config.run.output_dir = output_dir.to_path_buf();
        config
    }

    fn two_paper_setup() -> (StaticSource, MapFetcher) {
        let good = paper("2002.05709", "A Simple Framework", &["Ting Chen", "Geoffrey Hinton"]);
        let broken = paper("1911.05722", "Momentum Contrast", &["Kaiming He"]);
        let fetcher = MapFetcher::new()
            .with(&good.pdf_url, FetchOutcome::Text(document("2002.05709", 4).full_text))
            .with(&broken.pdf_url, FetchOutcome::FetchFails("connection reset".into()));
        (StaticSource { papers: vec![good, broken] }, fetcher)
    }

    #[tokio::test]
    async fn test_run_writes_markdown_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let (source, fetcher) = two_paper_setup();
        let backend = Arc::new(ScriptedBackend::fixed("Contrastive pretraining works [1]."));

        let outcome = execute(&config(dir.path()), &source, &fetcher, backend).await.unwrap();

        assert_eq!(outcome.report.failures.len(), 1);
        assert_eq!(outcome.fragments, 4);
        assert_eq!(outcome.document.references.len(), 3);
        assert_eq!(
            outcome.outputs,
            vec![dir.path().join("research_paper.md"), dir.path().join("research_paper.html")]
        );

        let md = std::fs::read_to_string(dir.path().join("research_paper.md")).unwrap();
        assert!(md.starts_with("# Research Paper: Contrastive Learning\n\n## Abstract\n\n"));
        assert!(md.contains("[3] A Simple Framework by Ting Chen, Geoffrey Hinton. https://arxiv.org/pdf/2002.05709"));
        let html = std::fs::read_to_string(dir.path().join("research_paper.html")).unwrap();
        assert!(html.contains("<div class=\"references\">"));
    }

    #[tokio::test]
    async fn test_generation_outage_still_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let (source, fetcher) = two_paper_setup();

        let outcome = execute(&config(dir.path()), &source, &fetcher, Arc::new(ScriptedBackend::failing()))
            .await
            .unwrap();

        assert_eq!(outcome.document.placeholder_count(), 2);
        let md = std::fs::read_to_string(&outcome.outputs[0]).unwrap();
        assert!(md.contains(PLACEHOLDER_TEXT));
    }

    #[tokio::test]
    async fn test_retrieval_failure_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let backend = Arc::new(ScriptedBackend::fixed("unused"));

        let err = execute(&config(&out), &FailingSource, &MapFetcher::new(), backend.clone())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("literature retrieval failed"));
        assert_eq!(backend.call_count(), 0);
        assert!(!out.exists());
    }
}
