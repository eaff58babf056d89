//! Papersmith: drafts a cited research paper on a topic from arXiv literature.
//! Entry point for the agent binary.

mod config;
mod run;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use papersmith_common::{PapersmithError, SandboxClient};
use papersmith_ingestion::fulltext::PdfFetcher;
use papersmith_ingestion::sources::arxiv::ArxivClient;
use papersmith_llm::build_backend;

#[derive(Parser)]
#[command(
    name = "papersmith",
    version,
    about = "Draft a cited research paper on a topic from arXiv literature.",
    long_about = None,
)]
struct Args {
    /// Research topic (overrides [run].topic).
    #[arg(short, long)]
    topic: Option<String>,

    /// Number of papers to retrieve (overrides [run].max_papers).
    #[arg(short = 'n', long)]
    max_papers: Option<usize>,

    /// Path to papersmith.toml.
    #[arg(short, long, env = "PAPERSMITH_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for research_paper.md and research_paper.html.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut config::Config) {
        if let Some(topic) = self.topic {
            config.run.topic = topic;
        }
        if let Some(n) = self.max_papers {
            config.run.max_papers = n;
        }
        if let Some(dir) = self.output_dir {
            config.run.output_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("papersmith=debug,info")),
        )
        .init();

    let mut args = Args::parse();
    info!("Papersmith {} starting up", env!("CARGO_PKG_VERSION"));

    let mut config = config::Config::load(args.config.take().as_deref())?;
    args.apply(&mut config);
    if config.run.sections.is_empty() {
        anyhow::bail!(PapersmithError::Config("run.sections must name at least one section".to_string()));
    }
    info!(
        topic = %config.run.topic,
        max_papers = config.run.max_papers,
        sections = config.run.sections.len(),
        backend = config.llm.backend.as_str(),
        model = %config.llm.model,
        "Configuration loaded"
    );

    let mut sandbox = SandboxClient::with_timeout(Duration::from_secs(config.ingestion.http_timeout_secs))?;
    for domain in &config.ingestion.extra_allowed_domains {
        sandbox.allow_domain(domain);
    }

    let backend_config = config.backend_config();
    if let Some(endpoint) = backend_config.endpoint() {
        if !sandbox.is_allowed(endpoint) {
            anyhow::bail!(PapersmithError::Security(format!(
                "generation endpoint {endpoint} is not in the allowlist; add its host to ingestion.extra_allowed_domains"
            )));
        }
    }
    let backend = build_backend(&backend_config)?;

    let source = ArxivClient::new(sandbox.clone());
    let fetcher = PdfFetcher::new(sandbox);

    let outcome = run::execute(&config, &source, &fetcher, backend).await?;

    info!(
        run_id = %outcome.run_id,
        papers_found = outcome.report.papers_found,
        papers_with_text = outcome.report.papers_with_text,
        fragments = outcome.fragments,
        sections = outcome.document.sections.len(),
        placeholders = outcome.document.placeholder_count(),
        references = outcome.document.references.len(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Run complete"
    );
    for path in &outcome.outputs {
        info!("  {}", path.display());
    }

    Ok(())
}
