use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::PapersmithError;

/// Hosts every run needs: the arXiv API and PDF mirrors plus the supported LLM providers.
const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "export.arxiv.org",  // arXiv query API
    "arxiv.org",         // arXiv PDFs
    "api.openai.com",    // OpenAI LLMs
    "api.anthropic.com", // Anthropic LLMs
    "localhost",         // Ollama / local OpenAI-compatible servers
    "127.0.0.1",
];

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// An HTTP client that only allows requests to approved domains.
/// Every outbound request of a run goes through one of these.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30 s request timeout.
    pub fn new() -> Result<Self, PapersmithError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, PapersmithError> {
        let allowlist = DEFAULT_ALLOWED_DOMAINS
            .iter()
            .map(|d| d.to_string())
            .collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("papersmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PapersmithError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.trim().to_lowercase());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed domain
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, PapersmithError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    fn check(&self, url: &str) -> Result<(), PapersmithError> {
        if self.is_allowed(url) {
            return Ok(());
        }
        tracing::warn!(url, "Blocked request to domain outside the allowlist");
        Err(PapersmithError::Security(format!(
            "Network capabilities capped: domain not in allowlist for URL {}",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist_covers_arxiv() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("http://export.arxiv.org/api/query?search_query=all:gan"));
        assert!(client.is_allowed("https://arxiv.org/pdf/2002.05709v3"));
        assert!(client.is_allowed("http://localhost:11434/v1/chat/completions"));
    }

    #[test]
    fn test_subdomain_allowed_but_lookalike_blocked() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://www.arxiv.org/abs/1234"));
        assert!(!client.is_allowed("https://evilarxiv.org/pdf/1234"));
        assert!(!client.is_allowed("not a url"));
    }

    #[test]
    fn test_allow_domain_extends_policy() {
        let mut client = SandboxClient::new().unwrap();
        assert!(client.get("https://openreview.net/pdf?id=abc").is_err());
        client.allow_domain("OpenReview.net");
        assert!(client.get("https://openreview.net/pdf?id=abc").is_ok());
    }
}
