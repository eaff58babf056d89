//! arXiv API client.
//!
//! Endpoint: https://export.arxiv.org/api/query
//! Responses are Atom feeds; each `<entry>` is one paper.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use papersmith_common::{PapersmithError, Result, SandboxClient};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use crate::models::PaperMetadata;
use super::LiteratureSource;

const ARXIV_QUERY_URL: &str = "https://export.arxiv.org/api/query";

const STOP_WORDS: &[&str] = &["a", "an", "and", "the", "of", "in", "on", "for", "to", "with"];

pub struct ArxivClient {
    client: SandboxClient,
}

impl ArxivClient {
    pub fn new(client: SandboxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LiteratureSource for ArxivClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<PaperMetadata>> {
        let search_query = build_search_query(query);
        let max = max_results.to_string();
        let params = [
            ("search_query", search_query.as_str()),
            ("start", "0"),
            ("max_results", max.as_str()),
            ("sortBy", "relevance"),
            ("sortOrder", "descending"),
        ];

        let xml = self.client
            .get(ARXIV_QUERY_URL)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let mut papers = parse_arxiv_feed(&xml)?;
        papers.truncate(max_results);
        debug!(count = papers.len(), "arXiv search returned entries");
        Ok(papers)
    }

    fn name(&self) -> &'static str { "arxiv" }
}

/// Turn a free-text topic into an arXiv query: every non-stop-word term must match.
pub fn build_search_query(topic: &str) -> String {
    let terms: Vec<String> = topic
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|t| !t.is_empty())
        .filter(|t| !STOP_WORDS.contains(&t.to_lowercase().as_str()))
        .map(|t| format!("all:{}", t))
        .collect();

    if terms.is_empty() {
        format!("all:{}", topic.trim())
    } else {
        terms.join(" AND ")
    }
}

#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    authors: Vec<String>,
    pdf_url: Option<String>,
}

impl EntryBuilder {
    fn build(self) -> Option<PaperMetadata> {
        let title = collapse_whitespace(&self.title);
        let id = self.id.trim().to_string();
        if title.is_empty() || id.is_empty() {
            warn!("Skipping arXiv entry without id or title");
            return None;
        }
        let Some(published) = parse_atom_date(&self.published).or_else(|| parse_atom_date(&self.updated)) else {
            warn!(%id, "Skipping arXiv entry without a publication date");
            return None;
        };
        let pdf_url = self.pdf_url.unwrap_or_else(|| id.replacen("/abs/", "/pdf/", 1));

        Some(PaperMetadata {
            id,
            title,
            authors: self.authors,
            published,
            summary: collapse_whitespace(&self.summary),
            pdf_url,
        })
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
}

/// Parse an arXiv Atom feed into paper metadata, in feed order.
fn parse_arxiv_feed(xml: &str) -> Result<Vec<PaperMetadata>> {
    let mut papers = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<EntryBuilder> = None;
    let mut field = Field::None;
    let mut in_author = false;
    let mut author_name = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"entry" => current = Some(EntryBuilder::default()),
                    b"author" => { in_author = true; author_name.clear(); }
                    b"name" if in_author => field = Field::AuthorName,
                    b"id" => field = Field::Id,
                    b"title" => field = Field::Title,
                    b"summary" => field = Field::Summary,
                    b"published" => field = Field::Published,
                    b"updated" => field = Field::Updated,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let (b"link", Some(entry)) = (e.name().as_ref(), current.as_mut()) {
                    let mut href = None;
                    let mut is_pdf = false;
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        match attr.key.as_ref() {
                            b"href" => href = Some(value),
                            b"title" if value == "pdf" => is_pdf = true,
                            b"type" if value == "application/pdf" => is_pdf = true,
                            _ => {}
                        }
                    }
                    if is_pdf {
                        entry.pdf_url = href;
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                if let Some(ref mut entry) = current {
                    match field {
                        Field::Id         => entry.id.push_str(&text),
                        Field::Title      => entry.title.push_str(&text),
                        Field::Summary    => entry.summary.push_str(&text),
                        Field::Published  => entry.published.push_str(&text),
                        Field::Updated    => entry.updated.push_str(&text),
                        Field::AuthorName => author_name.push_str(&text),
                        Field::None       => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                match e.name().as_ref() {
                    b"author" => {
                        in_author = false;
                        let name = collapse_whitespace(&author_name);
                        if let (Some(entry), false) = (current.as_mut(), name.is_empty()) {
                            entry.authors.push(name);
                        }
                    }
                    b"entry" => {
                        if let Some(paper) = current.take().and_then(EntryBuilder::build) {
                            papers.push(paper);
                        }
                    }
                    _ => {}
                }
                field = Field::None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PapersmithError::Xml(format!(
                    "arXiv feed error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

fn parse_atom_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:contrastive</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <updated>2024-05-01T00:00:00-04:00</updated>
  <entry>
    <id>http://arxiv.org/abs/2002.05709v3</id>
    <updated>2020-07-01T00:09:08Z</updated>
    <published>2020-02-13T18:50:45Z</published>
    <title>A Simple Framework for Contrastive Learning of Visual
      Representations</title>
    <summary>  This paper presents SimCLR: a simple framework for contrastive
learning of visual representations.
    </summary>
    <author><name>Ting Chen</name></author>
    <author><name>Simon Kornblith</name></author>
    <author><name>Mohammad Norouzi</name></author>
    <link href="http://arxiv.org/abs/2002.05709v3" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2002.05709v3" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1911.05722v3</id>
    <published>2019-11-13T18:53:26Z</published>
    <title>Momentum Contrast &amp; Visual Learning</title>
    <summary>MoCo.</summary>
    <author><name>Kaiming He</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_entries_in_order() {
        let papers = parse_arxiv_feed(FEED).unwrap();
        assert_eq!(papers.len(), 2);

        let simclr = &papers[0];
        assert_eq!(simclr.id, "http://arxiv.org/abs/2002.05709v3");
        assert_eq!(simclr.title, "A Simple Framework for Contrastive Learning of Visual Representations");
        assert_eq!(simclr.authors, vec!["Ting Chen", "Simon Kornblith", "Mohammad Norouzi"]);
        assert_eq!(simclr.published, NaiveDate::from_ymd_opt(2020, 2, 13).unwrap());
        assert_eq!(simclr.pdf_url, "http://arxiv.org/pdf/2002.05709v3");
        assert!(simclr.summary.starts_with("This paper presents SimCLR"));
    }

    #[test]
    fn test_feed_level_title_is_not_an_entry() {
        let papers = parse_arxiv_feed(FEED).unwrap();
        assert!(papers.iter().all(|p| !p.title.starts_with("ArXiv Query")));
    }

    #[test]
    fn test_missing_pdf_link_is_derived_from_id() {
        let papers = parse_arxiv_feed(FEED).unwrap();
        assert_eq!(papers[1].pdf_url, "http://arxiv.org/pdf/1911.05722v3");
        assert_eq!(papers[1].title, "Momentum Contrast & Visual Learning");
    }

    #[test]
    fn test_malformed_feed_is_xml_error() {
        let err = parse_arxiv_feed("<feed><entry><id>x</entry></feed>").unwrap_err();
        assert!(matches!(err, PapersmithError::Xml(_)));
    }

    #[test]
    fn test_build_search_query_drops_stop_words() {
        assert_eq!(
            build_search_query("Contrastive Learning in Computer Vision"),
            "all:Contrastive AND all:Learning AND all:Computer AND all:Vision"
        );
        assert_eq!(build_search_query("self-supervised"), "all:self-supervised");
    }

    #[test]
    fn test_parse_atom_date_variants() {
        let d = NaiveDate::from_ymd_opt(2020, 2, 13).unwrap();
        assert_eq!(parse_atom_date("2020-02-13T18:50:45Z"), Some(d));
        assert_eq!(parse_atom_date("2020-02-13"), Some(d));
        assert_eq!(parse_atom_date(""), None);
    }

    #[tokio::test]
    #[ignore] // Requires network access to export.arxiv.org
    async fn test_live_arxiv_search() {
        let client = ArxivClient::new(SandboxClient::new().unwrap());
        let papers = client.search("contrastive learning computer vision", 3).await.unwrap();
        assert!(!papers.is_empty());
    }
}
