use crate::types::{CandidateItem, PipelineError, Result};
use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const ARXIV_QUERY_URL: &str = "http://export.arxiv.org/api/query";

/// Read-only upstream of candidate items, most recent first.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Human-readable name for logs
    fn source_name(&self) -> String;

    /// Fetch the current page of candidates.
    async fn fetch(&self) -> Result<Vec<CandidateItem>>;
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub api_url: String,
    pub category: String,
    pub max_results: usize,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: ARXIV_QUERY_URL.to_string(),
            category: "cs.AI".to_string(),
            max_results: 60,
            user_agent: "papercast/0.1".to_string(),
            timeout_seconds: 60,
        }
    }
}

/// arXiv Atom search API, sorted by submission date descending.
pub struct ArxivSource {
    client: Client,
    config: SourceConfig,
}

impl ArxivSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn query_url(&self) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.config.api_url,
            &[
                ("search_query", format!("cat:{}", self.config.category)),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "descending".to_string()),
                ("max_results", self.config.max_results.to_string()),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl CandidateSource for ArxivSource {
    fn source_name(&self) -> String {
        format!("arXiv ({})", self.config.category)
    }

    async fn fetch(&self) -> Result<Vec<CandidateItem>> {
        let url = self.query_url()?;
        debug!("Fetching candidates: {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Source(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let content = response.text().await?;
        let mut items = parse_atom(&content)?;
        items.truncate(self.config.max_results);
        info!("Fetched {} candidates from {}", items.len(), self.source_name());
        Ok(items)
    }
}

/// Turn an Atom document into candidates, preserving document order.
///
/// The link is the `text/html` alternate when present, otherwise the
/// entry id.
pub fn parse_atom(content: &str) -> Result<Vec<CandidateItem>> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| PipelineError::Parse(format!("Failed to parse feed: {}", e)))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry
                .links
                .iter()
                .rev()
                .find(|l| l.media_type.as_deref() == Some("text/html"))
                .map(|l| l.href.clone())
                .unwrap_or_else(|| entry.id.clone());

            CandidateItem {
                title: entry.title.map(|t| t.content.trim().to_string()).unwrap_or_default(),
                summary: entry.summary.map(|s| s.content.trim().to_string()).unwrap_or_default(),
                link,
                authors: entry.authors.into_iter().map(|a| a.name).collect(),
            }
        })
        .collect();

    Ok(items)
}
