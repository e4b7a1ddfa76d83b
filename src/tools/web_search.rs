//! Web search tool backed by DuckDuckGo's lightweight HTML results page.

use crate::config::SearchSettings;
use crate::error::{AgentError, Result};
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// Performs searches and formats the top results as plain text.
pub struct WebSearchTool {
    client: Client,
    endpoint: String,
    locale: String,
    max_body_bytes: usize,
    extractor: ResultExtractor,
}

impl WebSearchTool {
    /// Create a search tool from settings.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Url::parse(&settings.endpoint)
            .map_err(|e| AgentError::Config(format!("Invalid search endpoint: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            locale: settings.locale.clone(),
            max_body_bytes: settings.max_body_bytes,
            extractor: ResultExtractor::new(),
        })
    }

    /// Search for `query` and render up to `max_results` hits.
    ///
    /// Returns `"no results"` when the page contains no result links.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, max_results: usize) -> Result<String> {
        if query.is_empty() {
            return Err(AgentError::MissingQuery);
        }

        let url = Url::parse_with_params(&self.endpoint, &[("q", query), ("kl", self.locale.as_str())])
            .map_err(|e| AgentError::ToolExecution(format!("Invalid search URL: {}", e)))?;

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AgentError::ToolExecution(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::SearchHttp(status.as_u16()));
        }

        let mut body: Vec<u8> = Vec::new();
        while body.len() < self.max_body_bytes {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| AgentError::ToolExecution(format!("search read failed: {}", e)))?;
            let Some(chunk) = chunk else {
                break;
            };
            let room = self.max_body_bytes - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
        debug!("Read {} bytes of search results", body.len());

        let html = String::from_utf8_lossy(&body);
        let hits = self.extractor.extract(&html, max_results);
        info!(hits = hits.len(), "search finished");

        Ok(render_results(&hits))
    }
}

/// Pulls result links out of a results page.
pub struct ResultExtractor {
    anchor: Regex,
    tags: Regex,
}

impl ResultExtractor {
    pub fn new() -> Self {
        // Result links carry the `result__a` marker class before their href
        let anchor = Regex::new(
            r#"<a[^>]*class="[^"]*result__a[^"]*"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#,
        )
        .expect("Invalid regex");
        let tags = Regex::new(r"<[^>]+>").expect("Invalid regex");

        Self { anchor, tags }
    }

    /// Extract up to `max_results` hits in document order.
    pub fn extract(&self, html: &str, max_results: usize) -> Vec<SearchHit> {
        self.anchor
            .captures_iter(html)
            .take(max_results)
            .map(|caps| {
                let title = self.tags.replace_all(&caps[2], "");
                SearchHit {
                    title: html_escape::decode_html_entities(&title).into_owned(),
                    url: html_escape::decode_html_entities(&caps[1]).into_owned(),
                }
            })
            .collect()
    }
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract result links from a results page, in document order.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    ResultExtractor::new().extract(html, max_results)
}

/// Render hits as `"<n>. <title>\n<url>\n"` records.
pub fn render_results(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "no results".to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {}\n{}\n", i + 1, hit.title, hit.url))
        .collect()
}
