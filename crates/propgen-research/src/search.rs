//! HTTP client for a SerpApi-compatible search-results API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use propgen_core::{AppConfig, RetryPolicy};

use crate::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// One search to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    /// Free-text location passed through to the engine.
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrganicResult {
    pub position: u32,
    #[serde(default)]
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub organic: Vec<OrganicResult>,
    /// "People also ask" questions.
    pub related_questions: Vec<String>,
    pub total_results: Option<u64>,
}

/// Anything that can answer a [`SearchQuery`]; faked in agent tests.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError>;
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Two-letter country code (`gl`).
    pub country: String,
    pub retry: RetryPolicy,
}

impl SearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.search_api_key.clone(),
            base_url: config.search_base_url.clone(),
            timeout_secs: config.search_timeout_secs,
            country: config.search_country.clone(),
            retry: RetryPolicy::new(config.search_max_retries, Duration::from_secs(1)).with_jitter(),
        }
    }

    #[must_use]
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            country: "uk".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct SearchClient {
    client: Client,
    config: SearchConfig,
    search_url: Url,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<RawOrganic>,
    #[serde(default)]
    related_questions: Vec<RawQuestion>,
    #[serde(default)]
    search_information: Option<RawSearchInformation>,
}

/// Organic results occasionally omit `link` (e.g. knowledge cards); those are dropped.
#[derive(Debug, Deserialize)]
struct RawOrganic {
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearchInformation {
    #[serde(default)]
    total_results: Option<u64>,
}

impl SearchClient {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built, or
    /// [`SearchError::InvalidBaseUrl`] if the base URL does not parse.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("propgen/0.1 (proposal-research)")
            .build()?;
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&base)
            .and_then(|b| b.join("search.json"))
            .map_err(|e| SearchError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        Ok(Self {
            client,
            config,
            search_url,
        })
    }

    fn build_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("engine", "google")
            .append_pair("q", &query.query)
            .append_pair("location", &query.location)
            .append_pair("gl", &self.config.country)
            .append_pair("num", "10")
            .append_pair("api_key", &self.config.api_key);
        url
    }

    async fn search_once(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let response = self.client.get(self.build_url(query)).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<RawResponse>(&bytes)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawResponse =
            serde_json::from_slice(&bytes).map_err(|e| SearchError::Deserialize {
                context: format!("search(q={})", query.query),
                source: e,
            })?;

        if let Some(error) = raw.error {
            // An empty result page is reported as an error string.
            if error.contains("hasn't returned any results") {
                return Ok(SearchResults::default());
            }
            return Err(SearchError::Provider(error));
        }

        let organic = raw
            .organic_results
            .into_iter()
            .enumerate()
            .filter_map(|(i, r)| {
                let link = r.link?;
                let fallback = u32::try_from(i + 1).unwrap_or(u32::MAX);
                Some(OrganicResult {
                    position: r.position.unwrap_or(fallback),
                    title: r.title,
                    link,
                    snippet: r.snippet,
                })
            })
            .collect();

        Ok(SearchResults {
            organic,
            related_questions: raw
                .related_questions
                .into_iter()
                .filter_map(|q| q.question)
                .filter(|q| !q.trim().is_empty())
                .collect(),
            total_results: raw.search_information.and_then(|s| s.total_results),
        })
    }
}

#[async_trait]
impl SearchProvider for SearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let results = self
            .config
            .retry
            .run("search", || self.search_once(query))
            .await?;
        tracing::debug!(
            query = %query.query,
            location = %query.location,
            organic = results.organic.len(),
            questions = results.related_questions.len(),
            "search complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_engine_query_and_country() {
        let client = SearchClient::new(SearchConfig::with_key("k")).unwrap();
        let url = client.build_url(&SearchQuery {
            query: "roofer leeds".into(),
            location: "Leeds, UK".into(),
        });
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(url.path(), "/search.json");
        assert!(pairs.contains(&("engine".into(), "google".into())));
        assert!(pairs.contains(&("q".into(), "roofer leeds".into())));
        assert!(pairs.contains(&("location".into(), "Leeds, UK".into())));
        assert!(pairs.contains(&("gl".into(), "uk".into())));
        assert!(pairs.contains(&("num".into(), "10".into())));
    }
}
