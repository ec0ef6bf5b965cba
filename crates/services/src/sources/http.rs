use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use defense_core::model::BlockId;

use super::{QuestionSet, QuestionSource};
use crate::error::FetchError;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpSourceConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `NETDEFENSE_API_URL` and `NETDEFENSE_HTTP_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("NETDEFENSE_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = env::var("NETDEFENSE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Question source backed by the quiz HTTP API.
///
/// `GET /api/blocks` lists sectors and `GET /api/questions/{id}` returns a
/// sector's question set.
#[derive(Clone, Debug)]
pub struct HttpQuestionSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpQuestionSource {
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(config: HttpSourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(HttpSourceConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }
}

#[derive(Debug, Deserialize)]
struct BlocksResponse {
    blocks: Vec<BlockId>,
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn list_blocks(&self) -> Result<Vec<BlockId>, FetchError> {
        let response = self.client.get(self.config.url("api/blocks")).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }
        let body: BlocksResponse = serde_json::from_str(&response.text().await?)?;
        let mut blocks = body.blocks;
        blocks.sort();
        blocks.dedup();
        Ok(blocks)
    }

    async fn fetch_questions(&self, block: BlockId) -> Result<QuestionSet, FetchError> {
        let url = self.config.url(&format!("api/questions/{block}"));
        debug!(%url, "fetching questions");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(block)),
            status if !status.is_success() => return Err(FetchError::HttpStatus(status)),
            _ => {}
        }

        let body = response.text().await?;
        QuestionSet::parse(block, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let config = HttpSourceConfig::new("http://quiz.local/");
        assert_eq!(config.url("api/blocks"), "http://quiz.local/api/blocks");
    }
}
