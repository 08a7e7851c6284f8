use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::debug;

use super::types::MoviePage;
use crate::config::TmdbConfig;

/// Read-only movie metadata source: text search and popularity discovery.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<MoviePage, FetchError>;
    async fn discover(&self) -> Result<MoviePage, FetchError>;
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, token: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/movie?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    pub fn discover_url(&self) -> String {
        format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
    }

    async fn get_page(&self, url: &str) -> Result<MoviePage, FetchError> {
        debug!(url = %url, "TMDB request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn search(&self, query: &str) -> Result<MoviePage, FetchError> {
        self.get_page(&self.search_url(query)).await
    }

    async fn discover(&self) -> Result<MoviePage, FetchError> {
        self.get_page(&self.discover_url()).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to fetch movies: status {0}")]
    Status(u16),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}
