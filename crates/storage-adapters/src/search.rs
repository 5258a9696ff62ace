//! # Search gateway
//!
//! Outbound client for the external JSON search API. The reference
//! behavior had no timeout; one is imposed here so a hung endpoint cannot
//! stall a request forever.

use std::time::Duration;

use async_trait::async_trait;
use domains::models::SearchResult;
use domains::ports::SearchProvider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{error, warn};

/// Longest a search request may hold up its page render.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_SUMMARY_CHARS: usize = 200;

pub struct SearchApiGateway {
    client: reqwest::Client,
    endpoint: String,
    token: SecretString,
}

/// Stand-in wired up when search is disabled in configuration; every query
/// resolves to an empty result set without touching the network.
pub struct DisabledSearch;

#[async_trait]
impl SearchProvider for DisabledSearch {
    async fn search(&self, _query: &str, _size: usize) -> anyhow::Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    posts: Vec<ApiPost>,
}

#[derive(Debug, Deserialize)]
struct ApiPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    text: String,
}

fn clip_summary(text: &str) -> String {
    text.chars().take(MAX_SUMMARY_CHARS).collect()
}

impl SearchApiGateway {
    pub fn new(
        endpoint: impl Into<String>,
        token: SecretString,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }
}

#[async_trait]
impl SearchProvider for SearchApiGateway {
    async fn search(&self, query: &str, size: usize) -> anyhow::Result<Vec<SearchResult>> {
        let size_param = size.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("token", self.token.expose_secret()),
                ("format", "json"),
                ("q", query),
                ("sort", "relevancy"),
                ("size", size_param.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                // Timeouts are an expected condition; other transport
                // faults are not.
                if err.is_timeout() {
                    warn!("search API request timed out");
                } else {
                    error!(error = %err, "search API transport failure");
                }
                err
            })?
            .error_for_status()
            .map_err(|err| {
                error!(error = %err, "search API returned an error status");
                err
            })?;

        let payload: ApiResponse = response.json().await.map_err(|err| {
            error!(error = %err, "search API response did not parse");
            err
        })?;

        Ok(payload
            .posts
            .into_iter()
            .take(size)
            .map(|post| SearchResult {
                title: post.title,
                link: post.url,
                summary: clip_summary(&post.text),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_summary_bounds_length() {
        let long = "x".repeat(500);
        assert_eq!(clip_summary(&long).chars().count(), 200);
        assert_eq!(clip_summary("short"), "short");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error_not_a_panic() {
        // Port 9 (discard) on localhost is not listening in the test
        // environment; the connect fails fast.
        let gateway = SearchApiGateway::new(
            "http://127.0.0.1:9/search",
            SecretString::from("test-key".to_string()),
            Duration::from_millis(500),
        )
        .unwrap();

        let result = gateway.search("rango", 5).await;
        assert!(result.is_err());
    }
}
