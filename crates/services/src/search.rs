//! # Search service
//!
//! Thin policy layer over the [`SearchProvider`] port: empty queries never
//! reach the network, and any gateway failure degrades to an empty result
//! list instead of reaching the user.

use std::sync::Arc;

use domains::{SearchProvider, SearchResult};
use tracing::warn;

/// Result-size bound applied when the caller does not pick one.
pub const DEFAULT_RESULT_SIZE: usize = 10;

pub struct SearchService {
    provider: Arc<dyn SearchProvider>,
}

impl SearchService {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Runs a query and always produces a list. The gateway logs transport
    /// details; this layer only records that a query came back empty-handed.
    pub async fn run_query(&self, query: &str, size: usize) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.provider.search(query, size).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "search failed; serving empty results");
                Vec::new()
            }
        }
    }
}
