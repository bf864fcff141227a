//! Search provider trait for candidate document discovery.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::SearchError;

/// One result row from a search provider.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Publish timestamp in whatever loose format the provider emits.
    pub published_at: Option<String>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            snippet: String::new(),
            published_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }
}

/// Web search collaborator.
///
/// Implementations must tolerate queries with zero results; an empty vec is
/// a normal outcome, not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for up to `limit` results.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Mock search provider for tests: canned results per query.
#[derive(Default)]
pub struct MockSearchProvider {
    results: RwLock<HashMap<String, Vec<SearchHit>>>,
    /// Queries with no canned entry fail when set.
    fail_unknown: bool,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned hits for a query.
    pub fn with_results(self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.results.write().unwrap().insert(query.to_string(), hits);
        self
    }

    /// Bare URLs as hits for a query.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let hits = urls.iter().map(|u| SearchHit::new(*u)).collect();
        self.with_results(query, hits)
    }

    /// Make queries without canned results return an API error.
    pub fn failing_unknown_queries(mut self) -> Self {
        self.fail_unknown = true;
        self
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let guard = self.results.read().unwrap();
        match guard.get(query) {
            Some(hits) => {
                let mut hits = hits.clone();
                hits.truncate(limit);
                Ok(hits)
            }
            None if self.fail_unknown => Err(SearchError::Api {
                status: 500,
                body: format!("no canned results for {query}"),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_canned_hits_up_to_limit() {
        let provider = MockSearchProvider::new().with_urls(
            "mayor resigned",
            &["https://a.com/1", "https://b.com/2", "https://c.com/3"],
        );

        let hits = provider.search("mayor resigned", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://a.com/1");
    }

    #[tokio::test]
    async fn unknown_query_is_empty_by_default() {
        let provider = MockSearchProvider::new();
        assert!(provider.search("anything", 5).await.unwrap().is_empty());
    }
}
