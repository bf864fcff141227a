//! Article fetcher trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::FetchError;

/// Extracted article content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub text: String,
}

impl Article {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Full-text article fetch collaborator.
///
/// A failed fetch drops that URL from the evidence pool; callers log and
/// continue rather than propagate.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError>;
}

/// Mock fetcher for tests: canned articles per URL, everything else 404s.
#[derive(Default)]
pub struct MockArticleFetcher {
    articles: RwLock<HashMap<String, Article>>,
}

impl MockArticleFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_article(self, url: &str, article: Article) -> Self {
        self.articles.write().unwrap().insert(url.to_string(), article);
        self
    }

    pub fn with_text(self, url: &str, title: &str, text: &str) -> Self {
        self.with_article(url, Article::new(title, text))
    }
}

#[async_trait]
impl ArticleFetcher for MockArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        self.articles
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}
