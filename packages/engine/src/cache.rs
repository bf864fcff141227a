//! On-disk article cache keyed by URL hash.
//!
//! Repeated runs against the same URL are free and deterministic. Entries
//! are JSON files named by the hex SHA-256 of the URL; concurrent readers
//! are safe and concurrent writers of the same key are last-write-wins
//! (content per URL is deterministic, so there is nothing to reconcile).

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::traits::{Article, ArticleFetcher};

/// Directory-backed article cache.
#[derive(Debug, Clone)]
pub struct FetchCache {
    dir: PathBuf,
}

impl FetchCache {
    /// Open (creating if needed) a cache directory.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Cached article for a URL, if present and readable.
    ///
    /// Corrupt or unreadable entries read as a miss; the fetch path will
    /// simply re-fetch and overwrite.
    pub fn get(&self, url: &str) -> Option<Article> {
        let path = self.entry_path(url);
        let bytes = std::fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache entry, ignoring");
                None
            }
        }
    }

    /// Store an article under its URL key. Last write wins.
    pub fn put(&self, url: &str, article: &Article) -> std::io::Result<()> {
        let bytes = serde_json::to_vec(article)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(self.entry_path(url), bytes)
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Fetcher decorator that consults the cache before the network.
pub struct CachedFetcher<F> {
    inner: F,
    cache: FetchCache,
}

impl<F: ArticleFetcher> CachedFetcher<F> {
    pub fn new(inner: F, cache: FetchCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<F: ArticleFetcher> ArticleFetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        if let Some(article) = self.cache.get(url) {
            debug!(url = %url, "cache hit");
            return Ok(article);
        }

        let article = self.inner.fetch(url).await?;
        if let Err(e) = self.cache.put(url, &article) {
            // a failed write only costs the next run a re-fetch
            warn!(url = %url, error = %e, "cache write failed");
        }
        Ok(article)
    }
}
