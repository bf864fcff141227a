//! Typed errors for the claim verification engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on failure classes. Transient collaborator failures are recovered inside
//! the pipeline and never reach the caller; these types exist for the
//! collaborator boundaries themselves.

use thiserror::Error;

/// Errors from the web search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP transport failure (timeout, connection refused, TLS)
    #[error("search request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status from the search API
    #[error("search API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("malformed search response: {0}")]
    Malformed(String),
}

/// Errors from the article fetch collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failure
    #[error("fetch request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status fetching an article
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    /// Fetched page produced no usable text
    #[error("empty article body: {url}")]
    EmptyBody { url: String },
}

/// Errors from the embedding collaborator.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// HTTP transport failure
    #[error("embedding request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status from the embedding API
    #[error("embedding API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Vector count or shape mismatch
    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// Errors from the stance classifier collaborator.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// HTTP transport failure
    #[error("classifier request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status from the classifier API
    #[error("classifier API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected label/score shape
    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

/// Top-level engine error.
///
/// Only surfaces from the fallible inner pipeline; `Engine::check` converts
/// any of these into a Not-enough-evidence verdict rather than returning
/// them to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
