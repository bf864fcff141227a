//! Embedding model trait.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::EmbeddingError;

/// Sentence embedding collaborator.
///
/// Returned vectors must be normalizable to unit length; the similarity
/// index normalizes them itself, so implementations need not.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed a batch of texts; the output must be parallel to the input.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Deterministic mock embedder: hashes text into a fixed-dimension vector.
///
/// Identical texts embed identically, so similarity ranking in tests is
/// reproducible, and a text embedded twice has cosine similarity 1.0 with
/// itself.
pub struct MockEmbeddingModel {
    dim: usize,
}

impl Default for MockEmbeddingModel {
    fn default() -> Self {
        Self { dim: 32 }
    }
}

impl MockEmbeddingModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let digest = hasher.finalize();

        (0..self.dim)
            .map(|i| {
                let byte = digest[i % digest.len()];
                // spread bytes over [-1, 1], perturbed by position so that
                // different dims decorrelate
                ((byte as f32) / 127.5 - 1.0) * (1.0 + (i as f32) * 0.01).cos()
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingModel for MockEmbeddingModel {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Mock embedder that always fails, for degraded-path tests.
#[derive(Default)]
pub struct FailingEmbeddingModel;

#[async_trait]
impl EmbeddingModel for FailingEmbeddingModel {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Api {
            status: 503,
            body: "embedding backend down".to_string(),
        })
    }
}
