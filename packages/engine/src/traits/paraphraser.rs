//! Optional paraphrase collaborator for query expansion.

use async_trait::async_trait;

/// Paraphrase generator.
///
/// Deliberately infallible at the trait surface: implementations swallow
/// transport and model errors and return an empty list, because a missing
/// paraphrase must never fail query expansion.
#[async_trait]
pub trait Paraphraser: Send + Sync {
    /// Up to `max` paraphrases of `text`, deduplicated and distinct from
    /// the input. Empty on any failure.
    async fn paraphrase(&self, text: &str, max: usize) -> Vec<String>;
}

/// Mock paraphraser returning fixed variants.
#[derive(Default)]
pub struct MockParaphraser {
    variants: Vec<String>,
}

impl MockParaphraser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variants(mut self, variants: &[&str]) -> Self {
        self.variants = variants.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[async_trait]
impl Paraphraser for MockParaphraser {
    async fn paraphrase(&self, _text: &str, max: usize) -> Vec<String> {
        self.variants.iter().take(max).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_caps_at_max() {
        let paraphraser = MockParaphraser::new().with_variants(&["a", "b", "c"]);
        assert_eq!(paraphraser.paraphrase("x", 2).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn default_mock_is_empty() {
        assert!(MockParaphraser::new().paraphrase("x", 2).await.is_empty());
    }
}
