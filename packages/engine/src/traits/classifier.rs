//! Stance classifier trait and availability probe.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::ClassifierError;
use crate::stance::StanceScores;

/// NLI / zero-shot stance classifier collaborator.
#[async_trait]
pub trait StanceClassifier: Send + Sync {
    /// Score a passage against the claim over the classifier's label set.
    async fn classify(&self, claim: &str, passage: &str) -> Result<StanceScores, ClassifierError>;

    /// Cheap reachability probe, called once before committing to a full
    /// model-backed pass. A false answer routes the run to the lexical
    /// fallback scorer.
    async fn is_available(&self) -> bool;
}

/// Mock classifier: canned scores per passage-substring, configurable
/// availability.
pub struct MockStanceClassifier {
    /// (passage substring, scores); first matching entry wins.
    scores: RwLock<Vec<(String, StanceScores)>>,
    available: bool,
    /// Every classify call fails when set, even while "available".
    fail_calls: bool,
}

impl Default for MockStanceClassifier {
    fn default() -> Self {
        Self {
            scores: RwLock::new(Vec::new()),
            available: true,
            fail_calls: false,
        }
    }
}

impl MockStanceClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned scores for passages containing `substring`.
    pub fn with_scores(self, substring: &str, scores: &[(&str, f64)]) -> Self {
        let map: StanceScores = scores.iter().map(|(l, c)| (l.to_string(), *c)).collect();
        self.scores.write().unwrap().push((substring.to_string(), map));
        self
    }

    /// Report the backend as unreachable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Pass the probe but fail every classify call.
    pub fn failing_calls(mut self) -> Self {
        self.fail_calls = true;
        self
    }
}

#[async_trait]
impl StanceClassifier for MockStanceClassifier {
    async fn classify(&self, _claim: &str, passage: &str) -> Result<StanceScores, ClassifierError> {
        if self.fail_calls {
            return Err(ClassifierError::Api {
                status: 503,
                body: "model loading".to_string(),
            });
        }
        let guard = self.scores.read().unwrap();
        for (substring, scores) in guard.iter() {
            if passage.contains(substring.as_str()) {
                return Ok(scores.clone());
            }
        }
        // unmatched passages read as neutral
        Ok([("not enough evidence".to_string(), 0.9)].into_iter().collect())
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stance::best_label;

    #[tokio::test]
    async fn canned_scores_match_by_substring() {
        let classifier = MockStanceClassifier::new()
            .with_scores("resigned", &[("supports", 0.9), ("refutes", 0.05)]);

        let scores = classifier
            .classify("X resigned", "the mayor resigned yesterday")
            .await
            .unwrap();
        assert_eq!(best_label(&scores), Some(("supports", 0.9)));
    }

    #[tokio::test]
    async fn unmatched_passage_reads_neutral() {
        let classifier = MockStanceClassifier::new();
        let scores = classifier.classify("claim", "unrelated text").await.unwrap();
        assert_eq!(best_label(&scores), Some(("not enough evidence", 0.9)));
    }

    #[tokio::test]
    async fn probe_reflects_configured_availability() {
        assert!(MockStanceClassifier::new().is_available().await);
        assert!(!MockStanceClassifier::new().unavailable().is_available().await);
    }
}
