//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunable parameters for retrieval and aggregation.
///
/// Defaults reproduce the canonical tuning; every knob has a `with_*`
/// builder for tests and callers that need a different balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Global cap on deduplicated documents across all queries.
    pub max_documents: usize,

    /// Results requested per individual search query.
    pub per_query_limit: usize,

    /// Target passage length in characters.
    pub chunk_size: usize,

    /// Characters shared between consecutive passages of one document.
    pub chunk_overlap: usize,

    /// Number of top passages kept after similarity ranking.
    pub top_k: usize,

    /// Maximum paraphrase variants appended by query expansion.
    pub max_paraphrases: usize,

    /// Decision cascade thresholds.
    pub cascade: CascadeConfig,
}

/// Thresholds for the ordered decision cascade and evidence weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Minimum stance confidence for the fact-check short circuit.
    pub factcheck_min_confidence: f64,

    /// Domain trust at or above which a single record may decide alone.
    pub override_trust: f64,

    /// Weight a single high-trust record must exceed to decide alone.
    pub override_weight: f64,

    /// Domain trust at or above which a source counts as reputable.
    pub reputable_trust: f64,

    /// Reputable records required per stance for the majority rule.
    pub min_reputable_docs: usize,

    /// Margin one stance sum must hold over the other for the majority rule.
    pub reputable_margin: f64,

    /// Minimum stance sum for the weighted-dominance rule.
    pub min_aggregate_weight: f64,

    /// Margin for the weighted-dominance rule.
    pub dominance_margin: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_documents: 8,
            per_query_limit: 6,
            chunk_size: 900,
            chunk_overlap: 150,
            top_k: 6,
            max_paraphrases: 2,
            cascade: CascadeConfig::default(),
        }
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            factcheck_min_confidence: 0.35,
            override_trust: 0.99,
            override_weight: 0.6,
            reputable_trust: 0.8,
            min_reputable_docs: 2,
            reputable_margin: 1.25,
            min_aggregate_weight: 1.0,
            dominance_margin: 1.5,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_documents(mut self, max: usize) -> Self {
        self.max_documents = max;
        self
    }

    pub fn with_per_query_limit(mut self, limit: usize) -> Self {
        self.per_query_limit = limit;
        self
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_paraphrases(mut self, max: usize) -> Self {
        self.max_paraphrases = max;
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeConfig) -> Self {
        self.cascade = cascade;
        self
    }
}
