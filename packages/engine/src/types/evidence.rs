//! Scored evidence records and the verdict output contract.

use serde::{Deserialize, Serialize};

/// The logical relationship a passage expresses toward the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Support,
    Refute,
    /// Not enough evidence / neutral. The conservative default for any
    /// label the normalizer does not recognize.
    Nei,
}

/// How stance confidences were produced for a run.
///
/// Chosen once per run by the availability probe, never re-decided
/// mid-pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StanceSource {
    /// Backed by the NLI/zero-shot classifier.
    ModelBacked,
    /// Token-overlap heuristic; the classifier backend was unreachable.
    LexicalHeuristic,
}

/// The atomic unit of scored evidence, one per ranked passage.
///
/// Created once, never mutated. `weight` is the product of the five factor
/// fields; every factor is independently bounded so the weight is always
/// non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub source_url: String,
    pub title: String,
    pub stance: Stance,
    pub stance_confidence: f64,
    pub similarity: f64,
    pub domain_trust: f64,
    pub recency_factor: f64,
    pub reporting_penalty: f64,
    pub weight: f64,
}

impl EvidenceRecord {
    /// Build a record, deriving the weight from the factor product.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_url: impl Into<String>,
        title: impl Into<String>,
        stance: Stance,
        stance_confidence: f64,
        similarity: f64,
        domain_trust: f64,
        recency_factor: f64,
        reporting_penalty: f64,
    ) -> Self {
        let weight = similarity * stance_confidence * domain_trust * recency_factor * reporting_penalty;
        Self {
            source_url: source_url.into(),
            title: title.into(),
            stance,
            stance_confidence,
            similarity,
            domain_trust,
            recency_factor,
            reporting_penalty,
            weight,
        }
    }
}

/// Per-stance weighted sums accumulated over one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateScores {
    pub supports_sum: f64,
    pub refutes_sum: f64,
    pub nei_sum: f64,
}

impl AggregateScores {
    /// Add a record's weight to the sum matching its stance.
    pub fn accumulate(&mut self, record: &EvidenceRecord) {
        match record.stance {
            Stance::Support => self.supports_sum += record.weight,
            Stance::Refute => self.refutes_sum += record.weight,
            Stance::Nei => self.nei_sum += record.weight,
        }
    }
}

/// Final verdict labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictLabel {
    Supported,
    Refuted,
    NotEnoughEvidence,
}

/// Terminal output of a claim check.
///
/// This serialized shape is the sole contract the presentation layer
/// depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "verdict")]
    pub label: VerdictLabel,
    pub reasoning: String,
    /// Absent when the run ended before stance scoring (no evidence, or an
    /// internal error).
    pub source: Option<StanceSource>,
    pub scores: AggregateScores,
    pub evidence: Vec<EvidenceRecord>,
}

impl Verdict {
    /// A Not-enough-evidence verdict with no evidence trail.
    pub fn not_enough_evidence(reasoning: impl Into<String>, source: Option<StanceSource>) -> Self {
        Self {
            label: VerdictLabel::NotEnoughEvidence,
            reasoning: reasoning.into(),
            source,
            scores: AggregateScores::default(),
            evidence: Vec::new(),
        }
    }
}
