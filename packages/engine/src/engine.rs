//! Engine orchestration: one claim in, one verdict out.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::aggregate::aggregate;
use crate::error::Result as EngineResult;
use crate::expand::QueryExpander;
use crate::retrieve::EvidenceRetriever;
use crate::stance::{best_label, lexical_overlap, normalize_label};
use crate::traits::{ArticleFetcher, EmbeddingModel, Paraphraser, SearchProvider, StanceClassifier};
use crate::trust::TrustModel;
use crate::types::{
    AggregateScores, Claim, EngineConfig, EvidenceRecord, RankedPassage, Stance, StanceSource,
    Verdict, VerdictLabel,
};

/// Lexical fallback thresholds on the best claim/passage token overlap.
const OVERLAP_SUPPORTED: f64 = 0.3;
const OVERLAP_RELATED: f64 = 0.08;

/// The claim verification engine.
///
/// Collaborators are injected as trait handles; there is no module-level
/// client state, so tests substitute doubles freely and two engines never
/// share anything.
pub struct Engine {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn ArticleFetcher>,
    embedder: Arc<dyn EmbeddingModel>,
    classifier: Arc<dyn StanceClassifier>,
    paraphraser: Option<Arc<dyn Paraphraser>>,
    trust: TrustModel,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ArticleFetcher>,
        embedder: Arc<dyn EmbeddingModel>,
        classifier: Arc<dyn StanceClassifier>,
    ) -> Self {
        Self {
            search,
            fetcher,
            embedder,
            classifier,
            paraphraser: None,
            trust: TrustModel::default(),
            config: EngineConfig::default(),
        }
    }

    /// Attach the optional paraphrase collaborator.
    pub fn with_paraphraser(mut self, paraphraser: Arc<dyn Paraphraser>) -> Self {
        self.paraphraser = Some(paraphraser);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_trust_model(mut self, trust: TrustModel) -> Self {
        self.trust = trust;
        self
    }

    /// Check a claim. Never fails: any internal error becomes a
    /// Not-enough-evidence verdict carrying the error text.
    pub async fn check(&self, raw_claim: &str) -> Verdict {
        match self.check_inner(raw_claim).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(error = %e, "claim check failed internally");
                Verdict::not_enough_evidence(format!("Internal error: {e}"), None)
            }
        }
    }

    async fn check_inner(&self, raw_claim: &str) -> EngineResult<Verdict> {
        let claim = Claim::new(raw_claim);
        info!(claim = %claim, "checking claim");

        let mut expander = QueryExpander::new().with_max_paraphrases(self.config.max_paraphrases);
        if let Some(paraphraser) = &self.paraphraser {
            expander = expander.with_paraphraser(Arc::clone(paraphraser));
        }
        let queries = expander.expand(&claim).await;

        let retriever = EvidenceRetriever::new(
            Arc::clone(&self.search),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.embedder),
            self.config.clone(),
        );
        let ranked = retriever.retrieve(&claim, &queries).await?;

        if ranked.is_empty() {
            info!("no evidence retrievable");
            return Ok(Verdict::not_enough_evidence("No articles retrieved.", None));
        }

        // one probe decides the stance source for the whole run
        let now = Utc::now();
        if self.classifier.is_available().await {
            let records = self.classify_passages(&claim, &ranked, now).await;
            if !records.is_empty() {
                return Ok(aggregate(records, &self.config.cascade, StanceSource::ModelBacked));
            }
            warn!("every classification failed; falling back to lexical scorer");
        } else {
            info!("classifier unavailable; using lexical scorer");
        }

        Ok(self.lexical_verdict(&claim, &ranked, now))
    }

    /// Classify ranked passages concurrently; failed calls drop their
    /// passage.
    async fn classify_passages(
        &self,
        claim: &Claim,
        ranked: &[RankedPassage],
        now: DateTime<Utc>,
    ) -> Vec<EvidenceRecord> {
        let classifications = ranked.iter().map(|rp| {
            let classifier = Arc::clone(&self.classifier);
            async move {
                match classifier.classify(claim.as_str(), &rp.passage.text).await {
                    Ok(scores) => Some((rp, scores)),
                    Err(e) => {
                        warn!(url = %rp.passage.document_url, error = %e, "classification failed, skipping passage");
                        None
                    }
                }
            }
        });

        join_all(classifications)
            .await
            .into_iter()
            .flatten()
            .filter_map(|(rp, scores)| {
                let (label, confidence) = best_label(&scores)?;
                Some(self.build_record(rp, normalize_label(label), confidence, now))
            })
            .collect()
    }

    /// Degraded scoring from claim/passage token overlap.
    ///
    /// The verdict comes straight from the best overlap score, not the
    /// cascade; the reasoning states that a heuristic was used.
    fn lexical_verdict(&self, claim: &Claim, ranked: &[RankedPassage], now: DateTime<Utc>) -> Verdict {
        let mut best: Option<(usize, f64)> = None;
        let mut records = Vec::with_capacity(ranked.len());

        for (i, rp) in ranked.iter().enumerate() {
            let overlap = lexical_overlap(claim.as_str(), &rp.passage.text);
            if best.map_or(true, |(_, score)| overlap > score) {
                best = Some((i, overlap));
            }
            let stance = if overlap > OVERLAP_SUPPORTED {
                Stance::Support
            } else {
                Stance::Nei
            };
            records.push(self.build_record(rp, stance, overlap, now));
        }

        let mut scores = AggregateScores::default();
        for record in &records {
            scores.accumulate(record);
        }

        let (index, score) = best.expect("ranked passages are nonempty");
        let title = &ranked[index].passage.document_title;
        let (label, reasoning) = if score > OVERLAP_SUPPORTED {
            (
                VerdictLabel::Supported,
                format!("Heuristic fallback (no model): high keyword overlap with '{title}' (score={score:.2})"),
            )
        } else if score > OVERLAP_RELATED {
            (
                VerdictLabel::NotEnoughEvidence,
                format!("Heuristic fallback (no model): possibly related coverage in '{title}' (score={score:.2})"),
            )
        } else {
            (
                VerdictLabel::NotEnoughEvidence,
                format!("Heuristic fallback (no model): low keyword overlap across retrieved articles (best score={score:.2})"),
            )
        };

        Verdict {
            label,
            reasoning,
            source: Some(StanceSource::LexicalHeuristic),
            scores,
            evidence: records,
        }
    }

    fn build_record(
        &self,
        rp: &RankedPassage,
        stance: Stance,
        confidence: f64,
        now: DateTime<Utc>,
    ) -> EvidenceRecord {
        let url = &rp.passage.document_url;
        EvidenceRecord::new(
            url.clone(),
            rp.passage.document_title.clone(),
            stance,
            confidence,
            rp.similarity,
            self.trust.domain_trust(url),
            self.trust
                .recency_factor_at(rp.passage.published_at.as_deref(), now),
            self.trust.reporting_penalty(&rp.passage.text),
        )
    }
}
