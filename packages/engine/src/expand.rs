//! Query expansion: one claim, many search queries.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::traits::Paraphraser;
use crate::trust::FACTCHECK_DOMAINS;
use crate::types::Claim;

/// Turns a claim into an ordered, deduplicated set of search queries.
///
/// The base set probes different retrieval angles: the claim verbatim,
/// fact-check and hoax framings, an official-statement framing, an
/// exact-phrase search, and a query scoped to the trusted fact-check sites.
/// Order is preserved through deduplication (first occurrence wins) because
/// downstream document collection caps totals and fact-check prioritization
/// benefits from the scoped query running early enough to contribute.
pub struct QueryExpander {
    paraphraser: Option<Arc<dyn Paraphraser>>,
    max_paraphrases: usize,
}

impl QueryExpander {
    pub fn new() -> Self {
        Self {
            paraphraser: None,
            max_paraphrases: 2,
        }
    }

    /// Attach a paraphrase collaborator; its failures are silent.
    pub fn with_paraphraser(mut self, paraphraser: Arc<dyn Paraphraser>) -> Self {
        self.paraphraser = Some(paraphraser);
        self
    }

    pub fn with_max_paraphrases(mut self, max: usize) -> Self {
        self.max_paraphrases = max;
        self
    }

    /// Expand the claim into queries.
    pub async fn expand(&self, claim: &Claim) -> Vec<String> {
        let q = claim.as_str();
        let mut queries = vec![
            q.to_string(),
            format!("{q} fact check"),
            format!("{q} hoax"),
            format!("{q} police statement"),
            format!("\"{q}\""),
            site_scoped_query(q),
        ];

        if let Some(paraphraser) = &self.paraphraser {
            let variants = paraphraser.paraphrase(q, self.max_paraphrases).await;
            debug!(count = variants.len(), "paraphrase variants");
            for variant in variants {
                queries.push(variant.clone());
                queries.push(format!("{variant} fact check"));
            }
        }

        dedupe_preserving_order(queries)
    }
}

impl Default for QueryExpander {
    fn default() -> Self {
        Self::new()
    }
}

/// Disjunctive `site:` query over the fixed fact-check domains.
fn site_scoped_query(claim: &str) -> String {
    let sites = FACTCHECK_DOMAINS
        .iter()
        .map(|d| format!("site:{d}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{claim} {sites}")
}

fn dedupe_preserving_order(queries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    queries.into_iter().filter(|q| seen.insert(q.clone())).collect()
}
