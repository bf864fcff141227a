//! claimlens — evidence retrieval and conservative claim verification.
//!
//! Given a short factual claim, the engine expands it into diversified
//! search queries, collects and deduplicates candidate documents, ranks
//! overlapping passages by embedding similarity, scores each passage's
//! stance toward the claim, and resolves everything through an ordered,
//! conservative decision cascade into one verdict with a full evidence
//! audit trail.
//!
//! External services (search, article fetch, embeddings, stance
//! classification, paraphrasing) sit behind the traits in [`traits`];
//! the engine degrades gracefully when any of them is unavailable, down to
//! a pure lexical-overlap heuristic when the classifier cannot be reached.
//!
//! ```rust,ignore
//! use claimlens::{Engine, providers::*};
//! use std::sync::Arc;
//!
//! let engine = Engine::new(
//!     Arc::new(TavilySearchProvider::new(tavily_key)),
//!     Arc::new(HttpArticleFetcher::new()),
//!     Arc::new(HfEmbeddingModel::new(hf_key.clone())),
//!     Arc::new(HfStanceClassifier::new(hf_key)),
//! );
//! let verdict = engine.check("the mayor resigned").await;
//! println!("{:?}: {}", verdict.label, verdict.reasoning);
//! ```

pub mod aggregate;
pub mod cache;
pub mod engine;
pub mod error;
pub mod expand;
pub mod providers;
pub mod retrieve;
pub mod security;
pub mod similarity;
pub mod stance;
pub mod traits;
pub mod trust;
pub mod types;

pub use aggregate::aggregate as aggregate_records;
pub use cache::{CachedFetcher, FetchCache};
pub use engine::Engine;
pub use error::{ClassifierError, EmbeddingError, EngineError, FetchError, SearchError};
pub use expand::QueryExpander;
pub use retrieve::EvidenceRetriever;
pub use trust::TrustModel;
pub use types::{
    AggregateScores, CascadeConfig, Claim, Document, EngineConfig, EvidenceRecord, Passage,
    RankedPassage, Stance, StanceSource, Verdict, VerdictLabel,
};
