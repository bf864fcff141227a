//! Evidence retrieval: multi-query document collection and passage ranking.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{EmbeddingError, Result};
use crate::similarity::PassageIndex;
use crate::traits::{ArticleFetcher, EmbeddingModel, SearchProvider};
use crate::trust::factcheck_rank;
use crate::types::{chunk_text, Claim, Document, EngineConfig, Passage, RankedPassage};

/// Drives the search and fetch collaborators across all expanded queries and
/// ranks the resulting passages against the claim.
pub struct EvidenceRetriever {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn ArticleFetcher>,
    embedder: Arc<dyn EmbeddingModel>,
    config: EngineConfig,
}

impl EvidenceRetriever {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ArticleFetcher>,
        embedder: Arc<dyn EmbeddingModel>,
        config: EngineConfig,
    ) -> Self {
        Self {
            search,
            fetcher,
            embedder,
            config,
        }
    }

    /// Run every query, deduplicate by exact URL, and cap the total.
    ///
    /// The dedup set is owned by this loop; queries run in order so earlier
    /// queries claim contested slots. After collection, documents from
    /// fact-check hosts are stable-sorted to the front so downstream
    /// trust-override rules see them without discarding other evidence.
    pub async fn collect_documents(&self, queries: &[String]) -> Vec<Document> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut documents: Vec<Document> = Vec::new();

        'queries: for query in queries {
            let hits = match self.search.search(query, self.config.per_query_limit).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(query = %query, error = %e, "search query failed, skipping");
                    continue;
                }
            };

            for hit in hits {
                if hit.url.is_empty() || !seen.insert(hit.url.clone()) {
                    continue;
                }
                let mut doc = Document::new(hit.url, hit.title, hit.snippet);
                doc.published_at = hit.published_at;
                documents.push(doc);
                if documents.len() >= self.config.max_documents {
                    break 'queries;
                }
            }
        }

        // fact-check hosts first; ties keep collection order (stable sort)
        documents.sort_by_key(|d| match factcheck_rank(&d.url) {
            Some(rank) => -10 + rank as i64,
            None => 0,
        });

        info!(count = documents.len(), "collected candidate documents");
        documents
    }

    /// Fetch article text for each document concurrently.
    ///
    /// Failed or empty fetches drop their document; that is a per-source
    /// loss, never a pipeline error.
    pub async fn fetch_texts(&self, documents: Vec<Document>) -> Vec<Document> {
        let fetches = documents.into_iter().map(|mut doc| {
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                match fetcher.fetch(&doc.url).await {
                    Ok(article) if article.has_text() => {
                        if doc.title.is_empty() {
                            doc.title = article.title;
                        }
                        doc.text = Some(article.text);
                        Some(doc)
                    }
                    Ok(_) => {
                        debug!(url = %doc.url, "article had no text, dropping");
                        None
                    }
                    Err(e) => {
                        warn!(url = %doc.url, error = %e, "article fetch failed, dropping");
                        None
                    }
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Chunk, embed, and rank passages by cosine similarity to the claim.
    ///
    /// Returns the top-K passages, ties broken by first-seen order. An
    /// empty result means no document yielded text; the caller treats that
    /// as "no evidence retrievable", not an error.
    pub async fn rank_passages(
        &self,
        claim: &Claim,
        documents: &[Document],
    ) -> Result<Vec<RankedPassage>> {
        let mut passages: Vec<Passage> = Vec::new();
        for doc in documents {
            let Some(text) = &doc.text else { continue };
            for (offset, chunk) in chunk_text(text, self.config.chunk_size, self.config.chunk_overlap)
                .into_iter()
                .enumerate()
            {
                passages.push(Passage {
                    document_url: doc.url.clone(),
                    document_title: doc.title.clone(),
                    published_at: doc.published_at.clone(),
                    text: chunk,
                    offset,
                });
            }
        }

        if passages.is_empty() {
            return Ok(Vec::new());
        }

        // one batch: every passage plus the claim as the final entry
        let mut texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        texts.push(claim.as_str().to_string());

        let mut vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            ))
            .into());
        }

        let claim_vector = vectors.pop().expect("claim vector present");
        let mut index = PassageIndex::new();
        for vector in vectors {
            index.add(vector);
        }

        let ranked = index
            .top_k(&claim_vector, self.config.top_k)
            .into_iter()
            .map(|(i, score)| RankedPassage {
                passage: passages[i].clone(),
                similarity: score.clamp(0.0, 1.0) as f64,
            })
            .collect();

        Ok(ranked)
    }

    /// Full retrieval: collect, fetch, rank.
    pub async fn retrieve(
        &self,
        claim: &Claim,
        queries: &[String],
    ) -> Result<Vec<RankedPassage>> {
        let documents = self.collect_documents(queries).await;
        let documents = self.fetch_texts(documents).await;
        self.rank_passages(claim, &documents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockArticleFetcher, MockEmbeddingModel, MockSearchProvider, SearchHit};

    fn retriever(
        search: MockSearchProvider,
        fetcher: MockArticleFetcher,
        config: EngineConfig,
    ) -> EvidenceRetriever {
        EvidenceRetriever::new(
            Arc::new(search),
            Arc::new(fetcher),
            Arc::new(MockEmbeddingModel::new()),
            config,
        )
    }

    #[tokio::test]
    async fn overlapping_queries_dedupe_by_url() {
        let search = MockSearchProvider::new()
            .with_urls("q1", &["https://a.com/1", "https://b.com/2"])
            .with_urls("q2", &["https://b.com/2", "https://c.com/3"]);
        let r = retriever(search, MockArticleFetcher::new(), EngineConfig::default());

        let docs = r.collect_documents(&["q1".into(), "q2".into()]).await;
        let urls: Vec<_> = docs.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com/1", "https://b.com/2", "https://c.com/3"]);
    }

    #[tokio::test]
    async fn published_at_flows_from_hit_to_document() {
        let hit = SearchHit::new("https://a.com/1")
            .with_title("Title")
            .with_snippet("snippet")
            .with_published_at("2024-03-01");
        let search = MockSearchProvider::new().with_results("q", vec![hit]);
        let r = retriever(search, MockArticleFetcher::new(), EngineConfig::default());

        let docs = r.collect_documents(&["q".into()]).await;
        assert_eq!(docs[0].published_at.as_deref(), Some("2024-03-01"));
        assert_eq!(docs[0].title, "Title");
    }

    #[tokio::test]
    async fn collection_stops_at_document_cap() {
        let search = MockSearchProvider::new()
            .with_urls("q1", &["https://a.com/1", "https://b.com/2", "https://c.com/3"])
            .with_urls("q2", &["https://d.com/4"]);
        let config = EngineConfig::default().with_max_documents(2);
        let r = retriever(search, MockArticleFetcher::new(), config);

        let docs = r.collect_documents(&["q1".into(), "q2".into()]).await;
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn factcheck_documents_sort_first_stably() {
        let search = MockSearchProvider::new().with_urls(
            "q",
            &[
                "https://blog.net/a",
                "https://www.politifact.com/b",
                "https://other.net/c",
                "https://snopes.com/d",
            ],
        );
        let r = retriever(search, MockArticleFetcher::new(), EngineConfig::default());

        let docs = r.collect_documents(&["q".into()]).await;
        let urls: Vec<_> = docs.iter().map(|d| d.url.as_str()).collect();
        // snopes (rank 0) before politifact (rank 1); the rest keep order
        assert_eq!(
            urls,
            vec![
                "https://snopes.com/d",
                "https://www.politifact.com/b",
                "https://blog.net/a",
                "https://other.net/c",
            ]
        );
    }

    #[tokio::test]
    async fn failed_search_query_is_skipped() {
        let search = MockSearchProvider::new()
            .with_urls("good", &["https://a.com/1"])
            .failing_unknown_queries();
        let r = retriever(search, MockArticleFetcher::new(), EngineConfig::default());

        let docs = r.collect_documents(&["bad".into(), "good".into()]).await;
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn failed_fetches_drop_documents_silently() {
        let search = MockSearchProvider::new().with_urls("q", &["https://a.com/1", "https://b.com/2"]);
        let fetcher = MockArticleFetcher::new().with_text("https://a.com/1", "A", "some body text");
        let r = retriever(search, fetcher, EngineConfig::default());

        let docs = r.collect_documents(&["q".into()]).await;
        let docs = r.fetch_texts(docs).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://a.com/1");
    }

    #[tokio::test]
    async fn no_text_yields_empty_ranking() {
        let r = retriever(
            MockSearchProvider::new(),
            MockArticleFetcher::new(),
            EngineConfig::default(),
        );
        let claim = Claim::new("anything");
        let ranked = r.retrieve(&claim, &["q".into()]).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn ranking_returns_at_most_top_k() {
        let long_text = "sentence about local politics. ".repeat(200);
        let search = MockSearchProvider::new().with_urls("q", &["https://a.com/1"]);
        let fetcher = MockArticleFetcher::new().with_text("https://a.com/1", "A", &long_text);
        let config = EngineConfig::default().with_top_k(3);
        let r = retriever(search, fetcher, config);

        let claim = Claim::new("local politics");
        let ranked = r.retrieve(&claim, &["q".into()]).await.unwrap();
        assert_eq!(ranked.len(), 3);
        // scores are descending
        assert!(ranked[0].similarity >= ranked[1].similarity);
        assert!(ranked[1].similarity >= ranked[2].similarity);
    }

    #[tokio::test]
    async fn identical_passage_and_claim_rank_at_similarity_one() {
        let search = MockSearchProvider::new().with_urls("q", &["https://a.com/1"]);
        let fetcher = MockArticleFetcher::new().with_text("https://a.com/1", "A", "exact claim text");
        let r = retriever(search, fetcher, EngineConfig::default());

        let claim = Claim::new("exact claim text");
        let ranked = r.retrieve(&claim, &["q".into()]).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].similarity - 1.0).abs() < 1e-5);
    }
}
