//! Retrieved documents and their passages.

use serde::{Deserialize, Serialize};

/// A candidate evidentiary document discovered via search.
///
/// Identity is the exact URL string; deduplication across queries compares
/// URLs verbatim. `text` stays `None` until the article fetch succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Loosely formatted publish timestamp as the search provider gave it.
    pub published_at: Option<String>,
    /// Full article text, present after a successful fetch.
    pub text: Option<String>,
}

impl Document {
    pub fn new(url: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
            published_at: None,
            text: None,
        }
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A contiguous chunk of one document's text.
///
/// Carries enough document metadata to score trust and recency without a
/// lookup back into the document list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub document_url: String,
    pub document_title: String,
    pub published_at: Option<String>,
    pub text: String,
    /// Position of this chunk within its document (0-based).
    pub offset: usize,
}

/// A passage together with its cosine similarity to the claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPassage {
    pub passage: Passage,
    /// Inner product of the L2-normalized claim and passage vectors.
    pub similarity: f64,
}

/// Split text into chunks of at most `chunk_size` characters with `overlap`
/// characters shared between consecutive chunks.
///
/// Operates on byte offsets snapped to char boundaries so multi-byte text
/// never splits inside a code point. Empty chunks after trimming are
/// dropped.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = snap_to_char_boundary(text, (start + chunk_size).min(text.len()));
        let chunk = text[start..end].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        start = snap_to_char_boundary(text, start + step);
    }

    chunks
}

fn snap_to_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos.min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_overlap_by_configured_amount() {
        let text = "a".repeat(2000);
        let chunks = chunk_text(&text, 900, 150);

        assert_eq!(chunks[0].len(), 900);
        // second chunk starts at 750, so the first 150 chars repeat
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].len(), 900);
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunks = chunk_text("short text", 900, 150);
        assert_eq!(chunks, vec!["short text"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 900, 150).is_empty());
        assert!(chunk_text("   ", 900, 150).is_empty());
    }

    #[test]
    fn multibyte_text_does_not_split_codepoints() {
        let text = "é".repeat(1000);
        let chunks = chunk_text(&text, 900, 150);
        assert!(!chunks.is_empty());
        for c in &chunks {
            assert!(c.chars().all(|ch| ch == 'é'));
        }
    }
}
