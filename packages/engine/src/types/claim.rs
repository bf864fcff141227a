//! The claim under verification.

use serde::{Deserialize, Serialize};

/// A normalized factual claim.
///
/// Construction normalizes the raw text once; the claim is immutable after
/// that. Normalization collapses whitespace and strips punctuation except
/// hyphens and apostrophes, so that search queries and overlap tokenization
/// see the same surface form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim(String);

impl Claim {
    /// Create a claim from raw user text.
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// The normalized claim text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization left any text at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collapse whitespace and strip punctuation except `-` and `'`.
fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_newlines() {
        let claim = Claim::new("X  resigned\n\nyesterday");
        assert_eq!(claim.as_str(), "X resigned yesterday");
    }

    #[test]
    fn strips_punctuation_but_keeps_hyphen_apostrophe() {
        let claim = Claim::new("O'Brien's co-founder \"quit\", reportedly!");
        assert_eq!(claim.as_str(), "O'Brien's co-founder quit reportedly");
    }

    #[test]
    fn empty_input_yields_empty_claim() {
        assert!(Claim::new("  ...  ").is_empty());
    }
}
