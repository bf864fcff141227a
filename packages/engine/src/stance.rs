//! Stance label normalization and the lexical fallback scorer.
//!
//! The normalizer is the boundary between whatever label set a classifier
//! model ships with and the canonical 3-way stance. Anything unrecognized
//! maps to NEI so unknown model output can never silently tip a verdict.

use std::collections::BTreeMap;

use crate::types::Stance;

/// Label→confidence map returned by a stance classifier.
///
/// A `BTreeMap` keeps iteration order deterministic, which makes the
/// best-label tie-break reproducible.
pub type StanceScores = BTreeMap<String, f64>;

/// Map arbitrary raw classifier label text to the canonical stance.
pub fn normalize_label(raw: &str) -> Stance {
    let upper = raw.to_uppercase();
    if upper.contains("SUPPORT") || upper.contains("ENTAIL") || upper.contains("TRUE") {
        return Stance::Support;
    }
    if upper.contains("REFUTE") || upper.contains("CONTRA") || upper.contains("FALSE") {
        return Stance::Refute;
    }
    Stance::Nei
}

/// Pick the highest-confidence label from a classifier's score map.
///
/// Ties break lexicographically by label (the map's order) so repeated runs
/// over identical scores choose identically. Empty maps yield `None`.
pub fn best_label(scores: &StanceScores) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (label, &confidence) in scores {
        match best {
            Some((_, best_confidence)) if confidence <= best_confidence => {}
            _ => best = Some((label.as_str(), confidence)),
        }
    }
    best
}

/// Token-overlap score between a claim and a passage of text.
///
/// Counts claim tokens (lower-cased alphanumeric runs longer than two
/// chars, with multiplicity) that also occur in the text, normalized by the
/// claim's token count. Always in [0, 1].
pub fn lexical_overlap(claim: &str, text: &str) -> f64 {
    let claim_tokens = token_counts(claim);
    let total: usize = claim_tokens.values().sum();
    if total == 0 {
        return 0.0;
    }

    let text_tokens = token_counts(text);
    let overlap: usize = claim_tokens
        .iter()
        .map(|(token, &count)| count.min(text_tokens.get(token).copied().unwrap_or(0)))
        .sum();

    overlap as f64 / total as f64
}

fn token_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    let lowered: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    for token in lowered.split_whitespace().filter(|t| t.len() > 2) {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}
