//! TF-IDF cosine similarity between two free-text documents.
//!
//! Term weights follow the usual smoothed scheme:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, raw counts for tf, and each
//! document vector L2-normalised before the dot product.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"))
}

/// Lower-cased word tokens of at least two characters.
fn terms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of the TF-IDF vectors of `a` and `b`, in [0, 1].
/// Returns 0.0 when either text is empty or has no usable terms.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    let tokens_a = terms(a);
    let tokens_b = terms(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(&tokens_a);
    let counts_b = term_counts(&tokens_b);

    let vocabulary: BTreeSet<&str> = counts_a.keys().chain(counts_b.keys()).copied().collect();
    let n_docs = 2.0_f64;

    let mut vec_a = Vec::with_capacity(vocabulary.len());
    let mut vec_b = Vec::with_capacity(vocabulary.len());
    for term in &vocabulary {
        let tf_a = counts_a.get(term).copied().unwrap_or(0.0);
        let tf_b = counts_b.get(term).copied().unwrap_or(0.0);
        let df = (tf_a > 0.0) as u8 as f64 + (tf_b > 0.0) as u8 as f64;
        let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
        vec_a.push(tf_a * idf);
        vec_b.push(tf_b * idf);
    }

    let norm_a = vec_a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = vec_b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = vec_a.iter().zip(&vec_b).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
