//! Token-set similarity scoring used by PO matching.

use std::collections::HashSet;

/// Jaccard similarity over lower-cased, whitespace-tokenized word sets.
///
/// Returns a score in `[0, 1]`; 0.0 if either side has no tokens.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let a_words: HashSet<&str> = a.split_whitespace().collect();
    let b_words: HashSet<&str> = b.split_whitespace().collect();

    if a_words.is_empty() || b_words.is_empty() {
        return 0.0;
    }

    let intersection = a_words.intersection(&b_words).count();
    let union = a_words.union(&b_words).count();

    intersection as f64 / union as f64
}

/// Similarity between vendor names; same token-set measure as
/// [`text_similarity`].
pub fn vendor_similarity(a: &str, b: &str) -> f64 {
    text_similarity(a, b)
}
