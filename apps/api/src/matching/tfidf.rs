//! Two-document TF-IDF model over unigrams and bigrams.
//!
//! A model is fitted on exactly one (left, right) document pair and thrown
//! away afterwards. Vocabulary and IDF never leak between pairs, so scores are
//! only comparable within one computation.
//!
//! Weighting:
//! - tf  = 1 + ln(count)                  (sublinear)
//! - idf = ln((1 + n) / (1 + df)) + 1     (smoothed, n = 2)
//! - each vector is L2-normalized, so cosine similarity is a dot product.

use std::collections::{BTreeMap, BTreeSet, HashMap};

const DOCUMENTS_PER_MODEL: f64 = 2.0;

/// Term → weight for one document. Only non-zero weights are stored.
/// Terms iterate in vocabulary order (lexicographic).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// The `n` highest-weighted terms. Equal weights keep vocabulary order.
    pub fn top_terms(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, f64)> = self.weights.iter().map(|(t, w)| (t, *w)).collect();
        // stable sort: ties stay in vocabulary order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(term, _)| term.clone())
            .collect()
    }
}

/// The two vectors produced by fitting one document pair.
#[derive(Debug, Clone, Default)]
pub struct PairModel {
    pub left: TermVector,
    pub right: TermVector,
}

impl PairModel {
    pub fn similarity(&self) -> f64 {
        cosine_similarity(&self.left, &self.right)
    }
}

/// Fits a fresh model over two token sequences (already produced by the tokenizer).
pub fn fit_pair(left_tokens: &[String], right_tokens: &[String]) -> PairModel {
    let left_counts = term_counts(left_tokens);
    let right_counts = term_counts(right_tokens);

    let vocabulary: BTreeSet<&str> = left_counts
        .keys()
        .chain(right_counts.keys())
        .map(String::as_str)
        .collect();

    let idf: HashMap<&str, f64> = vocabulary
        .iter()
        .map(|&term| {
            let df = [&left_counts, &right_counts]
                .iter()
                .filter(|counts| counts.contains_key(term))
                .count() as f64;
            let value = ((1.0 + DOCUMENTS_PER_MODEL) / (1.0 + df)).ln() + 1.0;
            (term, value)
        })
        .collect();

    PairModel {
        left: weigh(&left_counts, &idf),
        right: weigh(&right_counts, &idf),
    }
}

/// Cosine similarity of two weight vectors; 0 when either is the zero vector.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .weights
        .iter()
        .map(|(term, w)| w * large.weight(term))
        .sum();
    dot.clamp(0.0, 1.0)
}

/// Builds a model for one pair and scores it.
pub fn pair_similarity(left_tokens: &[String], right_tokens: &[String]) -> f64 {
    fit_pair(left_tokens, right_tokens).similarity()
}

/// Unigram and adjacent-bigram counts.
fn term_counts(tokens: &[String]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

fn weigh(counts: &HashMap<String, u32>, idf: &HashMap<&str, f64>) -> TermVector {
    let mut weights: BTreeMap<String, f64> = counts
        .iter()
        .map(|(term, &count)| {
            let tf = 1.0 + (count as f64).ln();
            let w = tf * idf.get(term.as_str()).copied().unwrap_or(0.0);
            (term.clone(), w)
        })
        .filter(|(_, w)| *w > 0.0)
        .collect();

    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weights.values_mut() {
            *w /= norm;
        }
    }
    TermVector { weights }
}
