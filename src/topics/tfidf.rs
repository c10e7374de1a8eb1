// TF-IDF document vectors.
//
// Each document is treated as a separate document for IDF over the batch
// being modeled: terms that appear in every document get weight zero, terms
// distinctive to a few documents are boosted. Vectors are sparse term maps
// truncated to the strongest terms and are never cached across batches.

use std::collections::{HashMap, HashSet};

use crate::text::{tokenize_with, Language};

/// Terms kept per document vector.
pub const MAX_TERMS_PER_DOCUMENT: usize = 100;

/// Sparse term -> weight vector.
pub type SparseVector = HashMap<String, f64>;

/// Content terms of `text`: lowercase, stopwords, numbers and one-letter
/// words removed.
pub fn document_terms<S: AsRef<str>>(text: &str, language: Language, custom: &[S]) -> Vec<String> {
    tokenize_with(text, language, custom)
        .into_iter()
        .filter(|t| !t.is_stopword)
        .map(|t| t.normalized)
        .filter(|w| w.chars().count() > 1 && !w.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Document frequency of every term over a batch of term lists.
pub fn document_frequency(docs: &[Vec<String>]) -> HashMap<String, usize> {
    let mut df = HashMap::new();
    for terms in docs {
        let unique: HashSet<&String> = terms.iter().collect();
        for term in unique {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }
    df
}

/// tf * ln(N / df) for the terms of one document, where tf is the term's
/// share of the document. Zero weights are dropped and only the `top_n`
/// strongest terms are kept.
pub fn tfidf_vector(
    terms: &[String],
    df: &HashMap<String, usize>,
    corpus_size: usize,
    top_n: usize,
) -> SparseVector {
    ranked_terms(terms, df, corpus_size, top_n).into_iter().collect()
}

/// Like `tfidf_vector` but ranked strongest first, ties alphabetical.
pub fn ranked_terms(
    terms: &[String],
    df: &HashMap<String, usize>,
    corpus_size: usize,
    top_n: usize,
) -> Vec<(String, f64)> {
    if terms.is_empty() || corpus_size == 0 {
        return Vec::new();
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in terms {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let total = terms.len() as f64;

    let mut weighted: Vec<(String, f64)> = counts
        .into_iter()
        .filter_map(|(term, count)| {
            let doc_freq = df.get(term).copied().unwrap_or(1).max(1);
            let idf = (corpus_size as f64 / doc_freq as f64).ln();
            let weight = count as f64 / total * idf;
            (weight > 0.0).then(|| (term.to_string(), weight))
        })
        .collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    weighted.truncate(top_n);
    weighted
}

/// Cosine similarity of two sparse vectors; 0 when either is empty.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, v)| large.get(k).map(|w| v * w))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn ubiquitous_terms_get_no_weight() {
        let docs = vec![terms(&["nebula", "comet"]), terms(&["nebula", "sourdough"])];
        let df = document_frequency(&docs);
        let v = tfidf_vector(&docs[0], &df, docs.len(), MAX_TERMS_PER_DOCUMENT);
        assert!(!v.contains_key("nebula"));
        let expected = 0.5 * 2f64.ln();
        assert!((v["comet"] - expected).abs() < 1e-12);
    }

    #[test]
    fn cosine_bounds() {
        let mut a = SparseVector::new();
        a.insert("x".into(), 1.0);
        let mut b = SparseVector::new();
        b.insert("y".into(), 2.0);
        assert_eq!(cosine(&a, &b), 0.0);
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&a, &SparseVector::new()), 0.0);
    }

    #[test]
    fn terms_drop_stopwords_and_numbers() {
        let t = document_terms::<&str>("The 42 nebula and a comet", Language::English, &[]);
        assert_eq!(t, vec!["nebula", "comet"]);
    }
}
