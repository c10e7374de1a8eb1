// Topic model assembly: vectors -> clusters -> labelled topics.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::kmeans::{KMeans, DEFAULT_MAX_ITERATIONS};
use super::tfidf::{document_frequency, document_terms, ranked_terms, tfidf_vector, MAX_TERMS_PER_DOCUMENT};
use crate::text::Language;

/// One input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopicModelOptions {
    /// Cluster count. `None` picks `min(10, max(2, n / 5))`.
    pub num_topics: Option<usize>,
    pub min_cluster_size: usize,
    pub top_keywords: usize,
    pub max_iterations: usize,
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub deadline: Option<Duration>,
    pub language: Language,
    pub custom_stopwords: Vec<String>,
}

impl Default for TopicModelOptions {
    fn default() -> Self {
        Self {
            num_topics: None,
            min_cluster_size: 2,
            top_keywords: 10,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
            deadline: None,
            language: Language::English,
            custom_stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: usize,
    pub label: String,
    pub keywords: Vec<String>,
    pub keyword_scores: Vec<f64>,
    pub document_count: usize,
    pub coherence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub document_id: String,
    /// `None` for outliers.
    pub topic_id: Option<usize>,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub avg_coherence: f64,
    pub topic_diversity: f64,
    pub iterations: usize,
    pub converged: bool,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicModelResult {
    pub topics: Vec<Topic>,
    pub assignments: Vec<TopicAssignment>,
    pub outlier_documents: Vec<String>,
    pub model_metrics: ModelMetrics,
}

/// Default cluster count for a corpus of `n` documents.
pub fn default_topic_count(n: usize) -> usize {
    (n / 5).max(2).min(10)
}

/// Human-readable label from the strongest keywords.
pub fn generate_topic_label(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(3)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Cluster `documents` into topics. Total: a corpus smaller than
/// `min_cluster_size` yields no topics and every document as an outlier.
pub fn build_topic_model(documents: &[Document], options: &TopicModelOptions) -> TopicModelResult {
    let seed = options.seed.unwrap_or_else(rand::random);
    let min_size = options.min_cluster_size.max(1);

    if documents.is_empty() || documents.len() < min_size {
        return all_outliers(documents, seed);
    }

    let terms: Vec<Vec<String>> = documents
        .iter()
        .map(|d| document_terms(&d.text, options.language, &options.custom_stopwords))
        .collect();
    let df = document_frequency(&terms);
    let n = documents.len();
    let vectors: Vec<_> = terms
        .iter()
        .map(|t| tfidf_vector(t, &df, n, MAX_TERMS_PER_DOCUMENT))
        .collect();

    // Documents with no weighted terms cannot be placed by cosine.
    let clusterable: Vec<usize> = (0..n).filter(|&i| !vectors[i].is_empty()).collect();
    let k = options.num_topics.unwrap_or_else(|| default_topic_count(n)).max(1);

    let mut kmeans = KMeans::new(k, seed);
    kmeans.max_iterations = options.max_iterations;
    kmeans.deadline = options.deadline;
    let input: Vec<_> = clusterable.iter().map(|&i| vectors[i].clone()).collect();
    let clustering = kmeans.fit(&input);

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); clustering.centroids.len()];
    for (pos, &cluster) in clustering.assignments.iter().enumerate() {
        members[cluster].push(clusterable[pos]);
    }
    let mut surviving: Vec<Vec<usize>> = members.into_iter().filter(|m| m.len() >= min_size).collect();
    surviving.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

    let mut topic_of: Vec<Option<usize>> = vec![None; n];
    let mut topics = Vec::with_capacity(surviving.len());
    for (id, docs) in surviving.iter().enumerate() {
        for &d in docs {
            topic_of[d] = Some(id);
        }
        topics.push(build_topic(id, docs, &terms, &df, n, options.top_keywords));
    }

    let mut similarity = vec![0.0; n];
    for (pos, &doc) in clusterable.iter().enumerate() {
        similarity[doc] = clustering.similarities[pos];
    }
    let assignments: Vec<TopicAssignment> = documents
        .iter()
        .enumerate()
        .map(|(i, d)| TopicAssignment {
            document_id: d.id.clone(),
            topic_id: topic_of[i],
            similarity: if topic_of[i].is_some() { similarity[i] } else { 0.0 },
        })
        .collect();
    let outlier_documents: Vec<String> = assignments
        .iter()
        .filter(|a| a.topic_id.is_none())
        .map(|a| a.document_id.clone())
        .collect();

    let model_metrics = metrics(&topics, options.top_keywords, clustering.iterations, clustering.converged, seed);

    info!(
        documents = n,
        topics = topics.len(),
        outliers = outlier_documents.len(),
        iterations = model_metrics.iterations,
        converged = model_metrics.converged,
        "Built topic model"
    );

    TopicModelResult {
        topics,
        assignments,
        outlier_documents,
        model_metrics,
    }
}

fn all_outliers(documents: &[Document], seed: u64) -> TopicModelResult {
    TopicModelResult {
        topics: Vec::new(),
        assignments: documents
            .iter()
            .map(|d| TopicAssignment {
                document_id: d.id.clone(),
                topic_id: None,
                similarity: 0.0,
            })
            .collect(),
        outlier_documents: documents.iter().map(|d| d.id.clone()).collect(),
        model_metrics: ModelMetrics {
            converged: true,
            seed,
            ..ModelMetrics::default()
        },
    }
}

fn build_topic(
    id: usize,
    docs: &[usize],
    terms: &[Vec<String>],
    df: &std::collections::HashMap<String, usize>,
    corpus_size: usize,
    top_keywords: usize,
) -> Topic {
    let combined: Vec<String> = docs.iter().flat_map(|&d| terms[d].iter().cloned()).collect();
    let ranked = ranked_terms(&combined, df, corpus_size, top_keywords);
    let keywords: Vec<String> = ranked.iter().map(|(t, _)| t.clone()).collect();
    let keyword_scores: Vec<f64> = ranked.iter().map(|(_, s)| *s).collect();

    let member_sets: Vec<HashSet<&str>> = docs
        .iter()
        .map(|&d| terms[d].iter().map(|s| s.as_str()).collect())
        .collect();

    Topic {
        id,
        label: generate_topic_label(&keywords),
        coherence_score: coherence(&keywords, &member_sets),
        keywords,
        keyword_scores,
        document_count: docs.len(),
    }
}

/// Fraction of keyword pairs that appear together in at least one member
/// document.
fn coherence(keywords: &[String], member_sets: &[HashSet<&str>]) -> f64 {
    let mut pairs = 0usize;
    let mut together = 0usize;
    for (i, a) in keywords.iter().enumerate() {
        for b in &keywords[i + 1..] {
            pairs += 1;
            if member_sets
                .iter()
                .any(|set| set.contains(a.as_str()) && set.contains(b.as_str()))
            {
                together += 1;
            }
        }
    }
    if pairs == 0 {
        0.0
    } else {
        together as f64 / pairs as f64
    }
}

fn metrics(topics: &[Topic], top_keywords: usize, iterations: usize, converged: bool, seed: u64) -> ModelMetrics {
    if topics.is_empty() {
        return ModelMetrics {
            iterations,
            converged,
            seed,
            ..ModelMetrics::default()
        };
    }
    let avg_coherence = topics.iter().map(|t| t.coherence_score).sum::<f64>() / topics.len() as f64;
    let unique: BTreeSet<&str> = topics
        .iter()
        .flat_map(|t| t.keywords.iter().map(|k| k.as_str()))
        .collect();
    let capacity = topics.len() * top_keywords;
    let topic_diversity = if capacity == 0 {
        0.0
    } else {
        unique.len() as f64 / capacity as f64
    };
    ModelMetrics {
        avg_coherence,
        topic_diversity,
        iterations,
        converged,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topic_count_bounds() {
        assert_eq!(default_topic_count(0), 2);
        assert_eq!(default_topic_count(14), 2);
        assert_eq!(default_topic_count(25), 5);
        assert_eq!(default_topic_count(500), 10);
    }

    #[test]
    fn label_joins_top_three() {
        let kw: Vec<String> = ["comet", "orbit", "nebula", "galaxy"].iter().map(|s| s.to_string()).collect();
        assert_eq!(generate_topic_label(&kw), "comet / orbit / nebula");
        assert_eq!(generate_topic_label(&kw[..1]), "comet");
    }

    #[test]
    fn coherence_counts_cooccurring_pairs() {
        let kw: Vec<String> = ["comet", "orbit", "flour"].iter().map(|s| s.to_string()).collect();
        let sets = vec![
            HashSet::from(["comet", "orbit"]),
            HashSet::from(["flour"]),
        ];
        // 3 pairs, only comet/orbit together.
        assert!((coherence(&kw, &sets) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_corpus_is_all_outliers() {
        let docs = vec![Document::new("a", "comet orbit nebula")];
        let result = build_topic_model(&docs, &TopicModelOptions::default());
        assert!(result.topics.is_empty());
        assert_eq!(result.outlier_documents, vec!["a"]);
    }
}
