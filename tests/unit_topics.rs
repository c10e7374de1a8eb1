// Unit tests for topic modeling: TF-IDF weighting, k-means clustering and
// the assembled topic model.

use std::collections::HashSet;
use std::time::Duration;

use lexiscope::text::Language;
use lexiscope::topics::kmeans::KMeans;
use lexiscope::topics::tfidf::{cosine, document_frequency, document_terms, tfidf_vector};
use lexiscope::topics::{
    build_topic_model, generate_topic_label, Document, KMeansTopicModeler, TopicModelOptions,
    TopicModeler,
};

fn astronomy_and_baking() -> Vec<Document> {
    let astronomy = [
        "The telescope tracked the comet across the nebula during its orbit.",
        "A comet orbit passes near the nebula; our telescope captured it.",
        "Telescope images show the nebula glowing behind the comet orbit.",
        "Amateur astronomers point a telescope at the comet and the nebula.",
        "The nebula and the comet orbit were visible through the telescope tonight.",
    ];
    let baking = [
        "Knead the dough with flour and yeast before baking the loaf.",
        "Yeast makes the dough rise; dust the flour over the loaf.",
        "Fresh flour and active yeast give the dough a soft loaf.",
        "Shape the dough, sprinkle flour, and let the yeast work on the loaf.",
        "The loaf needs strong flour, warm yeast and a well rested dough.",
    ];
    astronomy
        .iter()
        .enumerate()
        .map(|(i, t)| Document::new(format!("space-{i}"), *t))
        .chain(
            baking
                .iter()
                .enumerate()
                .map(|(i, t)| Document::new(format!("bread-{i}"), *t)),
        )
        .collect()
}

fn seeded(num_topics: usize, seed: u64) -> TopicModelOptions {
    TopicModelOptions {
        num_topics: Some(num_topics),
        seed: Some(seed),
        ..TopicModelOptions::default()
    }
}

// ============================================================
// TF-IDF
// ============================================================

#[test]
fn terms_drop_stopwords_numbers_and_single_letters() {
    let terms = document_terms::<&str>("The 42 comets and a b telescope", Language::English, &[]);
    assert_eq!(terms, vec!["comets", "telescope"]);
}

#[test]
fn custom_stopwords_are_removed() {
    let terms = document_terms("comet nebula orbit", Language::English, &["nebula"]);
    assert_eq!(terms, vec!["comet", "orbit"]);
}

#[test]
fn term_in_every_document_gets_no_weight() {
    let docs = vec![
        vec!["comet".to_string(), "orbit".to_string()],
        vec!["comet".to_string(), "flour".to_string()],
    ];
    let df = document_frequency(&docs);
    let v = tfidf_vector(&docs[0], &df, docs.len(), 100);
    assert!(!v.contains_key("comet"));
    assert!(v.get("orbit").copied().unwrap_or(0.0) > 0.0);
}

#[test]
fn cosine_is_one_for_identical_and_zero_for_disjoint() {
    let docs = vec![
        vec!["comet".to_string(), "orbit".to_string()],
        vec!["flour".to_string(), "yeast".to_string()],
        vec!["lattice".to_string()],
    ];
    let df = document_frequency(&docs);
    let a = tfidf_vector(&docs[0], &df, docs.len(), 100);
    let b = tfidf_vector(&docs[1], &df, docs.len(), 100);
    assert!((cosine(&a, &a) - 1.0).abs() < 1e-9);
    assert_eq!(cosine(&a, &b), 0.0);
}

// ============================================================
// K-means
// ============================================================

#[test]
fn kmeans_separates_disjoint_vocabularies() {
    let docs: Vec<Vec<String>> = astronomy_and_baking()
        .iter()
        .map(|d| document_terms::<&str>(&d.text, Language::English, &[]))
        .collect();
    let df = document_frequency(&docs);
    let vectors: Vec<_> = docs
        .iter()
        .map(|t| tfidf_vector(t, &df, docs.len(), 100))
        .collect();

    let clustering = KMeans::new(2, 7).fit(&vectors);
    assert_eq!(clustering.assignments.len(), 10);
    let first: HashSet<usize> = clustering.assignments[..5].iter().copied().collect();
    let second: HashSet<usize> = clustering.assignments[5..].iter().copied().collect();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first, second);
    assert!(clustering.converged);
}

#[test]
fn zero_deadline_stops_before_iterating() {
    let docs = vec![vec!["comet".to_string()], vec!["flour".to_string()]];
    let df = document_frequency(&docs);
    let vectors: Vec<_> = docs.iter().map(|t| tfidf_vector(t, &df, 2, 100)).collect();

    let mut kmeans = KMeans::new(2, 1);
    kmeans.deadline = Some(Duration::ZERO);
    let clustering = kmeans.fit(&vectors);
    assert_eq!(clustering.iterations, 0);
    assert!(!clustering.converged);
    assert_eq!(clustering.assignments.len(), 2);
}

// ============================================================
// Topic model
// ============================================================

#[test]
fn two_vocabularies_make_two_topics() {
    let docs = astronomy_and_baking();
    let result = build_topic_model(&docs, &seeded(2, 42));

    assert_eq!(result.topics.len(), 2);
    assert_eq!(result.topics.iter().map(|t| t.document_count).sum::<usize>(), 10);
    assert!(result.outlier_documents.is_empty());
    assert!(result.model_metrics.avg_coherence > 0.0);
    assert_eq!(result.model_metrics.seed, 42);

    let space_topic = result.assignments[0].topic_id;
    let bread_topic = result.assignments[5].topic_id;
    assert!(space_topic.is_some());
    assert_ne!(space_topic, bread_topic);
    for a in &result.assignments {
        let expected = if a.document_id.starts_with("space") {
            space_topic
        } else {
            bread_topic
        };
        assert_eq!(a.topic_id, expected, "{}", a.document_id);
        assert!(a.similarity > 0.0);
    }

    let space = &result.topics[space_topic.unwrap_or_default()];
    assert!(space.keywords.iter().any(|k| k == "nebula" || k == "telescope"));
    assert!(!space.keywords.iter().any(|k| k == "flour" || k == "yeast"));
}

#[test]
fn topic_fields_are_well_formed() {
    let result = build_topic_model(&astronomy_and_baking(), &seeded(2, 3));
    for (i, topic) in result.topics.iter().enumerate() {
        assert_eq!(topic.id, i);
        assert!(topic.keywords.len() <= 10);
        assert_eq!(topic.keywords.len(), topic.keyword_scores.len());
        for pair in topic.keyword_scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(topic.label, generate_topic_label(&topic.keywords));
        assert!((0.0..=1.0).contains(&topic.coherence_score));
    }
    let diversity = result.model_metrics.topic_diversity;
    assert!((0.0..=1.0).contains(&diversity), "got {diversity}");
}

#[test]
fn same_seed_same_model() {
    let docs = astronomy_and_baking();
    let a = build_topic_model(&docs, &seeded(3, 11));
    let b = build_topic_model(&docs, &seeded(3, 11));
    let ids = |r: &lexiscope::topics::TopicModelResult| {
        r.assignments.iter().map(|a| a.topic_id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&a), ids(&b));
    assert_eq!(
        a.topics.iter().map(|t| t.label.clone()).collect::<Vec<_>>(),
        b.topics.iter().map(|t| t.label.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn empty_corpus_has_no_topics() {
    let result = build_topic_model(&[], &TopicModelOptions::default());
    assert!(result.topics.is_empty());
    assert!(result.assignments.is_empty());
    assert!(result.outlier_documents.is_empty());
}

#[test]
fn corpus_below_min_cluster_size_is_all_outliers() {
    let docs = vec![Document::new("only", "comet nebula telescope")];
    let result = build_topic_model(&docs, &TopicModelOptions::default());
    assert!(result.topics.is_empty());
    assert_eq!(result.outlier_documents, vec!["only".to_string()]);
    assert_eq!(result.assignments[0].topic_id, None);
}

#[test]
fn documents_without_terms_are_outliers() {
    let mut docs = astronomy_and_baking();
    docs.push(Document::new("blank", "the and of it"));
    let result = build_topic_model(&docs, &seeded(2, 5));
    assert!(result.outlier_documents.contains(&"blank".to_string()));
    let blank = result
        .assignments
        .iter()
        .find(|a| a.document_id == "blank")
        .expect("blank is assigned");
    assert_eq!(blank.topic_id, None);
    assert_eq!(blank.similarity, 0.0);
}

#[test]
fn modeler_trait_matches_the_function() {
    let docs = astronomy_and_baking();
    let modeler = KMeansTopicModeler::new(seeded(2, 9));
    let via_trait = modeler.model(&docs);
    let direct = build_topic_model(&docs, &seeded(2, 9));
    assert_eq!(via_trait.topics.len(), direct.topics.len());
    assert_eq!(
        via_trait.assignments.iter().map(|a| a.topic_id).collect::<Vec<_>>(),
        direct.assignments.iter().map(|a| a.topic_id).collect::<Vec<_>>()
    );
}
