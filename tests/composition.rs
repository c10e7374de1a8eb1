// Composition tests: verifying that the analyzers chain together correctly.
//
// These exercise the data flow between modules:
//   Config -> TopicModelOptions -> topic model
//   Document -> DocumentReport -> JSON
//   Documents -> batch pipeline -> ordered reports
// without touching the filesystem or the network.

use std::collections::HashMap;

use chrono::NaiveDate;

use lexiscope::absa::AspectPolarity;
use lexiscope::analysis::{analyze_document_with, analyze_multilingual, analyze_text};
use lexiscope::config::Config;
use lexiscope::coref::CorefConfig;
use lexiscope::output::{to_json, truncate_chars, variant_name};
use lexiscope::patterns::{classify_query_intent, AspectCategory, QueryIntent};
use lexiscope::pipeline::batch::{self, BatchOptions};
use lexiscope::text::Language;
use lexiscope::topics::{build_topic_model, Document, KMeansTopicModeler, TopicModeler};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

fn review() -> Document {
    Document::new(
        "review-7",
        "The quality is excellent but the price is terrible. \
         Acme Corp shipped the update 5 days ago. It fixed the sync bug. \
         \"It finally works,\" said Maria Lopez. However, support was slow.",
    )
}

// ============================================================
// Chain: Document -> DocumentReport
// ============================================================

#[test]
fn document_report_combines_every_analyzer() {
    let report = analyze_document_with(&review(), &CorefConfig::default(), reference_date());

    assert_eq!(report.id, "review-7");
    assert!(report.analysis.statistics.sentences >= 4);
    assert!(report.analysis.readability.is_some());

    let price = report
        .absa
        .aspects
        .iter()
        .find(|a| a.aspect.category == AspectCategory::Price)
        .expect("price aspect");
    assert_eq!(price.polarity, AspectPolarity::Negative);

    assert!(report
        .coreference
        .links
        .iter()
        .any(|l| l.antecedent.text == "Acme Corp"));

    let days_ago: Vec<i64> = report
        .temporal
        .expressions
        .iter()
        .filter_map(|e| e.days_ago)
        .collect();
    assert!(days_ago.contains(&5), "got {days_ago:?}");

    assert!(report
        .quotations
        .quotations
        .iter()
        .filter_map(|q| q.attribution.as_ref())
        .any(|a| a.speaker == "Maria Lopez"));
    assert!(report
        .discourse
        .markers
        .iter()
        .any(|m| m.text.eq_ignore_ascii_case("however")));
}

#[test]
fn text_analysis_matches_the_individual_analyzers() {
    let text = review().text;
    let bundle = analyze_text(&text);
    assert_eq!(bundle.sentiment, lexiscope::lexicon::analyze_sentiment(&text));
    assert_eq!(bundle.statistics, lexiscope::analysis::text_statistics(&text));
    assert_eq!(bundle.negations, lexiscope::patterns::detect_negations(&text));
    assert!(bundle.keyphrases.len() <= lexiscope::analysis::KEYPHRASE_LIMIT);
}

#[test]
fn report_serializes_to_json() {
    let report = analyze_document_with(&review(), &CorefConfig::default(), reference_date());
    let json = to_json(&report).expect("report encodes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(value["id"], "review-7");
    assert!(value["absa"]["categories"].as_array().is_some_and(|c| c.len() == 11));
    assert_eq!(value["temporal"]["reference_date"], "2024-06-15");
    assert_eq!(variant_name(&AspectCategory::Price), "price");
    assert_eq!(variant_name(&AspectPolarity::Mixed), "mixed");
}

// ============================================================
// Chain: Config -> TopicModelOptions -> topic model
// ============================================================

fn corpus() -> Vec<Document> {
    let space = [
        "telescope nebula comet orbit photographs",
        "comet orbit nebula telescope observatory",
        "nebula telescope comet orbit astronomers",
        "orbit comet telescope nebula eclipse",
    ];
    let kitchen = [
        "flour yeast dough loaf oven",
        "dough flour loaf yeast kneading",
        "yeast loaf dough flour sourdough",
        "loaf dough yeast flour crust",
    ];
    space
        .iter()
        .chain(kitchen.iter())
        .enumerate()
        .map(|(i, t)| Document::new(format!("doc-{i}"), *t))
        .collect()
}

#[test]
fn config_drives_the_topic_model() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("LEXISCOPE_TOPIC_SEED", "17"),
        ("LEXISCOPE_TOP_KEYWORDS", "3"),
        ("LEXISCOPE_MIN_CLUSTER_SIZE", "2"),
        ("LEXISCOPE_STOPWORDS", "Eclipse, crust"),
    ]);
    let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string())).expect("config");
    let mut options = config.topic_options();
    options.num_topics = Some(2);

    let result = build_topic_model(&corpus(), &options);
    assert_eq!(result.model_metrics.seed, 17);
    assert_eq!(result.topics.len(), 2);
    for topic in &result.topics {
        assert!(topic.keywords.len() <= 3);
        assert!(!topic.keywords.iter().any(|k| k == "eclipse" || k == "crust"));
    }

    let again = KMeansTopicModeler::new(options).model(&corpus());
    assert_eq!(
        again.assignments.iter().map(|a| a.topic_id).collect::<Vec<_>>(),
        result.assignments.iter().map(|a| a.topic_id).collect::<Vec<_>>()
    );
}

#[test]
fn config_drives_the_coreference_window() {
    let config = Config::from_lookup(|key| (key == "LEXISCOPE_COREF_WINDOW").then(|| "1".to_string()))
        .expect("config");
    let coref = config.coref_config();
    assert_eq!(coref.max_sentence_distance, 1);

    let doc = Document::new(
        "window",
        "Acme Corp launched. then rain fell. more rain fell. It sold well.",
    );
    let narrow = analyze_document_with(&doc, &coref, reference_date());
    let wide = analyze_document_with(&doc, &CorefConfig::default(), reference_date());
    assert!(narrow.coreference.links.is_empty());
    assert_eq!(wide.coreference.links.len(), 1);
}

#[test]
fn malformed_config_is_an_error_naming_the_variable() {
    let err = Config::from_lookup(|key| (key == "LEXISCOPE_CONCURRENCY").then(|| "lots".to_string()))
        .expect_err("non-numeric concurrency");
    assert!(format!("{err:#}").contains("LEXISCOPE_CONCURRENCY"));
}

// ============================================================
// Chain: Documents -> batch pipeline -> reports
// ============================================================

#[tokio::test]
async fn batch_reports_match_single_document_analysis() {
    let documents = vec![
        review(),
        Document::new("empty", ""),
        Document::new("short", "The battery is not good."),
    ];
    let options = BatchOptions {
        concurrency: 2,
        coref: CorefConfig::default(),
        reference_date: reference_date(),
        show_progress: false,
    };
    let reports = batch::run(documents.clone(), &options).await.expect("batch runs");

    assert_eq!(reports.len(), 3);
    for (doc, report) in documents.iter().zip(&reports) {
        assert_eq!(report.id, doc.id);
        let single = analyze_document_with(doc, &options.coref, options.reference_date);
        assert_eq!(report.analysis, single.analysis);
        assert_eq!(report.absa, single.absa);
        assert_eq!(report.coreference, single.coreference);
    }
    assert_eq!(reports[1].absa.stats.total_aspects, 0);
}

#[tokio::test]
async fn batch_of_nothing_is_empty() {
    let options = BatchOptions {
        concurrency: 0,
        coref: CorefConfig::default(),
        reference_date: reference_date(),
        show_progress: false,
    };
    let reports = batch::run(Vec::new(), &options).await.expect("batch runs");
    assert!(reports.is_empty());
}

// ============================================================
// Chain: multilingual + intent + output helpers
// ============================================================

#[test]
fn multilingual_text_keeps_sentiment_and_segments() {
    let text = "El producto es excelente y muy bueno. The support was terrible.";
    let analysis = analyze_multilingual(text);
    assert!(analysis.is_mixed);
    assert!(analysis.languages.contains(&Language::Spanish));
    assert!(analysis.languages.contains(&Language::English));
    for segment in &analysis.segments {
        assert_eq!(&text[segment.start..segment.end], segment.text);
    }
}

#[test]
fn intent_and_truncation_compose_for_display() {
    let intent = classify_query_intent("how to fix sync error");
    assert_eq!(intent.primary, QueryIntent::Troubleshooting);
    let label = truncate_chars(&variant_name(&intent.primary), 5);
    assert_eq!(label, "troub...");
}
