// Top-level analysis entry points.
//
// `analyze_text` is the convenience bundle for a single string;
// `analyze_document` runs every per-document analyzer and is the unit of
// work the batch pipeline fans out.

pub mod multilingual;
pub mod readability;
pub mod statistics;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::absa::{analyze_absa, AbsaResult};
use crate::coref::{resolve_coreferences_with, CorefConfig, CoreferenceResult};
use crate::lexicon::{
    analyze_certainty, analyze_comparative_patterns, analyze_sentiment,
    extract_temporal_expressions_at, CertaintyAnalysis, ComparisonAnalysis, SentimentResult,
    TemporalAnalysis,
};
use crate::patterns::{
    detect_discourse_markers, detect_negations, extract_keyphrases, parse_quotations,
    DiscourseAnalysis, Keyphrase, NegationAnalysis, QuotationAnalysis,
};
use crate::topics::Document;

pub use multilingual::{analyze_multilingual, detect_language, MultilingualAnalysis};
pub use readability::{readability, Readability, ReadingLevel};
pub use statistics::{text_statistics, TextStatistics};

/// Keyphrases kept in a `TextAnalysis`.
pub const KEYPHRASE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub sentiment: SentimentResult,
    /// `None` for text without words
    pub readability: Option<Readability>,
    pub keyphrases: Vec<Keyphrase>,
    pub statistics: TextStatistics,
    pub negations: NegationAnalysis,
    pub hedges: CertaintyAnalysis,
}

/// Everything the per-document analyzers report for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub id: String,
    pub analysis: TextAnalysis,
    pub absa: AbsaResult,
    pub coreference: CoreferenceResult,
    pub comparative: ComparisonAnalysis,
    pub temporal: TemporalAnalysis,
    pub quotations: QuotationAnalysis,
    pub discourse: DiscourseAnalysis,
}

pub fn analyze_text(text: &str) -> TextAnalysis {
    TextAnalysis {
        sentiment: analyze_sentiment(text),
        readability: readability(text),
        keyphrases: extract_keyphrases(text, KEYPHRASE_LIMIT),
        statistics: text_statistics(text),
        negations: detect_negations(text),
        hedges: analyze_certainty(text),
    }
}

/// Full report with default coreference settings, dates relative to today.
pub fn analyze_document(document: &Document) -> DocumentReport {
    analyze_document_with(document, &CorefConfig::default(), Utc::now().date_naive())
}

pub fn analyze_document_with(
    document: &Document,
    coref: &CorefConfig,
    reference_date: NaiveDate,
) -> DocumentReport {
    let text = document.text.as_str();
    let report = DocumentReport {
        id: document.id.clone(),
        analysis: analyze_text(text),
        absa: analyze_absa(text),
        coreference: resolve_coreferences_with(text, coref),
        comparative: analyze_comparative_patterns(text),
        temporal: extract_temporal_expressions_at(text, reference_date),
        quotations: parse_quotations(text),
        discourse: detect_discourse_markers(text),
    };
    debug!(id = %document.id, "Analyzed document");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_total() {
        let a = analyze_text("");
        assert_eq!(a.sentiment.matched_terms, 0);
        assert!(a.readability.is_none());
        assert!(a.keyphrases.is_empty());
        assert_eq!(a.statistics.words, 0);
        assert_eq!(a.negations.negation_count, 0);
        assert!((a.hedges.score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn document_report_keeps_id() {
        let doc = Document::new("review-1", "The quality is excellent but the price is terrible.");
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let report = analyze_document_with(&doc, &CorefConfig::default(), date);
        assert_eq!(report.id, "review-1");
        assert_eq!(report.temporal.reference_date, date);
        assert!(report.absa.stats.total_aspects >= 2);
    }
}
