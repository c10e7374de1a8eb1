// Unit tests for the lexicon scorers: sentiment, certainty, comparative
// framing and temporal recency.
//
// Property-style checks (bounds, determinism, negation inversion) run over
// a fixed corpus of awkward inputs; scenario checks pin concrete outputs.

use chrono::NaiveDate;

use lexiscope::lexicon::comparative::{ComparisonDimension, ComparisonDirection, ComparisonKind};
use lexiscope::lexicon::hedges::CertaintyLevel;
use lexiscope::lexicon::temporal::{TemporalFocus, TemporalKind};
use lexiscope::lexicon::{
    analyze_certainty, analyze_comparative_patterns, analyze_sentiment, analyze_sentiment_with,
    extract_temporal_expressions_at, recency_score, score_certainty, SentimentLabel,
};
use lexiscope::text::Language;

const AWKWARD_INPUTS: &[&str] = &[
    "",
    "   ",
    "?!?!...",
    "This is excellent and amazing!",
    "Not bad, not good, absolutely terrible, extremely extremely wonderful.",
    "very very very very very good",
    "hate hate hate hate",
    "Café — naïve façade 🚀 déjà vu",
    "It might possibly perhaps maybe work, I guess.",
    "Definitely, certainly, clearly, undoubtedly, absolutely, obviously true.",
];

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

// ============================================================
// Sentiment
// ============================================================

#[test]
fn sentiment_scenario_positive() {
    let r = analyze_sentiment("This is excellent and amazing!");
    assert_eq!(r.label, SentimentLabel::Positive);
    assert!(r.positive > 0.0);
}

#[test]
fn sentiment_score_stays_in_bounds() {
    for text in AWKWARD_INPUTS {
        let r = analyze_sentiment(text);
        assert!(
            (-1.0..=1.0).contains(&r.score),
            "score {} out of bounds for {text:?}",
            r.score
        );
    }
}

#[test]
fn negation_lowers_score_for_positive_adjectives() {
    for adj in ["good", "great", "excellent", "reliable", "helpful", "intuitive"] {
        let plain = analyze_sentiment(&format!("The app is {adj}"));
        let negated = analyze_sentiment(&format!("The app is not {adj}"));
        assert!(
            plain.score > negated.score,
            "'{adj}': {} should exceed negated {}",
            plain.score,
            negated.score
        );
    }
}

#[test]
fn sentiment_is_deterministic() {
    for text in AWKWARD_INPUTS {
        assert_eq!(analyze_sentiment(text), analyze_sentiment(text));
    }
}

#[test]
fn empty_text_is_neutral() {
    let r = analyze_sentiment("");
    assert_eq!(r.label, SentimentLabel::Neutral);
    assert_eq!(r.score, 0.0);
    assert_eq!(r.word_count, 0);
}

#[test]
fn spanish_lexicon_and_negators_apply() {
    let bad = analyze_sentiment_with("El servicio es malo", Language::Spanish);
    let not_bad = analyze_sentiment_with("El servicio no es malo", Language::Spanish);
    assert_eq!(bad.label, SentimentLabel::Negative);
    assert!(not_bad.score > bad.score);

    let pt = analyze_sentiment_with("O produto é ótimo", Language::Portuguese);
    assert_eq!(pt.label, SentimentLabel::Positive);
}

// ============================================================
// Certainty
// ============================================================

#[test]
fn certainty_scenario_boosters_beat_hedges() {
    let sure = score_certainty("I definitely know this will work");
    let unsure = score_certainty("I think this might possibly work");
    assert!(sure > unsure, "{sure} should exceed {unsure}");
}

#[test]
fn certainty_score_stays_in_bounds() {
    for text in AWKWARD_INPUTS {
        let s = score_certainty(text);
        assert!((0.0..=1.0).contains(&s), "certainty {s} out of bounds for {text:?}");
    }
}

#[test]
fn stacked_boosters_saturate_at_one() {
    let a = analyze_certainty("Definitely, certainly, clearly, undoubtedly, absolutely, obviously true.");
    assert_eq!(a.boosters.len(), 6);
    assert!(a.score <= 1.0);
    assert_eq!(a.level, CertaintyLevel::VeryHigh);
}

#[test]
fn neutral_text_scores_half() {
    let a = analyze_certainty("The nebula glows green.");
    assert!(a.hedges.is_empty());
    assert!(a.boosters.is_empty());
    assert!((a.score - 0.5).abs() < 1e-12);
}

// ============================================================
// Comparative
// ============================================================

#[test]
fn specific_speed_comparison_wins_over_generic_er_than() {
    let a = analyze_comparative_patterns("Acme is faster than Globex.");
    assert_eq!(a.comparisons.len(), 1);
    let c = &a.comparisons[0];
    assert_eq!(c.kind, ComparisonKind::Comparative);
    assert_eq!(c.direction, ComparisonDirection::Positive);
    assert_eq!(c.dimension, ComparisonDimension::Speed);
    assert!(c.end > c.start);
    assert_eq!(&"Acme is faster than Globex."[c.start..c.end], c.text);
}

#[test]
fn comparison_strength_stays_in_bounds() {
    let texts = [
        "It is by far the best, vastly better than anything, slightly worse than nothing.",
        "Barely cheaper than the rest.",
        "",
    ];
    for text in texts {
        for c in analyze_comparative_patterns(text).comparisons {
            assert!((0.0..=1.0).contains(&c.strength), "{} out of bounds", c.strength);
            assert!((0.0..=1.0).contains(&c.confidence));
        }
    }
}

// ============================================================
// Temporal
// ============================================================

#[test]
fn count_ago_resolves_days() {
    let a = extract_temporal_expressions_at("It broke 5 days ago.", reference());
    assert_eq!(a.expressions.len(), 1);
    let e = &a.expressions[0];
    assert_eq!(e.kind, TemporalKind::Relative);
    assert_eq!(e.days_ago, Some(5));
    assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 6, 10));
    assert_eq!(e.recency_score, Some(95));
}

#[test]
fn recency_score_boundaries() {
    assert_eq!(recency_score(-30), 100);
    assert_eq!(recency_score(30), 80);
    assert_eq!(recency_score(31), 65);
    assert_eq!(recency_score(365), 35);
    assert_eq!(recency_score(366), 20);
}

#[test]
fn mixed_orientation_is_reported_as_mixed() {
    let a = extract_temporal_expressions_at("We launched yesterday and ship again tomorrow.", reference());
    assert_eq!(a.expressions.len(), 2);
    assert_eq!(a.focus, TemporalFocus::Mixed);
}

#[test]
fn temporal_spans_point_into_source() {
    let text = "Updated 2024-06-01, reviewed last week, due next month.";
    let a = extract_temporal_expressions_at(text, reference());
    assert!(!a.expressions.is_empty());
    for e in &a.expressions {
        assert!(e.end > e.start);
        assert_eq!(&text[e.start..e.end], e.text);
    }
}
