// Discourse markers: connectives that signal how clauses relate.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::PhraseMatcher;
use crate::text::{sentence_spans, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscourseRelation {
    Contrast,
    Cause,
    Result,
    Addition,
    Example,
    Conclusion,
    Sequence,
    Concession,
    Condition,
    Emphasis,
    Comparison,
}

use DiscourseRelation::*;

const MARKERS: &[(&str, DiscourseRelation, f64)] = &[
    ("but", Contrast, 0.8), ("however", Contrast, 1.0), ("on the other hand", Contrast, 1.0),
    ("in contrast", Contrast, 1.0), ("conversely", Contrast, 1.0), ("whereas", Contrast, 0.9),
    ("instead", Contrast, 0.7), ("on the contrary", Contrast, 1.0), ("yet", Contrast, 0.6),
    ("because", Cause, 0.9), ("since", Cause, 0.5), ("due to", Cause, 0.9),
    ("owing to", Cause, 0.9), ("because of", Cause, 1.0), ("as a result of", Cause, 1.0),
    ("therefore", Result, 1.0), ("thus", Result, 1.0), ("consequently", Result, 1.0),
    ("as a result", Result, 1.0), ("hence", Result, 1.0), ("so that", Result, 0.8),
    ("accordingly", Result, 0.9), ("so", Result, 0.5),
    ("also", Addition, 0.6), ("moreover", Addition, 1.0), ("furthermore", Addition, 1.0),
    ("in addition", Addition, 1.0), ("additionally", Addition, 1.0), ("besides", Addition, 0.8),
    ("as well as", Addition, 0.7), ("not only", Addition, 0.8),
    ("for example", Example, 1.0), ("for instance", Example, 1.0), ("such as", Example, 0.8),
    ("e.g.", Example, 0.9), ("including", Example, 0.6), ("namely", Example, 0.9),
    ("in conclusion", Conclusion, 1.0), ("to sum up", Conclusion, 1.0),
    ("in summary", Conclusion, 1.0), ("overall", Conclusion, 0.7), ("ultimately", Conclusion, 0.8),
    ("all in all", Conclusion, 1.0), ("in short", Conclusion, 0.9), ("to conclude", Conclusion, 1.0),
    ("first", Sequence, 0.6), ("firstly", Sequence, 0.9), ("second", Sequence, 0.5),
    ("secondly", Sequence, 0.9), ("then", Sequence, 0.5), ("next", Sequence, 0.5),
    ("finally", Sequence, 0.8), ("afterwards", Sequence, 0.8), ("subsequently", Sequence, 0.9),
    ("meanwhile", Sequence, 0.8), ("lastly", Sequence, 0.9),
    ("although", Concession, 1.0), ("though", Concession, 0.8), ("even though", Concession, 1.0),
    ("despite", Concession, 1.0), ("in spite of", Concession, 1.0), ("nevertheless", Concession, 1.0),
    ("nonetheless", Concession, 1.0), ("admittedly", Concession, 0.9), ("granted", Concession, 0.7),
    ("even so", Concession, 0.9), ("still", Concession, 0.4),
    ("if", Condition, 0.7), ("unless", Condition, 1.0), ("provided that", Condition, 1.0),
    ("as long as", Condition, 1.0), ("in case", Condition, 0.9), ("otherwise", Condition, 0.8),
    ("whether", Condition, 0.6),
    ("indeed", Emphasis, 0.9), ("in fact", Emphasis, 1.0), ("above all", Emphasis, 1.0),
    ("especially", Emphasis, 0.8), ("particularly", Emphasis, 0.8), ("notably", Emphasis, 0.9),
    ("importantly", Emphasis, 0.9), ("clearly", Emphasis, 0.6),
    ("similarly", Comparison, 1.0), ("likewise", Comparison, 1.0), ("in the same way", Comparison, 1.0),
    ("compared to", Comparison, 0.9), ("compared with", Comparison, 0.9), ("just as", Comparison, 0.8),
    ("equally", Comparison, 0.7),
];

static MATCHER: Lazy<PhraseMatcher<(DiscourseRelation, f64)>> = Lazy::new(|| {
    PhraseMatcher::new(MARKERS.iter().map(|&(phrase, rel, w)| (phrase, (rel, w))))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscourseMarker {
    pub text: String,
    pub relation: DiscourseRelation,
    pub weight: f64,
    pub start: usize,
    pub end: usize,
    /// Opens its sentence ("However, ...")
    pub sentence_initial: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscourseAnalysis {
    pub markers: Vec<DiscourseMarker>,
    pub relation_counts: BTreeMap<DiscourseRelation, usize>,
    pub dominant_relation: Option<DiscourseRelation>,
    /// Summed marker weight per word
    pub weighted_density: f64,
}

pub fn detect_discourse_markers(text: &str) -> DiscourseAnalysis {
    let sentence_starts: Vec<usize> = sentence_spans(text).into_iter().map(|(s, _)| s).collect();
    let markers: Vec<DiscourseMarker> = MATCHER
        .find_all(text)
        .into_iter()
        .map(|m| {
            let (relation, weight) = m.payload;
            DiscourseMarker {
                sentence_initial: sentence_starts.contains(&m.start),
                text: m.text,
                relation,
                weight,
                start: m.start,
                end: m.end,
            }
        })
        .collect();

    let mut relation_counts = BTreeMap::new();
    for m in &markers {
        *relation_counts.entry(m.relation).or_insert(0usize) += 1;
    }
    // first relation in declaration order wins a tie
    let dominant_relation = relation_counts
        .iter()
        .fold(None, |best: Option<(DiscourseRelation, usize)>, (&rel, &n)| match best {
            Some((_, b)) if b >= n => best,
            _ => Some((rel, n)),
        })
        .map(|(rel, _)| rel);

    let words = tokenize(text).len();
    let weighted_density = if words == 0 {
        0.0
    } else {
        markers.iter().map(|m| m.weight).sum::<f64>() / words as f64
    };

    debug!(markers = markers.len(), "Detected discourse markers");
    DiscourseAnalysis {
        markers,
        relation_counts,
        dominant_relation,
        weighted_density,
    }
}
