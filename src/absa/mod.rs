// Aspect-based sentiment.
//
// Aspects come from the aspect lexicon and from RAKE keyphrases. Each aspect
// collects the opinion expressions of its clause (the sentence split at
// contrastive conjunctions and semicolons), falling back to the whole
// sentence when its clause has none. Opinions are weighted by
// 1 / (1 + distance / 50) where distance is in bytes from the aspect.

mod rollup;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::sentiment::{
    is_intensifier, is_negator, is_opinion_word, opinion_expressions, OpinionExpression,
};
use crate::patterns::aspects::{category_for_word, detect_aspects, Aspect, AspectCategory, AspectSource};
use crate::patterns::keyphrases::extract_keyphrases;
use crate::text::{sentence_spans, tokenize, Token};

pub use rollup::{AbsaStats, CategorySummary};

/// Distance in bytes at which an opinion's weight halves.
const DISTANCE_SCALE: f64 = 50.0;
const POLARITY_THRESHOLD: f64 = 0.2;
/// Keyphrases considered as aspect candidates.
const KEYPHRASE_CANDIDATES: usize = 10;

const CLAUSE_BREAKERS: &[&str] = &["but", "however", "although", "though", "yet", "whereas", "while"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPolarity {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl AspectPolarity {
    /// Beyond +/-0.2 the sign decides; otherwise several opinions make it
    /// mixed and none or one make it neutral.
    pub fn classify(score: f64, opinions: usize) -> Self {
        if score > POLARITY_THRESHOLD {
            AspectPolarity::Positive
        } else if score < -POLARITY_THRESHOLD {
            AspectPolarity::Negative
        } else if opinions > 1 {
            AspectPolarity::Mixed
        } else {
            AspectPolarity::Neutral
        }
    }
}

/// One aspect and the opinions linked to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSentiment {
    pub aspect: Aspect,
    pub opinions: Vec<OpinionExpression>,
    pub polarity: AspectPolarity,
    /// Distance-weighted mean of the opinions, in [-1,1]
    pub score: f64,
    /// min(1, 0.1 + 0.3 * opinions)
    pub confidence: f64,
}

impl AspectSentiment {
    fn link(aspect: Aspect, opinions: Vec<OpinionExpression>) -> Self {
        let (weighted, total_weight) = opinions.iter().fold((0.0, 0.0), |(sum, wsum), o| {
            let distance = o.position.abs_diff(aspect.position) as f64;
            let weight = 1.0 / (1.0 + distance / DISTANCE_SCALE);
            (sum + weight * o.signed(), wsum + weight)
        });
        let score = if total_weight > 0.0 {
            (weighted / total_weight).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            polarity: AspectPolarity::classify(score, opinions.len()),
            confidence: (0.1 + 0.3 * opinions.len() as f64).min(1.0),
            score,
            aspect,
            opinions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsaResult {
    pub aspects: Vec<AspectSentiment>,
    /// One entry per category, all eleven always present
    pub categories: Vec<CategorySummary>,
    /// Mean aspect score, 0 when there are no aspects
    pub overall_score: f64,
    pub overall_polarity: AspectPolarity,
    pub stats: AbsaStats,
}

/// Aspect-level sentiment for `text`.
pub fn analyze_absa(text: &str) -> AbsaResult {
    let tokens = tokenize(text);
    let sentences = sentence_spans(text);

    let mut aspects = detect_aspects(text);
    let keyphrase_aspects = keyphrase_aspects(text, &tokens, &sentences, &aspects);
    aspects.extend(keyphrase_aspects);
    aspects.sort_by_key(|a| a.position);

    let linked: Vec<AspectSentiment> = aspects
        .into_iter()
        .map(|aspect| {
            let opinions = opinions_for(text, &tokens, &sentences, &aspect);
            AspectSentiment::link(aspect, opinions)
        })
        .collect();

    let result = rollup::summarize(linked);
    debug!(
        aspects = result.stats.total_aspects,
        overall = result.overall_score,
        "Analyzed aspect sentiment"
    );
    result
}

fn sentence_of(sentences: &[(usize, usize)], position: usize) -> Option<(usize, (usize, usize))> {
    sentences
        .iter()
        .copied()
        .enumerate()
        .find(|&(_, (s, e))| s <= position && position < e)
}

/// RAKE phrases that are not already lexicon aspects and carry no opinion
/// words, intensifiers, negators or stopwords.
fn keyphrase_aspects(
    text: &str,
    tokens: &[Token],
    sentences: &[(usize, usize)],
    existing: &[Aspect],
) -> Vec<Aspect> {
    let mut seen: HashSet<(String, usize)> = existing
        .iter()
        .map(|a| (a.normalized_term.clone(), a.sentence_index))
        .collect();
    let mut out = Vec::new();

    for kp in extract_keyphrases(text, KEYPHRASE_CANDIDATES) {
        let words: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.start >= kp.start && t.end <= kp.end)
            .collect();
        if words.is_empty() {
            continue;
        }
        let clean = words.iter().all(|t| {
            let w = t.normalized.as_str();
            !t.is_stopword && !is_opinion_word(w) && !is_intensifier(w) && !is_negator(w)
        });
        if !clean {
            continue;
        }
        let overlaps = existing
            .iter()
            .any(|a| a.position < kp.end && kp.start < a.end);
        if overlaps {
            continue;
        }
        let Some((sentence_index, _)) = sentence_of(sentences, kp.start) else {
            continue;
        };
        if !seen.insert((kp.normalized.clone(), sentence_index)) {
            continue;
        }
        // the head noun is usually last
        let category = words
            .iter()
            .rev()
            .find_map(|t| category_for_word(&t.normalized))
            .unwrap_or(AspectCategory::General);
        out.push(Aspect {
            term: kp.text,
            normalized_term: kp.normalized,
            category,
            sentence_index,
            position: kp.start,
            end: kp.end,
            source: AspectSource::Keyphrase,
        });
    }
    out
}

/// Token range (start, end) of the clause around `position` within the
/// sentence tokens `sentence`.
fn clause_bounds(text: &str, sentence: &[Token], position: usize) -> (usize, usize) {
    let mut start = 0;
    for (i, tok) in sentence.iter().enumerate() {
        if i == 0 {
            continue;
        }
        let gap = &text[sentence[i - 1].end..tok.start];
        let breaks = CLAUSE_BREAKERS.contains(&tok.normalized.as_str()) || gap.contains(';');
        if !breaks {
            continue;
        }
        if tok.start > position {
            return (start, i);
        }
        start = i;
    }
    (start, sentence.len())
}

fn opinions_for(
    text: &str,
    tokens: &[Token],
    sentences: &[(usize, usize)],
    aspect: &Aspect,
) -> Vec<OpinionExpression> {
    let Some((sentence_index, _)) = sentence_of(sentences, aspect.position) else {
        return Vec::new();
    };
    let sentence: Vec<Token> = tokens
        .iter()
        .filter(|t| t.sentence_index == sentence_index)
        .cloned()
        .collect();
    let not_the_aspect = |o: &OpinionExpression| o.position < aspect.position || o.position >= aspect.end;

    let (from, to) = clause_bounds(text, &sentence, aspect.position);
    let clause: Vec<OpinionExpression> = opinion_expressions(text, &sentence[from..to])
        .into_iter()
        .filter(not_the_aspect)
        .collect();
    if !clause.is_empty() {
        return clause;
    }
    opinion_expressions(text, &sentence)
        .into_iter()
        .filter(not_the_aspect)
        .collect()
}
