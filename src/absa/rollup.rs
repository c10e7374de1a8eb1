// Per-category and document-level rollups of linked aspects.

use serde::{Deserialize, Serialize};

use super::{AbsaResult, AspectPolarity, AspectSentiment};
use crate::patterns::aspects::{AspectCategory, AspectSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: AspectCategory,
    pub aspect_count: usize,
    /// Mean aspect score, 0 for a category with no aspects
    pub average_score: f64,
    pub polarity: AspectPolarity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbsaStats {
    pub total_aspects: usize,
    pub lexicon_aspects: usize,
    pub keyphrase_aspects: usize,
    pub positive_aspects: usize,
    pub negative_aspects: usize,
    pub neutral_aspects: usize,
    pub mixed_aspects: usize,
    pub total_opinions: usize,
    pub average_confidence: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Polarity of a group of aspects: the score decides beyond +/-0.2,
/// otherwise a group holding both positive and negative aspects is mixed.
fn group_polarity(score: f64, members: &[&AspectSentiment]) -> AspectPolarity {
    let has = |p| members.iter().any(|a| a.polarity == p);
    let polarity = AspectPolarity::classify(score, 0);
    if polarity == AspectPolarity::Neutral
        && has(AspectPolarity::Positive)
        && has(AspectPolarity::Negative)
    {
        AspectPolarity::Mixed
    } else {
        polarity
    }
}

pub(super) fn summarize(aspects: Vec<AspectSentiment>) -> AbsaResult {
    let categories = AspectCategory::ALL
        .iter()
        .map(|&category| {
            let members: Vec<&AspectSentiment> = aspects
                .iter()
                .filter(|a| a.aspect.category == category)
                .collect();
            let average_score = mean(members.iter().map(|a| a.score)).unwrap_or(0.0);
            CategorySummary {
                category,
                aspect_count: members.len(),
                average_score,
                polarity: group_polarity(average_score, &members),
            }
        })
        .collect();

    let all: Vec<&AspectSentiment> = aspects.iter().collect();
    let overall_score = mean(aspects.iter().map(|a| a.score)).unwrap_or(0.0);
    let overall_polarity = group_polarity(overall_score, &all);

    let count = |p| aspects.iter().filter(|a| a.polarity == p).count();
    let stats = AbsaStats {
        total_aspects: aspects.len(),
        lexicon_aspects: aspects
            .iter()
            .filter(|a| a.aspect.source == AspectSource::Lexicon)
            .count(),
        keyphrase_aspects: aspects
            .iter()
            .filter(|a| a.aspect.source == AspectSource::Keyphrase)
            .count(),
        positive_aspects: count(AspectPolarity::Positive),
        negative_aspects: count(AspectPolarity::Negative),
        neutral_aspects: count(AspectPolarity::Neutral),
        mixed_aspects: count(AspectPolarity::Mixed),
        total_opinions: aspects.iter().map(|a| a.opinions.len()).sum(),
        average_confidence: mean(aspects.iter().map(|a| a.confidence)).unwrap_or(0.0),
    };

    AbsaResult {
        aspects,
        categories,
        overall_score,
        overall_polarity,
        stats,
    }
}
