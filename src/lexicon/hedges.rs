// Hedge and certainty scoring.
//
// The hedge lexicon is organized into eight semantic categories, each entry
// tagged with the certainty tier it conveys. Scoring starts at a neutral 0.5:
// low- and medium-certainty hedges pull it down, high-certainty hedges and
// booster words push it up, and dense hedging (more than 10% of words) costs
// an extra penalty. Phrases are matched longest first with claimed ranges so
// "might be" is never also counted as "might".

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::matcher::PhraseMatcher;
use crate::text::tokenize;

pub const NEUTRAL_CERTAINTY: f64 = 0.5;
const LOW_TIER_DELTA: f64 = -0.10;
const MEDIUM_TIER_DELTA: f64 = -0.05;
const HIGH_TIER_DELTA: f64 = 0.05;
const BOOSTER_DELTA: f64 = 0.08;
const DENSITY_THRESHOLD: f64 = 0.10;
const DENSITY_PENALTY: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HedgeCategory {
    Modal,
    EpistemicVerb,
    Approximator,
    ProbabilityMarker,
    Evidential,
    Downtoner,
    Conditional,
    Impersonal,
}

/// How much certainty a hedge conveys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertaintyTier {
    Low,
    Medium,
    High,
}

impl CertaintyTier {
    fn delta(self) -> f64 {
        match self {
            CertaintyTier::Low => LOW_TIER_DELTA,
            CertaintyTier::Medium => MEDIUM_TIER_DELTA,
            CertaintyTier::High => HIGH_TIER_DELTA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertaintyLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl CertaintyLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 0.2 => CertaintyLevel::VeryLow,
            s if s < 0.4 => CertaintyLevel::Low,
            s if s < 0.6 => CertaintyLevel::Moderate,
            s if s < 0.8 => CertaintyLevel::High,
            _ => CertaintyLevel::VeryHigh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Marker {
    Hedge(HedgeCategory, CertaintyTier),
    Booster,
}

use CertaintyTier::{High, Low, Medium};
use HedgeCategory::*;

const HEDGES: &[(&str, HedgeCategory, CertaintyTier)] = &[
    // modals
    ("might", Modal, Low), ("might be", Modal, Low), ("may", Modal, Low),
    ("may be", Modal, Low), ("could", Modal, Low), ("could be", Modal, Low),
    ("would", Modal, Medium), ("should", Modal, Medium), ("ought to", Modal, Medium),
    ("must", Modal, High), ("will", Modal, High),
    // epistemic verbs
    ("think", EpistemicVerb, Medium), ("believe", EpistemicVerb, Medium),
    ("suppose", EpistemicVerb, Low), ("guess", EpistemicVerb, Low),
    ("suspect", EpistemicVerb, Low), ("assume", EpistemicVerb, Medium),
    ("seem", EpistemicVerb, Medium), ("seems", EpistemicVerb, Medium),
    ("appear", EpistemicVerb, Medium), ("appears", EpistemicVerb, Medium),
    ("tend to", EpistemicVerb, Medium), ("tends to", EpistemicVerb, Medium),
    ("i feel", EpistemicVerb, Medium), ("doubt", EpistemicVerb, Low),
    ("not sure", EpistemicVerb, Low), ("unsure", EpistemicVerb, Low),
    ("confident", EpistemicVerb, High), ("convinced", EpistemicVerb, High),
    // approximators
    ("approximately", Approximator, Medium), ("roughly", Approximator, Medium),
    ("more or less", Approximator, Medium), ("sort of", Approximator, Low),
    ("kind of", Approximator, Low), ("somewhat", Approximator, Medium),
    ("to some extent", Approximator, Medium), ("in some ways", Approximator, Medium),
    ("nearly", Approximator, Medium), ("almost", Approximator, Medium),
    ("basically", Approximator, Medium), ("essentially", Approximator, Medium),
    // probability markers
    ("possibly", ProbabilityMarker, Low), ("perhaps", ProbabilityMarker, Low),
    ("maybe", ProbabilityMarker, Low), ("probably", ProbabilityMarker, Medium),
    ("likely", ProbabilityMarker, Medium), ("unlikely", ProbabilityMarker, Low),
    ("most likely", ProbabilityMarker, Medium),
    ("in all likelihood", ProbabilityMarker, Medium),
    ("presumably", ProbabilityMarker, Medium), ("conceivably", ProbabilityMarker, Low),
    ("almost certainly", ProbabilityMarker, High),
    ("highly likely", ProbabilityMarker, High),
    // evidentials
    ("reportedly", Evidential, Low), ("allegedly", Evidential, Low),
    ("apparently", Evidential, Low), ("according to", Evidential, Medium),
    ("rumored", Evidential, Low), ("suggests", Evidential, Medium),
    ("indicates", Evidential, Medium), ("evidence suggests", Evidential, Medium),
    ("research shows", Evidential, High), ("studies show", Evidential, High),
    ("data shows", Evidential, High), ("it has been reported", Evidential, Low),
    // downtoners
    ("slightly", Downtoner, Medium), ("a bit", Downtoner, Medium),
    ("a little", Downtoner, Medium), ("relatively", Downtoner, Medium),
    ("fairly", Downtoner, Medium), ("partially", Downtoner, Medium),
    ("to a degree", Downtoner, Medium), ("mostly", Downtoner, Medium),
    ("largely", Downtoner, Medium), ("generally", Downtoner, Medium),
    ("typically", Downtoner, Medium), ("usually", Downtoner, Medium),
    ("often", Downtoner, Medium), ("sometimes", Downtoner, Low),
    ("occasionally", Downtoner, Low),
    // conditionals
    ("unless", Conditional, Medium), ("in case", Conditional, Medium),
    ("assuming that", Conditional, Medium), ("provided that", Conditional, Medium),
    ("depending on", Conditional, Medium), ("as long as", Conditional, Medium),
    ("in theory", Conditional, Low), ("theoretically", Conditional, Low),
    ("if", Conditional, Medium),
    // impersonal constructions
    ("it seems", Impersonal, Medium), ("it appears", Impersonal, Medium),
    ("it is possible", Impersonal, Low), ("it is likely", Impersonal, Medium),
    ("it is believed", Impersonal, Low), ("it is thought", Impersonal, Low),
    ("there is a chance", Impersonal, Low), ("it could be argued", Impersonal, Low),
    ("it is clear", Impersonal, High), ("it is certain", Impersonal, High),
    ("it is evident", Impersonal, High), ("it is known", Impersonal, High),
];

const BOOSTERS: &[&str] = &[
    "definitely", "certainly", "clearly", "undoubtedly", "absolutely",
    "obviously", "surely", "always", "of course", "without a doubt", "no doubt",
    "indeed", "know", "proven", "guaranteed", "in fact", "undeniably",
    "unquestionably", "evidently", "for sure", "for certain",
];

static MATCHER: Lazy<PhraseMatcher<Marker>> = Lazy::new(|| {
    PhraseMatcher::new(
        HEDGES
            .iter()
            .map(|&(p, c, t)| (p, Marker::Hedge(c, t)))
            .chain(BOOSTERS.iter().map(|&p| (p, Marker::Booster))),
    )
});

/// One hedge found in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeMatch {
    pub text: String,
    pub category: HedgeCategory,
    pub tier: CertaintyTier,
    pub start: usize,
    pub end: usize,
}

/// One certainty booster found in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoosterMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertaintyAnalysis {
    /// Certainty in [0,1], 0.5 = neutral
    pub score: f64,
    pub level: CertaintyLevel,
    pub hedges: Vec<HedgeMatch>,
    pub boosters: Vec<BoosterMatch>,
    /// Hedges per word
    pub hedge_density: f64,
    pub category_counts: BTreeMap<HedgeCategory, usize>,
    pub word_count: usize,
}

/// Full certainty analysis of `text`.
pub fn analyze_certainty(text: &str) -> CertaintyAnalysis {
    let word_count = tokenize(text).len();
    let mut hedges = Vec::new();
    let mut boosters = Vec::new();

    for m in MATCHER.find_all(text) {
        match m.payload {
            Marker::Hedge(category, tier) => hedges.push(HedgeMatch {
                text: m.text,
                category,
                tier,
                start: m.start,
                end: m.end,
            }),
            Marker::Booster => boosters.push(BoosterMatch {
                text: m.text,
                start: m.start,
                end: m.end,
            }),
        }
    }

    let hedge_density = if word_count == 0 {
        0.0
    } else {
        hedges.len() as f64 / word_count as f64
    };

    let mut score = NEUTRAL_CERTAINTY;
    score += hedges.iter().map(|h| h.tier.delta()).sum::<f64>();
    score += boosters.len() as f64 * BOOSTER_DELTA;
    if hedge_density > DENSITY_THRESHOLD {
        score -= DENSITY_PENALTY;
    }
    let score = score.clamp(0.0, 1.0);

    let mut category_counts = BTreeMap::new();
    for h in &hedges {
        *category_counts.entry(h.category).or_insert(0) += 1;
    }

    debug!(
        hedges = hedges.len(),
        boosters = boosters.len(),
        score,
        "Scored certainty"
    );

    CertaintyAnalysis {
        score,
        level: CertaintyLevel::from_score(score),
        hedges,
        boosters,
        hedge_density,
        category_counts,
        word_count,
    }
}

/// Certainty score in [0,1] for `text`.
pub fn score_certainty(text: &str) -> f64 {
    analyze_certainty(text).score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosters_beat_hedges() {
        let sure = score_certainty("I definitely know this will work");
        let unsure = score_certainty("I think this might possibly work");
        assert!(sure > unsure, "{sure} should exceed {unsure}");
        assert!(sure > NEUTRAL_CERTAINTY);
        assert!(unsure < NEUTRAL_CERTAINTY);
    }

    #[test]
    fn longer_phrase_is_not_double_counted() {
        let a = analyze_certainty("It might be fine");
        assert_eq!(a.hedges.len(), 1);
        assert_eq!(a.hedges[0].text, "might be");
    }

    #[test]
    fn dense_hedging_is_penalized() {
        let a = analyze_certainty("Maybe perhaps possibly");
        // 3 low hedges (-0.3) plus the density penalty (-0.1)
        assert!((a.score - 0.1).abs() < 1e-9, "got {}", a.score);
        assert_eq!(a.level, CertaintyLevel::VeryLow);
    }

    #[test]
    fn empty_text_is_neutral() {
        let a = analyze_certainty("");
        assert!((a.score - NEUTRAL_CERTAINTY).abs() < f64::EPSILON);
        assert_eq!(a.word_count, 0);
        assert!(a.hedges.is_empty());
    }

    #[test]
    fn categories_are_counted() {
        let a = analyze_certainty("Reportedly it is roughly done, probably.");
        assert_eq!(a.category_counts.get(&Evidential), Some(&1));
        assert_eq!(a.category_counts.get(&Approximator), Some(&1));
        assert_eq!(a.category_counts.get(&ProbabilityMarker), Some(&1));
    }
}
