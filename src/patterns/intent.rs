// Query intent classification.
//
// Every intent owns a list of patterns and a weight. An intent scores
// (patterns matched / patterns in its list) * weight; the best intent is
// primary and up to two runners-up scoring at least 0.1 are kept.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::PatternTable;

const RUNNER_UP_FLOOR: f64 = 0.1;
const MAX_RUNNERS_UP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Informational,
    Navigational,
    Transactional,
    Comparison,
    Recommendation,
    Review,
    Pricing,
    Troubleshooting,
    Alternatives,
}

impl QueryIntent {
    pub const ALL: [QueryIntent; 9] = [
        QueryIntent::Informational,
        QueryIntent::Navigational,
        QueryIntent::Transactional,
        QueryIntent::Comparison,
        QueryIntent::Recommendation,
        QueryIntent::Review,
        QueryIntent::Pricing,
        QueryIntent::Troubleshooting,
        QueryIntent::Alternatives,
    ];

    pub fn weight(self) -> f64 {
        match self {
            QueryIntent::Informational => 0.8,
            QueryIntent::Navigational | QueryIntent::Review => 0.9,
            QueryIntent::Recommendation | QueryIntent::Troubleshooting => 0.95,
            QueryIntent::Transactional
            | QueryIntent::Comparison
            | QueryIntent::Pricing
            | QueryIntent::Alternatives => 1.0,
        }
    }
}

use QueryIntent::*;

const PATTERNS: &[(&str, QueryIntent)] = &[
    (r"^\s*(?:what|who|when|where|why|how)\b", Informational),
    (r"\bwhat (?:is|are)\b", Informational),
    (r"\bhow (?:do|does|to|can)\b", Informational),
    (r"\bexplain\b", Informational),
    (r"\b(?:meaning|definition) of\b", Informational),
    (r"\b(?:guide|tutorial|overview)\b", Informational),
    (r"\blearn\b", Informational),
    (r"\bhistory of\b", Informational),
    (r"\b(?:login|log in|sign in)\b", Navigational),
    (r"\bofficial (?:site|website|page)\b", Navigational),
    (r"\b(?:website|homepage|home page)\b", Navigational),
    (r"\bdownload\b", Navigational),
    (r"(?:\bwww\.|\.com\b|\.io\b)", Navigational),
    (r"\bcontact\b", Navigational),
    (r"\b(?:dashboard|account|portal)\b", Navigational),
    (r"\bbuy\b", Transactional),
    (r"\bpurchase\b", Transactional),
    (r"\border\b", Transactional),
    (r"\bsubscribe\b", Transactional),
    (r"\bsign up\b", Transactional),
    (r"\bfree trial\b", Transactional),
    (r"\b(?:coupon|discount|promo code|deal)s?\b", Transactional),
    (r"\bshop\b", Transactional),
    (r"\b(?:vs\.?|versus)(?:\s|$)", Comparison),
    (r"\b(?:compare|comparison|comparing)\b", Comparison),
    (r"\bdifference(?:s)? between\b", Comparison),
    (r"\b(?:better|worse) than\b", Comparison),
    (r"\b(?:which|what) is better\b", Comparison),
    (r"\bor\b.*\?\s*$", Comparison),
    (r"\bbest\b", Recommendation),
    (r"\btop(?: \d+)?\b", Recommendation),
    (r"\brecommend(?:ed|ation|ations)?\b", Recommendation),
    (r"\bshould i\b", Recommendation),
    (r"\bsuggest(?:ion|ions)?\b", Recommendation),
    (r"\bfor (?:beginners|small business(?:es)?|startups|teams)\b", Recommendation),
    (r"\b(?:ideal|right) (?:for|choice)\b", Recommendation),
    (r"\breviews?\b", Review),
    (r"\bratings?\b", Review),
    (r"\b(?:is|are) .+ (?:good|legit|reliable|safe)\b", Review),
    (r"\bworth it\b", Review),
    (r"\bpros and cons\b", Review),
    (r"\bexperiences? with\b", Review),
    (r"\bopinions?\b", Review),
    (r"\btestimonials?\b", Review),
    (r"\b(?:price|prices|pricing)\b", Pricing),
    (r"\bcosts?\b", Pricing),
    (r"\bhow much\b", Pricing),
    (r"\bcheap(?:er|est)?\b", Pricing),
    (r"\baffordable\b", Pricing),
    (r"\bfree\b", Pricing),
    (r"\b(?:plans?|tiers?)\b", Pricing),
    (r"\bfees?\b", Pricing),
    (r"\bsubscription\b", Pricing),
    (r"\bnot working\b", Troubleshooting),
    (r"\berrors?\b", Troubleshooting),
    (r"\bfix\b", Troubleshooting),
    (r"\b(?:problem|issue)s?\b", Troubleshooting),
    (r"\bcrash(?:es|ed|ing)?\b", Troubleshooting),
    (r"\bbroken\b", Troubleshooting),
    (r"\bhow to (?:fix|solve|resolve)\b", Troubleshooting),
    (r"\b(?:can't|cannot|won't)\b", Troubleshooting),
    (r"\b(?:fails|failed|failing)\b", Troubleshooting),
    (r"\btroubleshoot(?:ing)?\b", Troubleshooting),
    (r"\balternatives?\b", Alternatives),
    (r"\binstead of\b", Alternatives),
    (r"\bsimilar to\b", Alternatives),
    (r"\bcompetitors?\b", Alternatives),
    (r"\breplace(?:ment)?\b", Alternatives),
    (r"\bswitch(?:ing)? from\b", Alternatives),
    (r"\bother than\b", Alternatives),
    (r"\blike [a-z0-9]+ but\b", Alternatives),
];

static TABLE: Lazy<PatternTable<QueryIntent>> =
    Lazy::new(|| PatternTable::new(PATTERNS.iter().copied()));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: QueryIntent,
    pub score: f64,
    pub matched_patterns: usize,
    pub total_patterns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub primary: QueryIntent,
    /// Score of the primary intent, 0 when nothing matched
    pub confidence: f64,
    /// Up to two further intents scoring at least 0.1
    pub secondary: Vec<IntentScore>,
    /// Every intent with at least one match, best first
    pub scores: Vec<IntentScore>,
    pub is_question: bool,
}

/// Rank the nine intents for `query`.
pub fn classify_query_intent(query: &str) -> IntentClassification {
    let normalized = query.trim().to_lowercase();
    let matched = TABLE.matching(&normalized);

    let mut scores: Vec<IntentScore> = QueryIntent::ALL
        .iter()
        .filter_map(|&intent| {
            let total = PATTERNS.iter().filter(|(_, i)| *i == intent).count();
            let hits = matched.iter().filter(|(_, i)| **i == intent).count();
            (hits > 0).then(|| IntentScore {
                intent,
                score: hits as f64 / total as f64 * intent.weight(),
                matched_patterns: hits,
                total_patterns: total,
            })
        })
        .collect();
    // stable sort keeps declaration order among equal scores
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));

    let (primary, confidence) = scores
        .first()
        .map_or((Informational, 0.0), |s| (s.intent, s.score.clamp(0.0, 1.0)));
    let secondary = scores
        .iter()
        .skip(1)
        .filter(|s| s.score >= RUNNER_UP_FLOOR)
        .take(MAX_RUNNERS_UP)
        .cloned()
        .collect();
    let is_question = normalized.ends_with('?')
        || matched
            .iter()
            .any(|&(index, _)| index == 0);

    debug!(intent = ?primary, confidence, "Classified query intent");
    IntentClassification {
        primary,
        confidence,
        secondary,
        scores,
        is_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_query() {
        let c = classify_query_intent("How much does Acme cost per month?");
        assert_eq!(c.primary, Pricing);
        assert!(c.confidence > 0.0);
        assert!(c.is_question);
    }

    #[test]
    fn alternatives_query_keeps_runner_up() {
        let c = classify_query_intent("best alternatives to Salesforce instead of paying more");
        assert_eq!(c.primary, Alternatives);
        assert!(c.secondary.iter().any(|s| s.intent == Recommendation));
        assert!(c.secondary.len() <= 2);
    }

    #[test]
    fn no_match_defaults_to_informational() {
        let c = classify_query_intent("zebra");
        assert_eq!(c.primary, Informational);
        assert_eq!(c.confidence, 0.0);
        assert!(c.scores.is_empty());
    }

    #[test]
    fn secondary_respects_floor() {
        let c = classify_query_intent("acme vs globex pricing reviews");
        assert!(c.secondary.iter().all(|s| s.score >= RUNNER_UP_FLOOR));
    }
}
