// Aspect terms: mentions of rateable product attributes.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::PhraseMatcher;
use crate::text::{sentence_spans, stem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectCategory {
    Quality,
    Price,
    Service,
    Usability,
    Performance,
    Reliability,
    Design,
    Features,
    Support,
    Value,
    General,
}

impl AspectCategory {
    pub const ALL: [AspectCategory; 11] = [
        AspectCategory::Quality,
        AspectCategory::Price,
        AspectCategory::Service,
        AspectCategory::Usability,
        AspectCategory::Performance,
        AspectCategory::Reliability,
        AspectCategory::Design,
        AspectCategory::Features,
        AspectCategory::Support,
        AspectCategory::Value,
        AspectCategory::General,
    ];
}

/// Where an aspect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectSource {
    Lexicon,
    Keyphrase,
}

use AspectCategory::*;

const ASPECT_TERMS: &[(AspectCategory, &[&str])] = &[
    (Quality, &[
        "quality", "build quality", "craftsmanship", "materials", "material", "durability",
        "finish", "workmanship", "accuracy", "output", "results", "sound quality",
        "picture quality", "image quality", "audio", "taste", "flavor",
    ]),
    (Price, &[
        "price", "prices", "pricing", "cost", "costs", "fee", "fees", "subscription",
        "plan", "plans", "billing", "charge", "charges", "price tag", "monthly fee",
        "rates", "discount",
    ]),
    (Service, &[
        "service", "customer service", "staff", "delivery", "shipping", "checkout",
        "onboarding", "waiter", "waitress", "employees", "team", "order", "returns",
        "refund", "warranty",
    ]),
    (Usability, &[
        "usability", "interface", "user interface", "ui", "ux", "user experience",
        "navigation", "setup", "installation", "learning curve", "menu", "menus",
        "controls", "workflow", "ease of use", "dashboard",
    ]),
    (Performance, &[
        "performance", "speed", "load time", "loading", "battery", "battery life",
        "latency", "responsiveness", "processor", "memory", "throughput", "startup",
        "sync", "search",
    ]),
    (Reliability, &[
        "reliability", "stability", "uptime", "bugs", "bug", "crashes", "crash",
        "downtime", "outages", "outage", "errors", "consistency", "security", "privacy",
    ]),
    (Design, &[
        "design", "look", "appearance", "layout", "style", "color", "colors", "colour",
        "screen", "display", "size", "weight", "packaging", "aesthetics", "theme",
    ]),
    (Features, &[
        "features", "feature", "functionality", "integrations", "integration", "options",
        "tools", "api", "customization", "reporting", "analytics", "automation",
        "notifications", "storage", "camera",
    ]),
    (Support, &[
        "support", "customer support", "tech support", "technical support", "help desk",
        "helpdesk", "documentation", "docs", "response time", "support team", "agents",
        "community", "tutorials",
    ]),
    (Value, &[
        "value", "value for money", "worth", "deal", "bang for the buck", "roi",
        "return on investment", "investment", "savings",
    ]),
    (General, &[
        "product", "app", "application", "software", "platform", "tool", "experience",
        "company", "brand", "device", "website", "site", "system", "solution",
    ]),
];

static MATCHER: Lazy<PhraseMatcher<AspectCategory>> = Lazy::new(|| {
    PhraseMatcher::new(
        ASPECT_TERMS
            .iter()
            .flat_map(|(cat, terms)| terms.iter().map(move |t| (*t, *cat))),
    )
});

/// Stemmed single-word terms, for mapping arbitrary words onto a category.
static STEMMED: Lazy<Vec<(String, AspectCategory)>> = Lazy::new(|| {
    ASPECT_TERMS
        .iter()
        .flat_map(|(cat, terms)| {
            terms
                .iter()
                .filter(|t| !t.contains(' '))
                .map(move |t| (stem(t), *cat))
        })
        .collect()
});

/// A mention of a rateable attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    /// Surface text
    pub term: String,
    pub normalized_term: String,
    pub category: AspectCategory,
    pub sentence_index: usize,
    /// Byte offset of the term
    pub position: usize,
    pub end: usize,
    pub source: AspectSource,
}

/// Category of a single (lowercase) word, via the lexicon or its stem.
pub fn category_for_word(word: &str) -> Option<AspectCategory> {
    if let Some(cat) = MATCHER.get(word) {
        return Some(*cat);
    }
    let stemmed = stem(word);
    STEMMED
        .iter()
        .find(|(s, _)| *s == stemmed)
        .map(|(_, cat)| *cat)
}

/// Lexicon aspects in `text`, deduplicated by (term, sentence).
pub fn detect_aspects(text: &str) -> Vec<Aspect> {
    let sentences = sentence_spans(text);
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut aspects = Vec::new();

    for m in MATCHER.find_all(text) {
        let sentence_index = sentences
            .iter()
            .position(|&(s, e)| s <= m.start && m.start < e)
            .unwrap_or(0);
        if !seen.insert((m.phrase.clone(), sentence_index)) {
            continue;
        }
        aspects.push(Aspect {
            term: m.text,
            normalized_term: m.phrase,
            category: m.payload,
            sentence_index,
            position: m.start,
            end: m.end,
            source: AspectSource::Lexicon,
        });
    }
    debug!(aspects = aspects.len(), "Detected lexicon aspects");
    aspects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiword_terms_first() {
        let aspects = detect_aspects("The customer support was slow.");
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].normalized_term, "customer support");
        assert_eq!(aspects[0].category, Support);
    }

    #[test]
    fn dedup_by_term_and_sentence() {
        let aspects = detect_aspects("Price, price, price! The price again.");
        assert_eq!(aspects.len(), 2);
        assert_eq!(aspects[0].sentence_index, 0);
        assert_eq!(aspects[1].sentence_index, 1);
    }

    #[test]
    fn stem_fallback_maps_inflections() {
        assert_eq!(category_for_word("integrations"), Some(Features));
        assert_eq!(category_for_word("designs"), Some(Design));
        assert_eq!(category_for_word("banana"), None);
    }
}
