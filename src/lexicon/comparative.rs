// Comparative and superlative framing.
//
// A table of regex families, each tagged with the kind of comparison, the
// direction it frames the subject in and the dimension being compared.
// Intensifiers in the 25 characters before a hit adjust its strength. The
// nearest capitalized phrase before a hit (within its sentence) is taken as
// the subject and the first one after it as the target.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::matcher::{capitalized_phrases, compile, PatternTable, PhraseMatcher};
use crate::patterns::span::{resolve_overlaps, Located};
use crate::text::sentence_spans;

const INTENSIFIER_WINDOW: usize = 25;
const BASE_STRENGTH: f64 = 0.5;
const SUPERLATIVE_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    Comparative,
    Superlative,
    Equative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonDirection {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonDimension {
    Quality,
    Price,
    Performance,
    Speed,
    Usability,
    Reliability,
    Popularity,
    Value,
    Size,
    General,
}

#[derive(Debug, Clone, Copy)]
struct Family {
    kind: ComparisonKind,
    direction: ComparisonDirection,
    dimension: ComparisonDimension,
    confidence: f64,
}

const fn fam(
    kind: ComparisonKind,
    direction: ComparisonDirection,
    dimension: ComparisonDimension,
    confidence: f64,
) -> Family {
    Family { kind, direction, dimension, confidence }
}

use ComparisonDimension as Dim;
use ComparisonDirection::{Negative as Neg, Neutral as Neu, Positive as Pos};
use ComparisonKind::{Comparative as Cmp, Equative as Eqv, Superlative as Sup};

const FAMILIES: &[(&str, Family)] = &[
    (r"\bbetter than\b", fam(Cmp, Pos, Dim::Quality, 0.9)),
    (r"\bworse than\b", fam(Cmp, Neg, Dim::Quality, 0.9)),
    (r"\bsuperior to\b", fam(Cmp, Pos, Dim::Quality, 0.9)),
    (r"\binferior to\b", fam(Cmp, Neg, Dim::Quality, 0.9)),
    (r"\bcheaper than\b", fam(Cmp, Pos, Dim::Price, 0.9)),
    (r"\b(?:more expensive|pricier|costlier) than\b", fam(Cmp, Neg, Dim::Price, 0.9)),
    (r"\b(?:more affordable|better value) than\b", fam(Cmp, Pos, Dim::Value, 0.9)),
    (r"\bfaster than\b", fam(Cmp, Pos, Dim::Speed, 0.9)),
    (r"\bslower than\b", fam(Cmp, Neg, Dim::Speed, 0.9)),
    (r"\beasier (?:to use )?than\b", fam(Cmp, Pos, Dim::Usability, 0.85)),
    (
        r"\b(?:harder|more difficult|more complicated) (?:to use )?than\b",
        fam(Cmp, Neg, Dim::Usability, 0.85),
    ),
    (r"\b(?:more reliable|more stable) than\b", fam(Cmp, Pos, Dim::Reliability, 0.9)),
    (r"\b(?:less reliable|less stable) than\b", fam(Cmp, Neg, Dim::Reliability, 0.9)),
    (r"\bmore popular than\b", fam(Cmp, Pos, Dim::Popularity, 0.85)),
    (r"\bless popular than\b", fam(Cmp, Neg, Dim::Popularity, 0.85)),
    (r"\b(?:more powerful|more efficient) than\b", fam(Cmp, Pos, Dim::Performance, 0.85)),
    (r"\b(?:bigger|larger) than\b", fam(Cmp, Neu, Dim::Size, 0.8)),
    (r"\bsmaller than\b", fam(Cmp, Neu, Dim::Size, 0.8)),
    (r"\boutperform(?:s|ed|ing)?\b", fam(Cmp, Pos, Dim::Performance, 0.85)),
    (r"\bunderperform(?:s|ed|ing)?\b", fam(Cmp, Neg, Dim::Performance, 0.85)),
    (r"\b(?:beats|surpasses|exceeds|outshines|outclasses)\b", fam(Cmp, Pos, Dim::General, 0.75)),
    (r"\b(?:lags behind|falls short of|trails behind)\b", fam(Cmp, Neg, Dim::General, 0.75)),
    (r"\bmore [a-z]+ than\b", fam(Cmp, Neu, Dim::General, 0.6)),
    (r"\bless [a-z]+ than\b", fam(Cmp, Neu, Dim::General, 0.6)),
    (r"\b[a-z]{2,}er than\b", fam(Cmp, Neu, Dim::General, 0.5)),
    (r"\bthe best\b", fam(Sup, Pos, Dim::Quality, 0.9)),
    (r"\bthe worst\b", fam(Sup, Neg, Dim::Quality, 0.9)),
    (r"\bthe cheapest\b", fam(Sup, Pos, Dim::Price, 0.9)),
    (r"\bthe most expensive\b", fam(Sup, Neg, Dim::Price, 0.9)),
    (r"\bthe (?:most affordable|best value)\b", fam(Sup, Pos, Dim::Value, 0.9)),
    (r"\bthe fastest\b", fam(Sup, Pos, Dim::Speed, 0.9)),
    (r"\bthe slowest\b", fam(Sup, Neg, Dim::Speed, 0.9)),
    (r"\bthe easiest\b", fam(Sup, Pos, Dim::Usability, 0.9)),
    (r"\bthe (?:most reliable|most stable)\b", fam(Sup, Pos, Dim::Reliability, 0.9)),
    (r"\bthe (?:most popular|leading|top)\b", fam(Sup, Pos, Dim::Popularity, 0.85)),
    (r"\b(?:number one|no\. ?1)\b", fam(Sup, Pos, Dim::Popularity, 0.8)),
    (
        r"\b(?:best-in-class|industry-leading|world-class|unmatched|unrivaled)\b",
        fam(Sup, Pos, Dim::Quality, 0.8),
    ),
    (r"\bthe most [a-z]+\b", fam(Sup, Neu, Dim::General, 0.6)),
    (r"\bthe least [a-z]+\b", fam(Sup, Neu, Dim::General, 0.6)),
    (r"\bthe [a-z]{3,}est\b", fam(Sup, Neu, Dim::General, 0.45)),
    (r"\bas (?:good|great|capable) as\b", fam(Eqv, Pos, Dim::Quality, 0.8)),
    (r"\bas [a-z]+ as\b", fam(Eqv, Neu, Dim::General, 0.6)),
    (
        r"\b(?:similar to|comparable to|on par with|the same as|equivalent to)\b",
        fam(Eqv, Neu, Dim::General, 0.7),
    ),
];

static TABLE: Lazy<PatternTable<Family>> =
    Lazy::new(|| PatternTable::new(FAMILIES.iter().copied()));

static INTENSIFIERS: Lazy<PhraseMatcher<f64>> = Lazy::new(|| {
    PhraseMatcher::new([
        ("much", 0.3),
        ("far", 0.3),
        ("by far", 0.35),
        ("way", 0.25),
        ("vastly", 0.35),
        ("significantly", 0.3),
        ("considerably", 0.25),
        ("substantially", 0.3),
        ("dramatically", 0.3),
        ("a lot", 0.2),
        ("clearly", 0.2),
        ("easily", 0.2),
        ("absolutely", 0.25),
        ("slightly", -0.2),
        ("marginally", -0.2),
        ("somewhat", -0.15),
        ("a bit", -0.15),
        ("a little", -0.15),
        ("barely", -0.25),
    ])
});

static VERSUS: Lazy<Regex> = Lazy::new(|| {
    compile(r"([A-Z][A-Za-z0-9&\-]*(?: [A-Z][A-Za-z0-9&\-]*)*)\s+(?:vs\.?|versus|VS\.?)\s+([A-Z][A-Za-z0-9&\-]*(?: [A-Z][A-Za-z0-9&\-]*)*)")
});
static BETWEEN: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b[Bb]etween ([A-Z][A-Za-z0-9&\-]*(?: [A-Z][A-Za-z0-9&\-]*)*) and ([A-Z][A-Za-z0-9&\-]*(?: [A-Z][A-Za-z0-9&\-]*)*)")
});
static COMPARED_TO: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(?:[Cc]ompared (?:to|with)|[Rr]elative to|[Aa]gainst) ([A-Z][A-Za-z0-9&\-]*(?: [A-Z][A-Za-z0-9&\-]*)*)")
});

/// One comparative or superlative construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub text: String,
    pub kind: ComparisonKind,
    pub direction: ComparisonDirection,
    pub dimension: ComparisonDimension,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    /// Base 0.5, moved by nearby intensifiers, in [0,1]
    pub strength: f64,
    pub intensifier: Option<String>,
    pub subject: Option<String>,
    pub target: Option<String>,
}

impl Located for Comparison {
    fn start(&self) -> usize {
        self.start
    }
    fn end(&self) -> usize {
        self.end
    }
    fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// How two entities were put side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairConstruction {
    Versus,
    Between,
    ComparedTo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPair {
    pub left: Option<String>,
    pub right: String,
    pub construction: PairConstruction,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub comparative_count: usize,
    pub superlative_count: usize,
    pub equative_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    /// (positive - negative) / directional comparisons, 0 when none
    pub net_direction: f64,
    pub dominant_dimension: Option<ComparisonDimension>,
    pub average_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAnalysis {
    pub comparisons: Vec<Comparison>,
    /// Entities named in comparisons, in order of first appearance
    pub entities: Vec<String>,
    pub pairs: Vec<EntityPair>,
    pub summary: ComparisonSummary,
}

/// Detect comparative, superlative and equative framing in `text`.
pub fn analyze_comparative_patterns(text: &str) -> ComparisonAnalysis {
    let sentences = sentence_spans(text);
    let phrases = capitalized_phrases(text);

    let candidates: Vec<Comparison> = TABLE
        .find_all(text)
        .into_iter()
        .map(|m| {
            let family = *m.payload;
            let (strength, intensifier) = strength_at(text, m.start, family.kind);
            let (sent_start, sent_end) = sentences
                .iter()
                .copied()
                .find(|&(s, e)| s <= m.start && m.start < e)
                .unwrap_or((0, text.len()));
            let subject = phrases
                .iter()
                .rev()
                .find(|&&(s, e)| s >= sent_start && e <= m.start)
                .map(|&(s, e)| text[s..e].to_string());
            let target = phrases
                .iter()
                .find(|&&(s, e)| s >= m.end && e <= sent_end)
                .map(|&(s, e)| text[s..e].to_string());
            Comparison {
                text: m.text,
                kind: family.kind,
                direction: family.direction,
                dimension: family.dimension,
                start: m.start,
                end: m.end,
                confidence: family.confidence,
                strength,
                intensifier,
                subject,
                target,
            }
        })
        .collect();
    let comparisons = resolve_overlaps(candidates);

    let pairs = entity_pairs(text);
    let mut entities: Vec<String> = Vec::new();
    let mut remember = |name: &str| {
        if !entities.iter().any(|e| e == name) {
            entities.push(name.to_string());
        }
    };
    let mut ordered: Vec<(usize, &str)> = Vec::new();
    for c in &comparisons {
        if let Some(s) = &c.subject {
            ordered.push((c.start, s));
        }
        if let Some(t) = &c.target {
            ordered.push((c.end, t));
        }
    }
    for p in &pairs {
        if let Some(l) = &p.left {
            ordered.push((p.start, l));
        }
        ordered.push((p.start + 1, &p.right));
    }
    ordered.sort_by_key(|&(pos, _)| pos);
    for (_, name) in ordered {
        remember(name);
    }

    let summary = summarize(&comparisons);
    debug!(
        comparisons = comparisons.len(),
        entities = entities.len(),
        "Analyzed comparative patterns"
    );

    ComparisonAnalysis {
        comparisons,
        entities,
        pairs,
        summary,
    }
}

fn strength_at(text: &str, start: usize, kind: ComparisonKind) -> (f64, Option<String>) {
    let mut from = start.saturating_sub(INTENSIFIER_WINDOW);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let window = &text[from..start];
    let mut strength = BASE_STRENGTH;
    if kind == ComparisonKind::Superlative {
        strength += SUPERLATIVE_BONUS;
    }
    // the closest intensifier to the construction is the one that modifies it
    let hit = INTENSIFIERS.find_all(window).into_iter().last();
    let intensifier = hit.map(|m| {
        strength += m.payload;
        m.text
    });
    (strength.clamp(0.0, 1.0), intensifier)
}

fn entity_pairs(text: &str) -> Vec<EntityPair> {
    let mut pairs = Vec::new();
    for caps in VERSUS.captures_iter(text) {
        if let (Some(whole), Some(l), Some(r)) = (caps.get(0), caps.get(1), caps.get(2)) {
            pairs.push(EntityPair {
                left: Some(strip_leading_article(l.as_str())),
                right: r.as_str().to_string(),
                construction: PairConstruction::Versus,
                start: whole.start(),
            });
        }
    }
    for caps in BETWEEN.captures_iter(text) {
        if let (Some(whole), Some(l), Some(r)) = (caps.get(0), caps.get(1), caps.get(2)) {
            pairs.push(EntityPair {
                left: Some(l.as_str().to_string()),
                right: r.as_str().to_string(),
                construction: PairConstruction::Between,
                start: whole.start(),
            });
        }
    }
    for caps in COMPARED_TO.captures_iter(text) {
        if let (Some(whole), Some(r)) = (caps.get(0), caps.get(1)) {
            pairs.push(EntityPair {
                left: None,
                right: r.as_str().to_string(),
                construction: PairConstruction::ComparedTo,
                start: whole.start(),
            });
        }
    }
    pairs.sort_by_key(|p| p.start);
    pairs
}

fn strip_leading_article(name: &str) -> String {
    name.strip_prefix("The ").unwrap_or(name).to_string()
}

fn summarize(comparisons: &[Comparison]) -> ComparisonSummary {
    let count_kind = |k| comparisons.iter().filter(|c| c.kind == k).count();
    let count_dir = |d| comparisons.iter().filter(|c| c.direction == d).count();
    let positive_count = count_dir(ComparisonDirection::Positive);
    let negative_count = count_dir(ComparisonDirection::Negative);
    let directional = positive_count + negative_count;
    let net_direction = if directional == 0 {
        0.0
    } else {
        (positive_count as f64 - negative_count as f64) / directional as f64
    };

    let mut by_dimension: HashMap<ComparisonDimension, usize> = HashMap::new();
    for c in comparisons.iter().filter(|c| c.dimension != ComparisonDimension::General) {
        *by_dimension.entry(c.dimension).or_insert(0) += 1;
    }
    // ties go to the lower-ordered dimension so the result is stable
    let dominant_dimension = by_dimension
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(d, _)| d)
        .or_else(|| comparisons.first().map(|_| ComparisonDimension::General));

    let average_strength = if comparisons.is_empty() {
        0.0
    } else {
        comparisons.iter().map(|c| c.strength).sum::<f64>() / comparisons.len() as f64
    };

    ComparisonSummary {
        comparative_count: count_kind(ComparisonKind::Comparative),
        superlative_count: count_kind(ComparisonKind::Superlative),
        equative_count: count_kind(ComparisonKind::Equative),
        positive_count,
        negative_count,
        net_direction,
        dominant_dimension,
        average_strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn better_than_with_subject_and_target() {
        let a = analyze_comparative_patterns("Acme is much better than Globex.");
        assert_eq!(a.comparisons.len(), 1);
        let c = &a.comparisons[0];
        assert_eq!(c.kind, ComparisonKind::Comparative);
        assert_eq!(c.direction, ComparisonDirection::Positive);
        assert_eq!(c.dimension, ComparisonDimension::Quality);
        assert_eq!(c.subject.as_deref(), Some("Acme"));
        assert_eq!(c.target.as_deref(), Some("Globex"));
        assert_eq!(c.intensifier.as_deref(), Some("much"));
        assert!((c.strength - 0.8).abs() < 1e-9, "got {}", c.strength);
        assert_eq!(a.entities, vec!["Acme", "Globex"]);
    }

    #[test]
    fn specific_family_beats_generic_er_than() {
        let a = analyze_comparative_patterns("It is cheaper than the rest.");
        assert_eq!(a.comparisons.len(), 1);
        assert_eq!(a.comparisons[0].dimension, ComparisonDimension::Price);
    }

    #[test]
    fn superlative_detected() {
        let a = analyze_comparative_patterns("This is the worst app I have used.");
        assert_eq!(a.summary.superlative_count, 1);
        assert_eq!(a.summary.negative_count, 1);
        assert!((a.summary.net_direction + 1.0).abs() < 1e-9);
    }

    #[test]
    fn versus_pairs_are_extracted() {
        let a = analyze_comparative_patterns("Acme vs Globex: which wins?");
        assert_eq!(a.pairs.len(), 1);
        assert_eq!(a.pairs[0].left.as_deref(), Some("Acme"));
        assert_eq!(a.pairs[0].right, "Globex");
    }

    #[test]
    fn empty_text_has_no_comparisons() {
        let a = analyze_comparative_patterns("");
        assert!(a.comparisons.is_empty());
        assert_eq!(a.summary.dominant_dimension, None);
        assert_eq!(a.summary.net_direction, 0.0);
    }
}
