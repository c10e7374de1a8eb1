// Negation cues and their scope.
//
// A cue's scope runs forward from the cue to the nearest clause break or
// contrastive conjunction, capped at eight tokens. A comma does not end the
// scope when the next word is a negative-polarity item ("not here, ever").
// Prefix negation ("unhappy") only counts when the remainder is a known root,
// and scopes over that single word.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::PhraseMatcher;
use super::span::Span;
use crate::text::{gap_has_clause_break, tokenize, Token};

const MAX_SCOPE_TOKENS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegationCategory {
    Standard,
    Contraction,
    Prefix,
    Adverb,
    Determiner,
    Preposition,
    Verb,
}

impl NegationCategory {
    fn confidence(self) -> f64 {
        match self {
            NegationCategory::Standard | NegationCategory::Contraction => 0.95,
            NegationCategory::Determiner => 0.85,
            NegationCategory::Preposition => 0.8,
            NegationCategory::Adverb => 0.75,
            NegationCategory::Verb | NegationCategory::Prefix => 0.7,
        }
    }
}

use NegationCategory::*;

const CUES: &[(&str, NegationCategory)] = &[
    ("not", Standard), ("never", Standard), ("cannot", Standard), ("nor", Standard),
    ("nothing", Standard), ("nobody", Standard), ("nowhere", Standard),
    ("no one", Standard), ("not at all", Standard), ("by no means", Standard),
    ("in no way", Standard), ("no longer", Adverb),
    ("don't", Contraction), ("doesn't", Contraction), ("didn't", Contraction),
    ("isn't", Contraction), ("aren't", Contraction), ("wasn't", Contraction),
    ("weren't", Contraction), ("won't", Contraction), ("wouldn't", Contraction),
    ("can't", Contraction), ("couldn't", Contraction), ("shouldn't", Contraction),
    ("haven't", Contraction), ("hasn't", Contraction), ("hadn't", Contraction),
    ("mustn't", Contraction), ("needn't", Contraction), ("ain't", Contraction),
    ("shan't", Contraction), ("mightn't", Contraction),
    ("hardly", Adverb), ("barely", Adverb), ("scarcely", Adverb), ("rarely", Adverb),
    ("seldom", Adverb),
    ("no", Determiner), ("none", Determiner), ("neither", Determiner),
    ("without", Preposition), ("lacking", Preposition), ("absent", Preposition),
    ("lack", Verb), ("lacks", Verb), ("lacked", Verb), ("fail", Verb), ("fails", Verb),
    ("failed", Verb), ("refuse", Verb), ("refuses", Verb), ("refused", Verb),
    ("deny", Verb), ("denies", Verb), ("denied", Verb), ("prevent", Verb),
    ("prevents", Verb), ("prevented", Verb),
];

/// Words that carry a scope across a comma.
const SCOPE_EXTENDERS: &[&str] = &["any", "ever", "anyone", "anything", "anymore", "either"];

const SCOPE_ENDERS: &[&str] = &[
    "but", "however", "although", "though", "yet", "whereas", "while", "except",
];

const NEGATIVE_PREFIXES: &[&str] = &["non-", "non", "dis", "un", "in", "im", "ir", "il"];

/// Roots that make a prefixed word a real negation ("un" + "happy").
const PREFIX_ROOTS: &[&str] = &[
    "able", "acceptable", "accurate", "adequate", "affordable", "agree", "appropriate",
    "available", "aware", "believable", "capable", "certain", "clear", "comfortable",
    "complete", "connected", "consistent", "convenient", "correct", "effective",
    "efficient", "expected", "fair", "friendly", "functional", "happy", "healthy",
    "helpful", "honest", "intuitive", "known", "legal", "likely", "logical", "like",
    "mature", "necessary", "patient", "pleasant", "pleased", "polite", "possible",
    "practical", "predictable", "professional", "proper", "rational", "regular",
    "relevant", "reliable", "responsive", "safe", "satisfied", "satisfactory",
    "secure", "stable", "sufficient", "sure", "trust", "trustworthy", "usable",
    "usual", "willing", "working",
];

static MATCHER: Lazy<PhraseMatcher<NegationCategory>> = Lazy::new(|| {
    let curly: Vec<(String, NegationCategory)> = CUES
        .iter()
        .filter(|(cue, _)| cue.contains('\''))
        .map(|&(cue, cat)| (cue.replace('\'', "’"), cat))
        .collect();
    let mut entries: Vec<(&str, NegationCategory)> = CUES.to_vec();
    entries.extend(curly.iter().map(|(c, cat)| (c.as_str(), *cat)));
    PhraseMatcher::new(entries)
});

static ROOTS: Lazy<HashSet<&'static str>> = Lazy::new(|| PREFIX_ROOTS.iter().copied().collect());

/// The words a negation cue applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegationScope {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Negation {
    pub cue: Span<NegationCategory>,
    /// None when nothing follows the cue inside its clause
    pub scope: Option<NegationScope>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegationAnalysis {
    pub negations: Vec<Negation>,
    pub negation_count: usize,
    /// Share of tokens inside some negation scope
    pub negated_token_ratio: f64,
}

impl NegationAnalysis {
    /// Whether byte offset `position` lies inside any negation scope.
    pub fn is_negated(&self, position: usize) -> bool {
        self.negations.iter().any(|n| {
            n.scope
                .as_ref()
                .is_some_and(|s| s.start <= position && position < s.end)
        })
    }
}

/// Detect negation cues in `text` and resolve their scopes.
pub fn detect_negations(text: &str) -> NegationAnalysis {
    let tokens = tokenize(text);
    let mut negations = Vec::new();
    let mut claimed_tokens: HashSet<usize> = HashSet::new();

    for m in MATCHER.find_all(text) {
        let Some(last) = tokens.iter().rposition(|t| t.start < m.end && t.end > m.start) else {
            continue;
        };
        for (i, t) in tokens.iter().enumerate() {
            if t.start < m.end && t.end > m.start {
                claimed_tokens.insert(i);
            }
        }
        let scope = forward_scope(text, &tokens, last);
        negations.push(Negation {
            cue: Span::new(text, m.payload, m.start, m.end, m.payload.confidence()),
            scope,
        });
    }

    for (i, tok) in tokens.iter().enumerate() {
        if claimed_tokens.contains(&i) {
            continue;
        }
        let Some(prefix_len) = negative_prefix(&tok.normalized) else {
            continue;
        };
        let cue_end = (tok.start + prefix_len).min(tok.end);
        if !text.is_char_boundary(cue_end) {
            continue;
        }
        negations.push(Negation {
            cue: Span::new(text, Prefix, tok.start, cue_end, Prefix.confidence()),
            scope: Some(NegationScope {
                text: tok.text.clone(),
                start: tok.start,
                end: tok.end,
                token_count: 1,
            }),
        });
    }
    negations.sort_by_key(|n| n.cue.start);

    let mut negated: HashSet<usize> = HashSet::new();
    for n in &negations {
        if let Some(s) = &n.scope {
            for (i, t) in tokens.iter().enumerate() {
                if t.start >= s.start && t.end <= s.end {
                    negated.insert(i);
                }
            }
        }
    }
    let negated_token_ratio = if tokens.is_empty() {
        0.0
    } else {
        negated.len() as f64 / tokens.len() as f64
    };

    debug!(negations = negations.len(), "Detected negations");
    NegationAnalysis {
        negation_count: negations.len(),
        negations,
        negated_token_ratio,
    }
}

/// Byte length of a negative prefix when the remainder is a known root.
fn negative_prefix(word: &str) -> Option<usize> {
    NEGATIVE_PREFIXES.iter().find_map(|prefix| {
        let root = word.strip_prefix(prefix)?;
        let root = root.strip_prefix('-').unwrap_or(root);
        let known = ROOTS.contains(root)
            || root.strip_suffix('s').is_some_and(|r| ROOTS.contains(r))
            || root.strip_suffix("ly").is_some_and(|r| ROOTS.contains(r));
        known.then_some(prefix.len())
    })
}

fn forward_scope(text: &str, tokens: &[Token], cue: usize) -> Option<NegationScope> {
    let mut last = None;
    let mut j = cue + 1;
    while j < tokens.len() && j - cue <= MAX_SCOPE_TOKENS {
        let prev = &tokens[j - 1];
        let tok = &tokens[j];
        if tok.sentence_index != prev.sentence_index {
            break;
        }
        if SCOPE_ENDERS.contains(&tok.normalized.as_str()) {
            break;
        }
        if gap_has_clause_break(text, prev.end, tok.start) {
            let gap = &text[prev.end..tok.start];
            let comma_only = gap.chars().all(|c| c == ',' || c.is_whitespace());
            if !(comma_only && SCOPE_EXTENDERS.contains(&tok.normalized.as_str())) {
                break;
            }
        }
        last = Some(j);
        j += 1;
    }
    let last = last?;
    let first = &tokens[cue + 1];
    let end = tokens[last].end;
    Some(NegationScope {
        text: text[first.start..end].to_string(),
        start: first.start,
        end,
        token_count: last - cue,
    })
}
