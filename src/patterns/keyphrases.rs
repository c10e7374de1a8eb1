// RAKE keyphrase extraction with source offsets.
//
// Candidate phrases are runs of content words, broken at stopwords,
// numbers, punctuation and sentence ends. Each word scores degree/frequency
// over the candidates; a phrase scores the sum of its words.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::{gap_has_clause_break, tokenize_with, Language, Token};

pub const MAX_PHRASE_WORDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyphrase {
    /// Surface text of the first occurrence
    pub text: String,
    pub normalized: String,
    pub score: f64,
    pub word_count: usize,
    pub occurrences: usize,
    pub start: usize,
    pub end: usize,
}

struct Candidate {
    words: Vec<String>,
    start: usize,
    end: usize,
}

/// Top `limit` English keyphrases.
pub fn extract_keyphrases(text: &str, limit: usize) -> Vec<Keyphrase> {
    extract_keyphrases_with::<&str>(text, Language::English, &[], limit)
}

/// Top `limit` keyphrases using the stopwords of `language` plus `custom`.
pub fn extract_keyphrases_with<S: AsRef<str>>(
    text: &str,
    language: Language,
    custom: &[S],
    limit: usize,
) -> Vec<Keyphrase> {
    let tokens = tokenize_with(text, language, custom);
    let candidates = candidates(text, &tokens);

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    let mut degree: HashMap<&str, usize> = HashMap::new();
    for c in &candidates {
        for w in &c.words {
            *frequency.entry(w.as_str()).or_insert(0) += 1;
            *degree.entry(w.as_str()).or_insert(0) += c.words.len();
        }
    }
    let word_score = |w: &str| -> f64 {
        let f = frequency.get(w).copied().unwrap_or(1).max(1);
        degree.get(w).copied().unwrap_or(0) as f64 / f as f64
    };

    let mut merged: Vec<Keyphrase> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for c in &candidates {
        let normalized = c.words.join(" ");
        if let Some(&i) = index.get(&normalized) {
            merged[i].occurrences += 1;
            continue;
        }
        let score = c.words.iter().map(|w| word_score(w)).sum();
        index.insert(normalized.clone(), merged.len());
        merged.push(Keyphrase {
            text: text[c.start..c.end].to_string(),
            normalized,
            score,
            word_count: c.words.len(),
            occurrences: 1,
            start: c.start,
            end: c.end,
        });
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.start.cmp(&b.start)));
    merged.truncate(limit);
    debug!(
        candidates = candidates.len(),
        keyphrases = merged.len(),
        "Extracted keyphrases"
    );
    merged
}

fn is_breaker(token: &Token) -> bool {
    token.is_stopword
        || token.normalized.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
        || token.normalized.chars().count() < 2
}

fn candidates(text: &str, tokens: &[Token]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut run: Vec<&Token> = Vec::new();

    let mut flush = |run: &mut Vec<&Token>| {
        if !run.is_empty() && run.len() <= MAX_PHRASE_WORDS {
            out.push(Candidate {
                words: run.iter().map(|t| t.normalized.clone()).collect(),
                start: run[0].start,
                end: run[run.len() - 1].end,
            });
        }
        run.clear();
    };

    for tok in tokens {
        if is_breaker(tok) {
            flush(&mut run);
            continue;
        }
        if let Some(prev) = run.last() {
            if prev.sentence_index != tok.sentence_index
                || gap_has_clause_break(text, prev.end, tok.start)
            {
                flush(&mut run);
            }
        }
        run.push(tok);
    }
    flush(&mut run);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_runs_score_higher() {
        let k = extract_keyphrases("Quantum lattice cryptography and nebula spectroscopy.", 10);
        assert_eq!(k[0].normalized, "quantum lattice cryptography");
        assert!((k[0].score - 9.0).abs() < 1e-9, "got {}", k[0].score);
        assert_eq!(k[1].normalized, "nebula spectroscopy");
        assert!(k.iter().all(|p| p.word_count <= MAX_PHRASE_WORDS));
    }

    #[test]
    fn offsets_point_at_first_occurrence() {
        let text = "Telescope mirrors. Telescope mirrors, nebula.";
        let k = extract_keyphrases(text, 5);
        let tm = k.iter().find(|p| p.normalized == "telescope mirrors").unwrap();
        assert_eq!(tm.occurrences, 2);
        assert_eq!(&text[tm.start..tm.end], "Telescope mirrors");
    }

    #[test]
    fn runs_longer_than_four_words_are_dropped() {
        let k = extract_keyphrases("quantum lattice nebula photon telescope", 5);
        assert!(k.is_empty());
    }

    #[test]
    fn punctuation_only_has_no_phrases() {
        assert!(extract_keyphrases("?!... ,,,", 5).is_empty());
    }
}
