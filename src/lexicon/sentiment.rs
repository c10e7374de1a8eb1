// Lexicon sentiment scoring.
//
// Each token is looked up in a polarity lexicon (weights on a -5..5 scale,
// normalized by 5). A negator up to three tokens earlier in the same clause
// flips and damps the weight; intensifiers and diminishers directly before a
// term scale it. The document score is the mean contribution of the matched
// terms, labelled positive/negative beyond +/-0.15.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::{gap_has_clause_break, tokenize_with, Language, Token};

/// Label thresholds on the mean contribution.
pub const LABEL_THRESHOLD: f64 = 0.15;

/// How far back (in tokens) a negator can reach.
const NEGATION_WINDOW: usize = 3;

/// Flipped weights are damped: "not bad" is milder than "good".
const NEGATION_DAMPING: f64 = 0.8;

const ENGLISH_LEXICON: &[(&str, i8)] = &[
    // positive
    ("excellent", 4), ("amazing", 4), ("outstanding", 4), ("exceptional", 4),
    ("superb", 4), ("fantastic", 4), ("wonderful", 4), ("brilliant", 4),
    ("perfect", 4), ("incredible", 4), ("phenomenal", 4), ("flawless", 4),
    ("love", 3), ("loved", 3), ("loves", 3), ("great", 3), ("awesome", 3),
    ("impressive", 3), ("delightful", 3), ("innovative", 3), ("intuitive", 3),
    ("good", 3), ("best", 3), ("favorite", 3), ("beautiful", 3), ("happy", 3),
    ("pleased", 3), ("satisfied", 3), ("enjoy", 2), ("enjoyed", 2), ("like", 1),
    ("liked", 2), ("nice", 2), ("solid", 2), ("reliable", 2), ("trusted", 2),
    ("trustworthy", 3), ("recommended", 2), ("recommend", 2), ("helpful", 2),
    ("useful", 2), ("easy", 2), ("effortless", 3), ("smooth", 2), ("fast", 2),
    ("quick", 2), ("responsive", 2), ("efficient", 2), ("effective", 2),
    ("affordable", 2), ("valuable", 2), ("worth", 1), ("fair", 1), ("clean", 1),
    ("secure", 2), ("stable", 2), ("powerful", 2), ("robust", 2), ("elegant", 3),
    ("friendly", 2), ("convenient", 2), ("popular", 1), ("leading", 2),
    ("premium", 1), ("quality", 0), ("improved", 2), ("improve", 1),
    ("better", 2), ("superior", 3), ("seamless", 3), ("polished", 2),
    ("generous", 2), ("accurate", 2), ("consistent", 1), ("fun", 2),
    ("glad", 2), ("thrilled", 4), ("excited", 3), ("exciting", 3), ("pretty", 1),
    ("win", 2), ("wins", 2), ("success", 2), ("successful", 2), ("benefit", 2),
    ("benefits", 2), ("advantage", 2), ("strong", 2), ("top", 1), ("praise", 3),
    ("praised", 3), ("thanks", 2), ("thank", 2), ("appreciate", 2), ("works", 1),
    // negative
    ("terrible", -4), ("awful", -4), ("horrible", -4), ("worst", -4),
    ("disgusting", -4), ("atrocious", -4), ("abysmal", -4), ("dreadful", -4),
    ("hate", -4), ("hated", -4), ("hates", -4), ("useless", -3), ("broken", -3),
    ("bad", -3), ("poor", -3), ("disappointing", -3), ("disappointed", -3),
    ("frustrating", -3), ("frustrated", -3), ("annoying", -2), ("annoyed", -2),
    ("overpriced", -3), ("expensive", -2), ("costly", -2), ("slow", -2),
    ("sluggish", -2), ("buggy", -3), ("bug", -1), ("bugs", -2), ("crash", -3),
    ("crashes", -3), ("crashed", -3), ("unreliable", -3), ("unstable", -3),
    ("confusing", -2), ("complicated", -2), ("clunky", -2), ("difficult", -2),
    ("hard", -1), ("worse", -2), ("inferior", -3), ("mediocre", -2),
    ("lacking", -2), ("problem", -2), ("problems", -2), ("issue", -1),
    ("issues", -2), ("fail", -3), ("fails", -3), ("failed", -3), ("failure", -3),
    ("scam", -4), ("fraud", -4), ("misleading", -3), ("outdated", -2),
    ("ugly", -3), ("rude", -3), ("unhelpful", -3), ("waste", -3),
    ("wasted", -3), ("regret", -3), ("complaint", -2), ("complaints", -2),
    ("sad", -2), ("angry", -3), ("upset", -2), ("worried", -2), ("risky", -2),
    ("risk", -1), ("insecure", -2), ("inconsistent", -2), ("inaccurate", -2),
    ("weak", -2), ("cheap", -1), ("flimsy", -2), ("laggy", -2), ("glitchy", -2),
    ("lose", -2), ("loses", -2), ("lost", -2), ("decline", -2), ("declining", -2),
    ("criticized", -2), ("criticism", -2), ("controversial", -2), ("scandal", -3),
    ("lawsuit", -2), ("breach", -3), ("outage", -3), ("downtime", -2),
];

const SPANISH_LEXICON: &[(&str, i8)] = &[
    ("excelente", 4), ("increíble", 4), ("perfecto", 4), ("perfecta", 4),
    ("maravilloso", 4), ("fantástico", 4), ("bueno", 3), ("buena", 3),
    ("genial", 3), ("encanta", 3), ("mejor", 2), ("fácil", 2), ("rápido", 2),
    ("útil", 2), ("confiable", 2), ("recomiendo", 2), ("barato", 1),
    ("feliz", 3), ("satisfecho", 3), ("bien", 2),
    ("terrible", -4), ("horrible", -4), ("pésimo", -4), ("malo", -3),
    ("mala", -3), ("peor", -3), ("lento", -2), ("caro", -2), ("difícil", -2),
    ("roto", -3), ("problema", -2), ("problemas", -2), ("decepcionante", -3),
    ("odio", -4), ("inútil", -3), ("fallo", -3), ("error", -2),
];

const PORTUGUESE_LEXICON: &[(&str, i8)] = &[
    ("excelente", 4), ("incrível", 4), ("perfeito", 4), ("perfeita", 4),
    ("maravilhoso", 4), ("fantástico", 4), ("bom", 3), ("boa", 3),
    ("ótimo", 3), ("ótima", 3), ("adoro", 3), ("melhor", 2), ("fácil", 2),
    ("rápido", 2), ("útil", 2), ("confiável", 2), ("recomendo", 2),
    ("barato", 1), ("feliz", 3), ("satisfeito", 3),
    ("terrível", -4), ("horrível", -4), ("péssimo", -4), ("ruim", -3),
    ("pior", -3), ("lento", -2), ("caro", -2), ("difícil", -2),
    ("quebrado", -3), ("problema", -2), ("problemas", -2),
    ("decepcionante", -3), ("odeio", -4), ("inútil", -3), ("falha", -3),
    ("erro", -2),
];

const ENGLISH_INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5), ("really", 1.4), ("extremely", 1.8), ("incredibly", 1.8),
    ("super", 1.5), ("so", 1.3), ("highly", 1.5), ("truly", 1.4),
    ("absolutely", 1.7), ("totally", 1.5), ("completely", 1.5), ("quite", 1.2),
    ("particularly", 1.3), ("especially", 1.3), ("exceptionally", 1.8),
    ("remarkably", 1.6), ("deeply", 1.5), ("most", 1.4), ("more", 1.2),
    ("pretty", 1.2), ("too", 1.2), ("utterly", 1.8), ("seriously", 1.4),
    // diminishers
    ("somewhat", 0.7), ("slightly", 0.5), ("fairly", 0.8), ("rather", 0.9),
    ("little", 0.6), ("mildly", 0.6), ("marginally", 0.5), ("kinda", 0.7),
    ("relatively", 0.8),
];

const SPANISH_INTENSIFIERS: &[(&str, f64)] = &[
    ("muy", 1.5), ("bastante", 1.2), ("súper", 1.5), ("super", 1.5),
    ("demasiado", 1.3), ("realmente", 1.4), ("totalmente", 1.5),
    ("poco", 0.6), ("algo", 0.7),
];

const PORTUGUESE_INTENSIFIERS: &[(&str, f64)] = &[
    ("muito", 1.5), ("bastante", 1.2), ("super", 1.5), ("realmente", 1.4),
    ("bem", 1.3), ("totalmente", 1.5), ("pouco", 0.6),
];

const ENGLISH_NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor",
    "without", "cannot", "can't", "don't", "doesn't", "didn't", "isn't",
    "aren't", "wasn't", "weren't", "won't", "wouldn't", "shouldn't",
    "couldn't", "hasn't", "haven't", "hadn't", "ain't", "hardly", "barely",
    "scarcely", "rarely", "seldom",
];

const SPANISH_NEGATORS: &[&str] = &[
    "no", "nunca", "jamás", "ni", "sin", "nada", "nadie", "tampoco", "ningún",
    "ninguna", "ninguno",
];

const PORTUGUESE_NEGATORS: &[&str] = &[
    "não", "nunca", "jamais", "nem", "sem", "nada", "ninguém", "nenhum",
    "nenhuma",
];

/// Conjunctions that end a negation window ("not great but fine").
const CONTRASTIVE: &[&str] = &[
    "but", "however", "although", "though", "yet", "whereas", "pero", "aunque",
    "mas", "porém", "embora",
];

struct LanguageTables {
    lexicon: HashMap<&'static str, i8>,
    intensifiers: HashMap<&'static str, f64>,
    negators: &'static [&'static str],
}

fn build(
    lexicon: &'static [(&'static str, i8)],
    intensifiers: &'static [(&'static str, f64)],
    negators: &'static [&'static str],
) -> LanguageTables {
    LanguageTables {
        lexicon: lexicon.iter().copied().filter(|(_, w)| *w != 0).collect(),
        intensifiers: intensifiers.iter().copied().collect(),
        negators,
    }
}

static ENGLISH: Lazy<LanguageTables> =
    Lazy::new(|| build(ENGLISH_LEXICON, ENGLISH_INTENSIFIERS, ENGLISH_NEGATORS));
static SPANISH: Lazy<LanguageTables> =
    Lazy::new(|| build(SPANISH_LEXICON, SPANISH_INTENSIFIERS, SPANISH_NEGATORS));
static PORTUGUESE: Lazy<LanguageTables> =
    Lazy::new(|| build(PORTUGUESE_LEXICON, PORTUGUESE_INTENSIFIERS, PORTUGUESE_NEGATORS));

fn tables(language: Language) -> &'static LanguageTables {
    match language {
        Language::English => &ENGLISH,
        Language::Spanish => &SPANISH,
        Language::Portuguese => &PORTUGUESE,
    }
}

/// Base polarity weight of an English word on the -5..5 scale.
pub fn word_weight(word: &str) -> Option<i8> {
    ENGLISH.lexicon.get(word).copied()
}

/// Whether an English word is a sentiment-bearing lexicon term.
pub fn is_opinion_word(word: &str) -> bool {
    ENGLISH.lexicon.contains_key(word)
}

/// Whether an English word is an intensifier or diminisher.
pub fn is_intensifier(word: &str) -> bool {
    ENGLISH.intensifiers.contains_key(word)
}

/// Whether a word negates in any supported language.
pub fn is_negator(word: &str) -> bool {
    Language::ALL.iter().any(|&l| tables(l).negators.contains(&word))
}

fn is_contrastive(word: &str) -> bool {
    CONTRASTIVE.contains(&word)
}

/// Document-level sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// One matched lexicon term and how its weight was modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentEvidence {
    pub term: String,
    /// Lexicon weight on the -5..5 scale
    pub base_weight: i8,
    /// Final contribution in [-1,1]
    pub contribution: f64,
    pub negated: bool,
    /// Product of intensifier multipliers (1.0 when none)
    pub multiplier: f64,
    pub sentence_index: usize,
    pub start: usize,
    pub end: usize,
}

/// Result of lexicon sentiment scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Mean contribution of matched terms, in [-1,1]
    pub score: f64,
    pub label: SentimentLabel,
    /// Sum of positive contributions
    pub positive: f64,
    /// Sum of negative contribution magnitudes
    pub negative: f64,
    pub matched_terms: usize,
    pub word_count: usize,
    pub evidence: Vec<SentimentEvidence>,
}

impl SentimentResult {
    /// The neutral result for text with no sentiment-bearing terms.
    pub fn neutral(word_count: usize) -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            positive: 0.0,
            negative: 0.0,
            matched_terms: 0,
            word_count,
            evidence: Vec::new(),
        }
    }

    /// Aggregate evidence gathered separately, e.g. per language segment.
    pub fn from_evidence(evidence: Vec<SentimentEvidence>, word_count: usize) -> Self {
        aggregate(evidence, word_count)
    }
}

/// Polarity of a single opinion expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpinionPolarity {
    Positive,
    Negative,
}

/// A sentiment-bearing expression near an aspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionExpression {
    pub term: String,
    pub polarity: OpinionPolarity,
    /// Magnitude of the contribution, in [0,1]
    pub intensity: f64,
    /// Byte offset of the term
    pub position: usize,
    pub negated: bool,
}

impl OpinionExpression {
    /// Signed value in [-1,1].
    pub fn signed(&self) -> f64 {
        match self.polarity {
            OpinionPolarity::Positive => self.intensity,
            OpinionPolarity::Negative => -self.intensity,
        }
    }
}

/// Score English text.
pub fn analyze_sentiment(text: &str) -> SentimentResult {
    analyze_sentiment_with(text, Language::English)
}

/// Score text with the lexicon, intensifiers and negators of `language`.
pub fn analyze_sentiment_with(text: &str, language: Language) -> SentimentResult {
    let tokens = tokenize_with::<&str>(text, language, &[]);
    let evidence = score_tokens(text, &tokens, language);
    let result = aggregate(evidence, tokens.len());
    debug!(
        matched = result.matched_terms,
        score = result.score,
        "Scored sentiment"
    );
    result
}

/// Opinion expressions among `tokens` (a sentence or clause of `text`).
pub fn opinion_expressions(text: &str, tokens: &[Token]) -> Vec<OpinionExpression> {
    score_tokens(text, tokens, Language::English)
        .into_iter()
        .filter(|e| e.contribution != 0.0)
        .map(|e| OpinionExpression {
            polarity: if e.contribution > 0.0 {
                OpinionPolarity::Positive
            } else {
                OpinionPolarity::Negative
            },
            intensity: e.contribution.abs().min(1.0),
            position: e.start,
            negated: e.negated,
            term: e.term,
        })
        .collect()
}

fn aggregate(evidence: Vec<SentimentEvidence>, word_count: usize) -> SentimentResult {
    if evidence.is_empty() {
        return SentimentResult::neutral(word_count);
    }
    let positive: f64 = evidence
        .iter()
        .filter(|e| e.contribution > 0.0)
        .map(|e| e.contribution)
        .sum();
    let negative: f64 = evidence
        .iter()
        .filter(|e| e.contribution < 0.0)
        .map(|e| -e.contribution)
        .sum();
    let score = ((positive - negative) / evidence.len() as f64).clamp(-1.0, 1.0);
    SentimentResult {
        score,
        label: SentimentLabel::from_score(score),
        positive,
        negative,
        matched_terms: evidence.len(),
        word_count,
        evidence,
    }
}

/// Whether tokens[i] and tokens[j] (i < j) sit in the same clause.
fn same_clause(text: &str, tokens: &[Token], i: usize, j: usize) -> bool {
    if tokens[i].sentence_index != tokens[j].sentence_index {
        return false;
    }
    (i..j).all(|k| {
        !gap_has_clause_break(text, tokens[k].end, tokens[k + 1].start)
            && (k == i || !is_contrastive(&tokens[k].normalized))
    })
}

fn score_tokens(text: &str, tokens: &[Token], language: Language) -> Vec<SentimentEvidence> {
    let t = tables(language);
    let mut evidence = Vec::new();

    for (i, tok) in tokens.iter().enumerate() {
        let word = tok.normalized.as_str();
        let Some(&base) = t.lexicon.get(word) else {
            continue;
        };
        // "pretty good": the intensifier reading wins over the lexicon one
        if t.intensifiers.contains_key(word)
            && tokens
                .get(i + 1)
                .is_some_and(|next| t.lexicon.contains_key(next.normalized.as_str()))
        {
            continue;
        }

        let mut multiplier = 1.0;
        for k in 1..=2 {
            if i < k || !same_clause(text, tokens, i - k, i) {
                break;
            }
            if let Some(m) = t.intensifiers.get(tokens[i - k].normalized.as_str()) {
                multiplier *= m;
            }
        }

        let negated = (1..=NEGATION_WINDOW).any(|k| {
            i >= k
                && t.negators.contains(&tokens[i - k].normalized.as_str())
                && same_clause(text, tokens, i - k, i)
        });

        let mut contribution = f64::from(base) / 5.0 * multiplier;
        if negated {
            contribution = -contribution * NEGATION_DAMPING;
        }

        evidence.push(SentimentEvidence {
            term: tok.text.clone(),
            base_weight: base,
            contribution: contribution.clamp(-1.0, 1.0),
            negated,
            multiplier,
            sentence_index: tok.sentence_index,
            start: tok.start,
            end: tok.end,
        });
    }

    evidence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_is_labelled_positive() {
        let r = analyze_sentiment("This is excellent and amazing!");
        assert_eq!(r.label, SentimentLabel::Positive);
        assert!(r.positive > 0.0);
        assert_eq!(r.matched_terms, 2);
    }

    #[test]
    fn negation_flips_polarity() {
        let pos = analyze_sentiment("The app is good");
        let neg = analyze_sentiment("The app is not good");
        assert!(pos.score > neg.score);
        assert!(neg.evidence[0].negated);
    }

    #[test]
    fn negation_does_not_cross_clause_punctuation() {
        let r = analyze_sentiment("Not cheap, but great");
        let great = r.evidence.iter().find(|e| e.term == "great").unwrap();
        assert!(!great.negated);
    }

    #[test]
    fn intensifier_scales_weight() {
        let plain = analyze_sentiment("good");
        let boosted = analyze_sentiment("very good");
        assert!(boosted.score > plain.score);
        assert_eq!(boosted.matched_terms, 1);
    }

    #[test]
    fn pretty_as_intensifier_is_not_double_counted() {
        let r = analyze_sentiment("pretty good");
        assert_eq!(r.matched_terms, 1);
        assert!((r.evidence[0].multiplier - 1.2).abs() < 1e-9);
    }

    #[test]
    fn empty_and_neutral_text() {
        let r = analyze_sentiment("");
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.score, 0.0);
        assert_eq!(analyze_sentiment("The cat sat.").matched_terms, 0);
    }

    #[test]
    fn spanish_lexicon_and_negator() {
        let r = analyze_sentiment_with("El servicio no es bueno", Language::Spanish);
        assert_eq!(r.label, SentimentLabel::Negative);
    }

    #[test]
    fn opinions_carry_positions() {
        let text = "The screen is terrible";
        let tokens = crate::text::tokenize(text);
        let ops = opinion_expressions(text, &tokens);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].polarity, OpinionPolarity::Negative);
        assert_eq!(&text[ops[0].position..ops[0].position + 8], "terrible");
    }
}
