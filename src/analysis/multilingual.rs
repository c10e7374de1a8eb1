// Language detection and language-aware analysis for English, Spanish and
// Portuguese.
//
// Detection counts distinctive function words per language plus orthographic
// hints (ñ and inverted punctuation for Spanish, nasal vowels and cedilla for
// Portuguese, contractions for English). Each sentence is detected on its own
// so mixed-language text splits into segments; sentences with no evidence
// inherit the document language.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::sentiment::{analyze_sentiment_with, SentimentResult};
use crate::text::tokenize::words;
use crate::text::{is_stopword, sentence_spans, Language};

/// Keywords reported per analysis.
const KEYWORD_LIMIT: usize = 10;

/// Orthographic hints weigh half a function word.
const HINT_WEIGHT: f64 = 0.5;

const ENGLISH_MARKERS: &[&str] = &[
    "the", "and", "is", "are", "was", "were", "with", "this", "that", "of", "you", "it",
    "not", "have", "has", "for", "be", "but", "they", "what", "very", "which", "would",
    "from", "about", "my", "our", "i",
];

const SPANISH_MARKERS: &[&str] = &[
    "el", "los", "las", "del", "es", "está", "están", "pero", "muy", "y", "una", "con",
    "por", "para", "que", "también", "cuando", "porque", "hay", "lo", "al", "más", "son",
    "yo", "mi", "es", "fue", "sin", "nosotros", "ellos",
];

const PORTUGUESE_MARKERS: &[&str] = &[
    "o", "os", "é", "não", "com", "uma", "um", "do", "da", "dos", "das", "muito",
    "também", "mas", "em", "na", "no", "ao", "são", "você", "isso", "para", "que",
    "mais", "eu", "meu", "foi", "sem", "nós", "eles",
];

fn markers(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => ENGLISH_MARKERS,
        Language::Spanish => SPANISH_MARKERS,
        Language::Portuguese => PORTUGUESE_MARKERS,
    }
}

fn hint(language: Language, word: &str) -> bool {
    match language {
        Language::English => {
            word.ends_with("n't")
                || ["'s", "'re", "'ll", "'ve", "'m"].iter().any(|s| word.ends_with(s))
                || word.starts_with("th")
                || word.contains('w')
        }
        Language::Spanish => {
            word.contains('ñ') || word.ends_with("ción") || word.ends_with("ciones")
        }
        Language::Portuguese => {
            word.contains(['ã', 'õ', 'ç', 'ê', 'ô'])
                || word.ends_with("ção")
                || word.ends_with("ções")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub language: Language,
    /// Winning language's share of all evidence, in [0,1]
    pub confidence: f64,
    pub scores: BTreeMap<Language, f64>,
    /// False when no language evidence was found at all
    pub detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSegment {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub language: Language,
    pub confidence: f64,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultilingualAnalysis {
    pub language: Language,
    pub confidence: f64,
    pub scores: BTreeMap<Language, f64>,
    pub segments: Vec<LanguageSegment>,
    pub is_mixed: bool,
    /// Languages with evidence, in order of first appearance
    pub languages: Vec<Language>,
    pub sentiment: SentimentResult,
    pub keywords: Vec<KeywordCount>,
}

/// Detect the dominant language of `text`. English with zero confidence
/// when nothing matches.
pub fn detect_language(text: &str) -> LanguageDetection {
    let tokens = words(text);
    let spanish_punctuation = text.chars().filter(|c| matches!(c, '¿' | '¡')).count() as f64;

    let mut raw: BTreeMap<Language, f64> = BTreeMap::new();
    for language in Language::ALL {
        let list = markers(language);
        let mut score = 0.0;
        for w in &tokens {
            if list.contains(&w.as_str()) {
                score += 1.0;
            }
            if hint(language, w) {
                score += HINT_WEIGHT;
            }
        }
        if language == Language::Spanish {
            score += spanish_punctuation * HINT_WEIGHT;
        }
        raw.insert(language, score);
    }

    let total: f64 = raw.values().sum();
    let mut best = (Language::English, 0.0);
    for language in Language::ALL {
        let s = raw[&language];
        if s > best.1 {
            best = (language, s);
        }
    }
    let scores = raw
        .iter()
        .map(|(l, s)| (*l, if total > 0.0 { s / total } else { 0.0 }))
        .collect();

    LanguageDetection {
        language: best.0,
        confidence: if total > 0.0 { best.1 / total } else { 0.0 },
        scores,
        detected: total > 0.0,
    }
}

/// Detect languages per sentence and run language-aware sentiment and
/// keyword extraction.
pub fn analyze_multilingual(text: &str) -> MultilingualAnalysis {
    let document = detect_language(text);

    let mut segments = Vec::new();
    let mut languages: Vec<Language> = Vec::new();
    let mut evidence = Vec::new();
    let mut word_count = 0;
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (index, (start, end)) in sentence_spans(text).into_iter().enumerate() {
        let sentence = &text[start..end];
        let detection = detect_language(sentence);
        let language = if detection.detected {
            if !languages.contains(&detection.language) {
                languages.push(detection.language);
            }
            detection.language
        } else {
            document.language
        };

        let sentiment = analyze_sentiment_with(sentence, language);
        word_count += sentiment.word_count;
        evidence.extend(sentiment.evidence.iter().cloned().map(|mut e| {
            e.start += start;
            e.end += start;
            e.sentence_index = index;
            e
        }));

        for w in words(sentence) {
            if w.chars().count() < 3
                || w.chars().all(|c| c.is_ascii_digit())
                || is_stopword(&w, language)
            {
                continue;
            }
            let order = first_seen.len();
            first_seen.entry(w.clone()).or_insert(order);
            *counts.entry(w).or_insert(0) += 1;
        }

        segments.push(LanguageSegment {
            text: sentence.to_string(),
            start,
            end,
            language,
            confidence: detection.confidence,
            sentiment_score: sentiment.score,
        });
    }

    let mut keywords: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    keywords.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| first_seen[&a.word].cmp(&first_seen[&b.word]))
    });
    keywords.truncate(KEYWORD_LIMIT);

    let is_mixed = languages.len() > 1;
    debug!(
        language = document.language.code(),
        segments = segments.len(),
        mixed = is_mixed,
        "Analyzed multilingual text"
    );

    MultilingualAnalysis {
        language: document.language,
        confidence: document.confidence,
        scores: document.scores,
        segments,
        is_mixed,
        languages,
        sentiment: SentimentResult::from_evidence(evidence, word_count),
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_language() {
        assert_eq!(
            detect_language("The service is fast and the staff were friendly.").language,
            Language::English
        );
        assert_eq!(
            detect_language("¿Dónde está el hotel? El servicio es muy bueno pero caro.").language,
            Language::Spanish
        );
        assert_eq!(
            detect_language("Não gostei do atendimento, mas a comida é muito boa.").language,
            Language::Portuguese
        );
    }

    #[test]
    fn no_evidence_defaults_to_english() {
        let d = detect_language("12345 !!!");
        assert_eq!(d.language, Language::English);
        assert_eq!(d.confidence, 0.0);
        assert!(!d.detected);
    }

    #[test]
    fn mixed_text_is_flagged() {
        let r = analyze_multilingual(
            "The food was excellent and the view was great. El servicio es muy malo y el precio es terrible.",
        );
        assert!(r.is_mixed);
        assert_eq!(r.segments.len(), 2);
        assert_eq!(r.segments[0].language, Language::English);
        assert_eq!(r.segments[1].language, Language::Spanish);
        assert!(r.segments[0].sentiment_score > 0.0);
        assert!(r.segments[1].sentiment_score < 0.0);
    }

    #[test]
    fn spanish_sentiment_uses_spanish_lexicon() {
        let r = analyze_multilingual("El hotel es excelente y el personal es genial.");
        assert_eq!(r.language, Language::Spanish);
        assert!(!r.is_mixed);
        assert!(r.sentiment.score > 0.0);
    }

    #[test]
    fn empty_text_is_neutral() {
        let r = analyze_multilingual("");
        assert!(r.segments.is_empty());
        assert!(!r.is_mixed);
        assert_eq!(r.sentiment.matched_terms, 0);
    }
}
