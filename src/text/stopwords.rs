// Stopword tables for English, Spanish and Portuguese.
//
// Base lists come from the stop-words crate, unioned with a core list of
// function words that the keyphrase and topic extractors rely on. Tables are
// built once on first use and shared read-only afterwards.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

/// Languages with stopword tables and lexicon support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Spanish,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Spanish, Language::Portuguese];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
        }
    }

    /// Parse an ISO 639-1 code or English language name (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "es" | "spanish" => Some(Language::Spanish),
            "pt" | "portuguese" => Some(Language::Portuguese),
            _ => None,
        }
    }
}

const ENGLISH_CORE: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "so", "of", "to", "in", "on", "at",
    "by", "for", "with", "from", "as", "into", "about", "than", "is", "are", "was", "were",
    "be", "been", "being", "am", "do", "does", "did", "has", "have", "had", "it", "its",
    "this", "that", "these", "those", "i", "me", "my", "we", "us", "our", "you", "your",
    "he", "him", "his", "she", "her", "they", "them", "their", "what", "which", "who",
    "whom", "whose", "there", "here", "when", "where", "why", "how", "all", "any", "some",
    "can", "will", "would", "should", "could", "just", "also", "very", "too", "not", "no",
];

const SPANISH_CORE: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "y", "o", "pero", "de", "del",
    "al", "a", "en", "con", "por", "para", "que", "es", "son", "fue", "ser", "está",
    "están", "muy", "más", "se", "su", "sus", "lo", "le", "les", "como", "este", "esta",
    "esto", "ese", "esa", "yo", "tú", "él", "ella", "nosotros", "ellos", "mi", "me", "no",
];

const PORTUGUESE_CORE: &[&str] = &[
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "e", "ou", "mas", "de", "do", "da",
    "dos", "das", "em", "no", "na", "nos", "nas", "com", "por", "para", "que", "é", "são",
    "foi", "ser", "está", "estão", "muito", "mais", "se", "seu", "sua", "como", "este",
    "esta", "isto", "esse", "essa", "eu", "você", "ele", "ela", "nós", "eles", "meu", "não",
];

fn build_table(language: LANGUAGE, core: &[&str]) -> HashSet<String> {
    let base: Vec<String> = get(language);
    base.into_iter()
        .map(|w| w.to_lowercase())
        .chain(core.iter().map(|w| w.to_string()))
        .collect()
}

static ENGLISH: Lazy<HashSet<String>> = Lazy::new(|| build_table(LANGUAGE::English, ENGLISH_CORE));
static SPANISH: Lazy<HashSet<String>> = Lazy::new(|| build_table(LANGUAGE::Spanish, SPANISH_CORE));
static PORTUGUESE: Lazy<HashSet<String>> =
    Lazy::new(|| build_table(LANGUAGE::Portuguese, PORTUGUESE_CORE));

/// The static stopword table for a language.
pub fn table(language: Language) -> &'static HashSet<String> {
    match language {
        Language::English => &ENGLISH,
        Language::Spanish => &SPANISH,
        Language::Portuguese => &PORTUGUESE,
    }
}

/// Whether `word` (already lowercased) is a stopword in `language`.
pub fn is_stopword(word: &str, language: Language) -> bool {
    table(language).contains(word)
}

/// Language defaults unioned with caller-supplied extra terms.
///
/// Extra terms are lowercased and trimmed; blanks are ignored.
pub fn get_stopwords<S: AsRef<str>>(language: Language, custom_words: &[S]) -> HashSet<String> {
    let mut words = table(language).clone();
    for w in custom_words {
        let w = w.as_ref().trim().to_lowercase();
        if !w.is_empty() {
            words.insert(w);
        }
    }
    words
}
