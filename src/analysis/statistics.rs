// Surface statistics of a text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text::{count_syllables, tokenize, tokenize_paragraphs, tokenize_sentences};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub unique_words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub syllables: usize,
    pub avg_words_per_sentence: f64,
    pub avg_word_length: f64,
    pub avg_syllables_per_word: f64,
    /// unique / total words
    pub lexical_diversity: f64,
    pub stopword_ratio: f64,
}

pub fn text_statistics(text: &str) -> TextStatistics {
    let tokens = tokenize(text);
    let characters = text.chars().count();
    let characters_no_spaces = text.chars().filter(|c| !c.is_whitespace()).count();
    if tokens.is_empty() {
        return TextStatistics {
            characters,
            characters_no_spaces,
            ..TextStatistics::default()
        };
    }

    let words = tokens.len();
    let unique_words = tokens
        .iter()
        .map(|t| t.normalized.as_str())
        .collect::<HashSet<_>>()
        .len();
    let sentences = tokenize_sentences(text).len();
    let paragraphs = tokenize_paragraphs(text).len();
    let syllables: usize = tokens.iter().map(|t| count_syllables(&t.normalized)).sum();
    let letters: usize = tokens.iter().map(|t| t.normalized.chars().count()).sum();
    let stopwords = tokens.iter().filter(|t| t.is_stopword).count();

    let n = words as f64;
    TextStatistics {
        characters,
        characters_no_spaces,
        words,
        unique_words,
        sentences,
        paragraphs,
        syllables,
        avg_words_per_sentence: if sentences == 0 { 0.0 } else { n / sentences as f64 },
        avg_word_length: letters as f64 / n,
        avg_syllables_per_word: syllables as f64 / n,
        lexical_diversity: unique_words as f64 / n,
        stopword_ratio: stopwords as f64 / n,
    }
}
