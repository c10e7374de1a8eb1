// Flesch readability.

use serde::{Deserialize, Serialize};

use crate::text::{count_syllables, tokenize, tokenize_sentences};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingLevel {
    VeryEasy,
    Easy,
    FairlyEasy,
    Standard,
    FairlyDifficult,
    Difficult,
    VeryDifficult,
}

impl ReadingLevel {
    /// Band of a Flesch reading-ease score.
    pub fn from_reading_ease(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ReadingLevel::VeryEasy,
            s if s >= 80.0 => ReadingLevel::Easy,
            s if s >= 70.0 => ReadingLevel::FairlyEasy,
            s if s >= 60.0 => ReadingLevel::Standard,
            s if s >= 50.0 => ReadingLevel::FairlyDifficult,
            s if s >= 30.0 => ReadingLevel::Difficult,
            _ => ReadingLevel::VeryDifficult,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub level: ReadingLevel,
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
}

/// Flesch reading ease and Flesch-Kincaid grade. `None` when the text has
/// no words.
pub fn readability(text: &str) -> Option<Readability> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return None;
    }
    let words = tokens.len();
    let sentences = tokenize_sentences(text).len().max(1);
    let syllables: usize = tokens.iter().map(|t| count_syllables(&t.normalized)).sum();

    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;
    let ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;

    Some(Readability {
        flesch_reading_ease: ease,
        flesch_kincaid_grade: grade,
        level: ReadingLevel::from_reading_ease(ease),
        words,
        sentences,
        syllables,
    })
}
