// Word, sentence and paragraph segmentation.
//
// Segmentation is deliberately simple: paragraphs split on blank lines,
// sentences split on `.`, `!` or `?` followed by whitespace (no abbreviation
// handling, so "Dr. Smith" splits after "Dr."), words split on whitespace and
// on punctuation other than apostrophes, hyphens and periods.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::stopwords::{is_stopword, Language};

/// A single word of the source text.
///
/// `start`/`end` are byte offsets of the surface form in the original text,
/// always on char boundaries, with `end > start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form exactly as it appears in the text
    pub text: String,
    /// Lowercased form with curly apostrophes folded and inner punctuation removed
    pub normalized: String,
    pub is_stopword: bool,
    /// Index into `sentence_spans(text)`
    pub sentence_index: usize,
    pub start: usize,
    pub end: usize,
}

static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t\r]*\n").expect("valid blank-line regex"));

/// Byte ranges of the paragraphs in `text`, trimmed, blank paragraphs dropped.
pub fn paragraph_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for m in BLANK_LINE.find_iter(text) {
        push_trimmed(text, start, m.start(), &mut spans);
        start = m.end();
    }
    push_trimmed(text, start, text.len(), &mut spans);
    spans
}

/// Paragraph strings of `text`.
pub fn tokenize_paragraphs(text: &str) -> Vec<String> {
    paragraph_spans(text)
        .into_iter()
        .map(|(s, e)| text[s..e].to_string())
        .collect()
}

/// Byte ranges of the sentences in `text`.
///
/// A sentence ends at `.`, `!` or `?` when the next character is whitespace
/// or the end of the text, and always at a paragraph break.
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    for (p_start, p_end) in paragraph_spans(text) {
        let paragraph = &text[p_start..p_end];
        let mut start = 0;
        let mut chars = paragraph.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let at_boundary = match chars.peek() {
                None => true,
                Some(&(_, next)) => next.is_whitespace(),
            };
            if at_boundary {
                let end = i + c.len_utf8();
                push_trimmed(text, p_start + start, p_start + end, &mut spans);
                start = end;
            }
        }
        push_trimmed(text, p_start + start, p_end, &mut spans);
    }
    spans
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    if start >= end {
        return;
    }
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    let s = start + lead;
    spans.push((s, s + trimmed.len()));
}

/// Sentence strings of `text`, trimmed.
pub fn tokenize_sentences(text: &str) -> Vec<String> {
    sentence_spans(text)
        .into_iter()
        .map(|(s, e)| text[s..e].to_string())
        .collect()
}

/// Tokenize English text.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with::<&str>(text, Language::English, &[])
}

/// Tokenize text, flagging stopwords of `language` plus `custom_stopwords`.
pub fn tokenize_with<S: AsRef<str>>(
    text: &str,
    language: Language,
    custom_stopwords: &[S],
) -> Vec<Token> {
    let custom: Vec<String> = custom_stopwords
        .iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    let mut tokens = Vec::new();
    for (sentence_index, (s_start, s_end)) in sentence_spans(text).into_iter().enumerate() {
        for (w_start, w_end) in word_spans(&text[s_start..s_end]) {
            let start = s_start + w_start;
            let end = s_start + w_end;
            let surface = &text[start..end];
            let normalized = normalize_word(surface);
            if normalized.is_empty() {
                continue;
            }
            let is_stopword =
                is_stopword(&normalized, language) || custom.iter().any(|w| *w == normalized);
            tokens.push(Token {
                text: surface.to_string(),
                normalized,
                is_stopword,
                sentence_index,
                start,
                end,
            });
        }
    }
    tokens
}

/// Whether the text between two tokens holds clause punctuation
/// (`,` `;` `:` parentheses or dashes) that ends a negation or modifier
/// window.
pub fn gap_has_clause_break(text: &str, from: usize, to: usize) -> bool {
    if from >= to || to > text.len() {
        return false;
    }
    text.get(from..to).is_some_and(|gap| {
        gap.chars()
            .any(|c| matches!(c, ',' | ';' | ':' | '(' | ')' | '—' | '–' | '.' | '!' | '?'))
    })
}

/// Lowercased normalized words of `text`, in order.
pub fn words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.normalized).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '\'' | '’' | '-' | '.')
}

/// Byte ranges of words inside `s`: runs of word characters with leading and
/// trailing non-alphanumerics trimmed.
fn word_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        if is_word_char(c) {
            run_start.get_or_insert(i);
        } else if let Some(start) = run_start.take() {
            push_core(s, start, i, &mut spans);
        }
    }
    if let Some(start) = run_start {
        push_core(s, start, s.len(), &mut spans);
    }
    spans
}

fn push_core(s: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let run = &s[start..end];
    let core = run.trim_matches(|c: char| !c.is_alphanumeric());
    if core.is_empty() {
        return;
    }
    let lead = run.len() - run.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
    spans.push((start + lead, start + lead + core.len()));
}

/// Lowercase, fold curly apostrophes, drop everything but alphanumerics,
/// apostrophes and hyphens.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .map(|c| if c == '’' { '\'' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '\'' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
