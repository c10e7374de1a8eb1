// Data-driven matchers shared by the lexicon and pattern extractors.
//
// `PhraseMatcher` finds literal phrases on word boundaries, longest phrase
// first, never letting two matches claim the same characters.
// `PatternTable` runs a list of case-insensitive regexes, each tagged with a
// payload describing what a hit means.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

/// Lowercase ASCII letters and turn ASCII whitespace into plain spaces.
/// Byte length is preserved, so offsets into the result are offsets into
/// the input.
pub fn fold_for_matching(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_whitespace() {
                ' '
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

fn is_word_like(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '’'
}

/// Whether `text[start..end]` is delimited by non-word characters.
pub fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().is_none_or(|c| !is_word_like(c));
    let after_ok = text[end..].chars().next().is_none_or(|c| !is_word_like(c));
    before_ok && after_ok
}

/// One phrase hit.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseMatch<P> {
    /// Surface text as it appears in the source
    pub text: String,
    /// The lexicon phrase that matched
    pub phrase: String,
    pub start: usize,
    pub end: usize,
    pub payload: P,
}

/// Literal phrase lexicon with longest-first, non-overlapping matching.
#[derive(Debug, Clone)]
pub struct PhraseMatcher<P> {
    entries: Vec<(String, P)>,
}

impl<P: Clone> PhraseMatcher<P> {
    /// Entries are lowercased and ordered by word count, then byte length,
    /// descending. Registration order breaks remaining ties.
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, P)>,
    {
        let mut entries: Vec<(String, P)> = entries
            .into_iter()
            .map(|(phrase, payload)| (phrase.trim().to_lowercase(), payload))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();
        entries.sort_by(|a, b| {
            let wa = a.0.split(' ').count();
            let wb = b.0.split(' ').count();
            wb.cmp(&wa).then(b.0.len().cmp(&a.0.len()))
        });
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `word` (lowercase) is exactly one of the phrases.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.iter().any(|(p, _)| p == word)
    }

    /// The payload registered for an exact phrase.
    pub fn get(&self, phrase: &str) -> Option<&P> {
        self.entries.iter().find(|(p, _)| p == phrase).map(|(_, payload)| payload)
    }

    /// All non-overlapping matches in `text`, ordered by start offset.
    pub fn find_all(&self, text: &str) -> Vec<PhraseMatch<P>> {
        let folded = fold_for_matching(text);
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut found = Vec::new();

        for (phrase, payload) in &self.entries {
            for (start, _) in folded.match_indices(phrase.as_str()) {
                let end = start + phrase.len();
                if !on_word_boundary(&folded, start, end) {
                    continue;
                }
                if claimed.iter().any(|&(s, e)| start < e && s < end) {
                    continue;
                }
                claimed.push((start, end));
                found.push(PhraseMatch {
                    text: text[start..end].to_string(),
                    phrase: phrase.clone(),
                    start,
                    end,
                    payload: payload.clone(),
                });
            }
        }

        found.sort_by_key(|m| m.start);
        found
    }
}

/// One regex hit.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch<'t, P> {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Index of the pattern in its table (registration order)
    pub index: usize,
    pub payload: &'t P,
}

/// Ordered list of compiled case-insensitive regexes with payloads.
#[derive(Debug)]
pub struct PatternTable<P> {
    entries: Vec<(Regex, P)>,
}

impl<P> PatternTable<P> {
    /// Compile `(pattern, payload)` pairs. Patterns are compiled with `(?i)`.
    ///
    /// Tables are built from string constants; a pattern that fails to
    /// compile is a programming error and panics on first use.
    pub fn new<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, P)>,
    {
        let entries = specs
            .into_iter()
            .map(|(pattern, payload)| {
                let regex = Regex::new(&format!("(?i){pattern}"))
                    .unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"));
                (regex, payload)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Regex, &P)> {
        self.entries.iter().map(|(r, p)| (r, p))
    }

    /// Every match of every pattern, in table order then text order.
    /// Overlaps are left for the caller to resolve.
    pub fn find_all<'t>(&'t self, text: &str) -> Vec<PatternMatch<'t, P>> {
        let mut out = Vec::new();
        for (index, (regex, payload)) in self.entries.iter().enumerate() {
            for m in regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                out.push(PatternMatch {
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                    index,
                    payload,
                });
            }
        }
        out
    }

    /// Capture groups of every match, in table order then text order.
    pub fn captures_all<'t, 'h>(&'t self, text: &'h str) -> Vec<(usize, &'t P, Captures<'h>)> {
        let mut out = Vec::new();
        for (index, (regex, payload)) in self.entries.iter().enumerate() {
            for caps in regex.captures_iter(text) {
                out.push((index, payload, caps));
            }
        }
        out
    }

    /// Payloads of the patterns that match somewhere in `text`.
    pub fn matching(&self, text: &str) -> Vec<(usize, &P)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (regex, _))| regex.is_match(text))
            .map(|(i, (_, payload))| (i, payload))
            .collect()
    }
}

/// Compile a case-sensitive constant pattern. Panics on an invalid constant,
/// like `PatternTable::new`.
pub fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

static CAPITALIZED_RUN: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b[A-Z][A-Za-z0-9&'’\-]*(?:[ \t]+(?:(?:of|de|da|del|do|&)[ \t]+)?[A-Z][A-Za-z0-9&'’\-]*)*")
});

/// Capitalized words that open sentences or clauses without naming anything.
const LEADING_FUNCTION_WORDS: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "Those", "It", "Its", "I", "We",
    "They", "He", "She", "You", "Our", "My", "Their", "His", "Her", "Your", "In",
    "On", "At", "For", "But", "And", "Or", "If", "When", "While", "After",
    "Before", "However", "So", "Also", "Yes", "No", "According", "Although",
    "Because", "Since", "Then", "There", "Here", "What", "Which", "Who", "Why",
    "How", "As", "With", "Without", "Overall", "Both", "Unlike", "Compared",
    "Between", "Some", "Many", "Most", "All", "Each", "Every", "Not", "Is", "Are",
    "Was", "Were", "Do", "Does", "Did", "Can", "Could", "Should", "Would", "Will",
    "Let", "Please", "Maybe", "Perhaps", "Still", "Even", "Just", "Now", "Today",
    "Yesterday", "Tomorrow", "Last", "Next",
];

/// Byte ranges of capitalized phrases ("Acme Corp", "Bank of America").
/// Leading function words are stripped; a phrase made only of them is
/// dropped.
pub fn capitalized_phrases(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for m in CAPITALIZED_RUN.find_iter(text) {
        let mut start = m.start();
        let end = m.end();
        loop {
            let rest = &text[start..end];
            let first_len = rest.find([' ', '\t']).unwrap_or(rest.len());
            let first = rest[..first_len].trim_end_matches(['\'', '’']);
            if !LEADING_FUNCTION_WORDS.contains(&first) {
                break;
            }
            match rest[first_len..].find(|c: char| c.is_ascii_uppercase()) {
                Some(offset) => start += first_len + offset,
                None => {
                    start = end;
                    break;
                }
            }
        }
        if start < end {
            out.push((start, end));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_phrase_claims_first() {
        let m = PhraseMatcher::new(vec![("support", 1), ("customer support", 2)]);
        let hits = m.find_all("Customer support was slow; support docs too.");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].payload, 2);
        assert_eq!(hits[0].text, "Customer support");
        assert_eq!(hits[1].payload, 1);
    }

    #[test]
    fn respects_word_boundaries() {
        let m = PhraseMatcher::new(vec![("can", ()), ("price", ())]);
        assert!(m.find_all("I can't see the prices").is_empty());
        assert_eq!(m.find_all("the price, I can").len(), 2);
    }

    #[test]
    fn folding_preserves_offsets() {
        let text = "Ünïcode\tText";
        let folded = fold_for_matching(text);
        assert_eq!(folded.len(), text.len());
        assert!(folded.ends_with(" text"));
    }

    #[test]
    fn pattern_table_is_case_insensitive() {
        let table = PatternTable::new(vec![(r"\bbetter than\b", "cmp")]);
        let hits = table.find_all("Acme is BETTER THAN Globex");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "BETTER THAN");
        assert_eq!(*hits[0].payload, "cmp");
    }

    #[test]
    fn capitalized_phrases_skip_function_words() {
        let text = "The Acme Suite is better than Globex. However Bank of America agreed.";
        let phrases: Vec<&str> = capitalized_phrases(text)
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect();
        assert_eq!(phrases, vec!["Acme Suite", "Globex", "Bank of America"]);
    }

    #[test]
    fn lone_function_word_is_not_a_phrase() {
        assert!(capitalized_phrases("It works. They agree.").is_empty());
    }
}
