// Quotations and attribution.
//
// Four quote-mark styles are tried. For each quote, up to 100 characters on
// either side are scanned for an attribution verb next to a capitalized name
// or a pronoun ("...," said Jane Doe / Jane Doe said, "..."), then for an
// "according to X" construction. The quote kind (direct, title, scare, block)
// is inferred from length, cue words and sentence count.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::{capitalized_phrases, compile, PatternTable, PhraseMatcher};
use super::span::{resolve_overlaps, Located};
use crate::text::sentence_spans;

const CONTEXT_WINDOW: usize = 100;
const TITLE_CUE_WINDOW: usize = 30;
const BLOCK_MIN_WORDS: usize = 40;
const BLOCK_MIN_SENTENCES: usize = 3;
const SCARE_MAX_WORDS: usize = 3;
const TITLE_MAX_WORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    Straight,
    CurlyDouble,
    CurlySingle,
    Guillemet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteKind {
    Direct,
    Title,
    Scare,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbTense {
    Past,
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    VerbBefore,
    VerbAfter,
    AccordingTo,
}

static QUOTES: Lazy<PatternTable<QuoteStyle>> = Lazy::new(|| {
    PatternTable::new([
        (r#""([^"]+)""#, QuoteStyle::Straight),
        (r"“([^”]+)”", QuoteStyle::CurlyDouble),
        (r"‘((?s:.+?))’(?:\W|$)", QuoteStyle::CurlySingle),
        (r"«\s*([^»]+?)\s*»", QuoteStyle::Guillemet),
    ])
});

/// (present, past, strength)
const VERBS: &[(&str, &str, f64)] = &[
    ("says", "said", 0.7),
    ("states", "stated", 0.8),
    ("claims", "claimed", 0.6),
    ("explains", "explained", 0.8),
    ("notes", "noted", 0.7),
    ("adds", "added", 0.6),
    ("argues", "argued", 0.7),
    ("insists", "insisted", 0.9),
    ("tells", "told", 0.7),
    ("writes", "wrote", 0.8),
    ("reports", "reported", 0.8),
    ("announces", "announced", 0.9),
    ("declares", "declared", 0.9),
    ("admits", "admitted", 0.8),
    ("acknowledges", "acknowledged", 0.8),
    ("warns", "warned", 0.8),
    ("suggests", "suggested", 0.5),
    ("asks", "asked", 0.6),
    ("replies", "replied", 0.7),
    ("comments", "commented", 0.6),
    ("remarks", "remarked", 0.6),
    ("observes", "observed", 0.7),
    ("confirms", "confirmed", 0.9),
    ("denies", "denied", 0.8),
    ("emphasizes", "emphasized", 0.8),
    ("stresses", "stressed", 0.8),
    ("mentions", "mentioned", 0.5),
    ("responds", "responded", 0.7),
    ("recalls", "recalled", 0.7),
    ("concludes", "concluded", 0.8),
    ("tweets", "tweeted", 0.6),
    ("posts", "posted", 0.5),
    ("predicts", "predicted", 0.6),
    ("promises", "promised", 0.7),
    ("shares", "shared", 0.5),
    ("exclaims", "exclaimed", 0.7),
    ("whispers", "whispered", 0.5),
    ("shouts", "shouted", 0.6),
    ("boasts", "boasted", 0.6),
    ("complains", "complained", 0.6),
    ("maintains", "maintained", 0.8),
    ("contends", "contended", 0.7),
    ("asserts", "asserted", 0.8),
    ("affirms", "affirmed", 0.8),
    ("describes", "described", 0.6),
    ("points out", "pointed out", 0.7),
    ("goes on", "went on", 0.5),
    ("agrees", "agreed", 0.7),
    ("recommends", "recommended", 0.7),
    ("concedes", "conceded", 0.7),
];

static VERB_MATCHER: Lazy<PhraseMatcher<(VerbTense, f64)>> = Lazy::new(|| {
    PhraseMatcher::new(VERBS.iter().flat_map(|&(present, past, strength)| {
        [
            (present, (VerbTense::Present, strength)),
            (past, (VerbTense::Past, strength)),
        ]
    }))
});

const SPEAKER_PRONOUNS: &[&str] = &["he", "she", "they", "we", "i", "it"];

const TITLE_CUES: &[&str] = &[
    "titled", "entitled", "called", "named", "article", "book", "song", "film",
    "movie", "report", "episode", "paper", "album", "show", "headline", "post",
];

static ACCORDING_TO: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b[Aa]ccording to ([A-Z][A-Za-z0-9&'\-]*(?:[ \t]+(?:of[ \t]+)?[A-Z][A-Za-z0-9&'\-]*)*)")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub speaker: String,
    pub verb: Option<String>,
    pub tense: Option<VerbTense>,
    /// How assertive the attribution verb is, in [0,1]
    pub strength: f64,
    pub method: AttributionMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    /// Quoted content without the marks
    pub text: String,
    pub style: QuoteStyle,
    pub kind: QuoteKind,
    /// Offsets of the whole quote, marks included
    pub start: usize,
    pub end: usize,
    pub word_count: usize,
    pub attribution: Option<Attribution>,
    pub confidence: f64,
}

impl Located for Quotation {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationAnalysis {
    pub quotations: Vec<Quotation>,
    /// Speaker name to number of attributed quotes
    pub speakers: BTreeMap<String, usize>,
    pub attributed_count: usize,
    pub unattributed_count: usize,
    /// Share of characters inside quote marks
    pub quoted_ratio: f64,
}

/// Find quotations in `text` and who said them.
pub fn parse_quotations(text: &str) -> QuotationAnalysis {
    let mut candidates = Vec::new();
    for (_, &style, caps) in QUOTES.captures_all(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let content = inner.as_str().trim();
        if content.is_empty() {
            continue;
        }
        // the curly single pattern consumes one trailing character
        let end = if style == QuoteStyle::CurlySingle {
            inner.end() + '’'.len_utf8()
        } else {
            whole.end()
        };
        let start = whole.start();
        let attribution = find_attribution(text, start, end);
        let word_count = content.split_whitespace().count();
        let kind = classify(text, start, content, word_count, attribution.is_some());
        let confidence = match (kind, attribution.is_some()) {
            (QuoteKind::Direct, true) => 0.9,
            (QuoteKind::Direct, false) => 0.7,
            (QuoteKind::Block, _) => 0.8,
            (QuoteKind::Title, _) => 0.7,
            (QuoteKind::Scare, _) => 0.6,
        };
        candidates.push(Quotation {
            text: content.to_string(),
            style,
            kind,
            start,
            end,
            word_count,
            attribution,
            confidence,
        });
    }
    let quotations = resolve_overlaps(candidates);

    let mut speakers = BTreeMap::new();
    for q in &quotations {
        if let Some(a) = &q.attribution {
            *speakers.entry(a.speaker.clone()).or_insert(0) += 1;
        }
    }
    let attributed_count = quotations.iter().filter(|q| q.attribution.is_some()).count();
    let quoted_chars: usize = quotations.iter().map(|q| q.end - q.start).sum();
    let quoted_ratio = if text.is_empty() {
        0.0
    } else {
        quoted_chars as f64 / text.len() as f64
    };

    debug!(
        quotations = quotations.len(),
        attributed = attributed_count,
        "Parsed quotations"
    );
    QuotationAnalysis {
        unattributed_count: quotations.len() - attributed_count,
        attributed_count,
        quotations,
        speakers,
        quoted_ratio,
    }
}

fn classify(text: &str, start: usize, content: &str, words: usize, attributed: bool) -> QuoteKind {
    let sentences = sentence_spans(content).len();
    if words >= BLOCK_MIN_WORDS || sentences >= BLOCK_MIN_SENTENCES || content.contains('\n') {
        return QuoteKind::Block;
    }

    let cue_from = floor_boundary(text, start.saturating_sub(TITLE_CUE_WINDOW));
    let before = text[cue_from..start].to_lowercase();
    let before_words: Vec<&str> = before
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();
    if before_words.iter().any(|w| TITLE_CUES.contains(w)) && words <= TITLE_MAX_WORDS {
        return QuoteKind::Title;
    }
    if before_words.last().is_some_and(|w| *w == "so-called") {
        return QuoteKind::Scare;
    }

    let ends_like_speech = content.ends_with(['.', '!', '?', ',']);
    if !attributed && !ends_like_speech && words <= TITLE_MAX_WORDS && is_title_case(content) {
        return QuoteKind::Title;
    }
    if !attributed && !ends_like_speech && words <= SCARE_MAX_WORDS {
        return QuoteKind::Scare;
    }
    QuoteKind::Direct
}

fn is_title_case(content: &str) -> bool {
    let words: Vec<&str> = content.split_whitespace().collect();
    words.len() >= 2
        && words
            .iter()
            .filter(|w| w.chars().count() > 3)
            .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}

struct Candidate {
    attribution: Attribution,
    distance: usize,
}

fn find_attribution(text: &str, q_start: usize, q_end: usize) -> Option<Attribution> {
    let after_end = ceil_boundary(text, q_end + CONTEXT_WINDOW);
    let mut after = &text[q_end..after_end];
    if let Some(cut) = after.find(['"', '“', '«', '‘']) {
        after = &after[..cut];
    }
    let before_start = floor_boundary(text, q_start.saturating_sub(CONTEXT_WINDOW));
    let mut before = &text[before_start..q_start];
    if let Some(cut) = before.rfind(['"', '”', '»', '’']) {
        before = &before[cut + 1..];
    }

    let mut best: Option<Candidate> = None;
    let mut consider = |c: Candidate| {
        if best.as_ref().is_none_or(|b| c.distance < b.distance) {
            best = Some(c);
        }
    };

    // after the quote: `, said Jane Doe` or `, Jane Doe said`
    for m in VERB_MATCHER.find_all(after) {
        if let Some(speaker) = speaker_near(after, m.start, m.end) {
            let (tense, strength) = m.payload;
            consider(Candidate {
                distance: m.start,
                attribution: Attribution {
                    speaker,
                    verb: Some(m.text),
                    tense: Some(tense),
                    strength,
                    method: AttributionMethod::VerbAfter,
                },
            });
        }
    }
    // before the quote: `Jane Doe said, `
    for m in VERB_MATCHER.find_all(before) {
        let tail = &before[m.end..];
        if !tail.chars().all(|c| c.is_whitespace() || matches!(c, ',' | ':')) {
            continue;
        }
        if let Some(speaker) = speaker_near(before, m.start, m.end) {
            let (tense, strength) = m.payload;
            consider(Candidate {
                distance: before.len() - m.end,
                attribution: Attribution {
                    speaker,
                    verb: Some(m.text),
                    tense: Some(tense),
                    strength,
                    method: AttributionMethod::VerbBefore,
                },
            });
        }
    }
    if best.is_some() {
        return best.map(|c| c.attribution);
    }

    [after, before].iter().find_map(|window| {
        let caps = ACCORDING_TO.captures(window)?;
        Some(Attribution {
            speaker: caps.get(1)?.as_str().to_string(),
            verb: None,
            tense: None,
            strength: 0.6,
            method: AttributionMethod::AccordingTo,
        })
    })
}

/// A capitalized name or pronoun directly before or after `window[start..end]`.
fn speaker_near(window: &str, start: usize, end: usize) -> Option<String> {
    let phrases = capitalized_phrases(window);
    let adjacent_before = phrases
        .iter()
        .rev()
        .find(|&&(_, e)| e <= start && window[e..start].trim().is_empty())
        .map(|&(s, e)| window[s..e].to_string());
    let adjacent_after = phrases
        .iter()
        .find(|&&(s, _)| s >= end && window[end..s].trim().is_empty())
        .map(|&(s, e)| window[s..e].to_string());
    adjacent_before
        .or(adjacent_after)
        .or_else(|| pronoun_before(window, start))
        .or_else(|| pronoun_after(window, end))
}

fn pronoun_before(window: &str, start: usize) -> Option<String> {
    let word = window[..start].split_whitespace().last()?;
    SPEAKER_PRONOUNS
        .contains(&word.to_lowercase().as_str())
        .then(|| word.to_string())
}

fn pronoun_after(window: &str, end: usize) -> Option<String> {
    let word = window[end..]
        .split_whitespace()
        .next()?
        .trim_end_matches(|c: char| !c.is_alphanumeric());
    SPEAKER_PRONOUNS
        .contains(&word.to_lowercase().as_str())
        .then(|| word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribution_after_the_quote() {
        let a = parse_quotations(r#""The battery lasts forever," said Jane Doe."#);
        assert_eq!(a.quotations.len(), 1);
        let q = &a.quotations[0];
        assert_eq!(q.kind, QuoteKind::Direct);
        let attr = q.attribution.as_ref().unwrap();
        assert_eq!(attr.speaker, "Jane Doe");
        assert_eq!(attr.tense, Some(VerbTense::Past));
        assert_eq!(attr.method, AttributionMethod::VerbAfter);
    }

    #[test]
    fn attribution_before_the_quote() {
        let a = parse_quotations("Acme CEO John Smith says “we will ship in May.”");
        let attr = a.quotations[0].attribution.as_ref().unwrap();
        assert_eq!(attr.speaker, "Acme CEO John Smith");
        assert_eq!(attr.tense, Some(VerbTense::Present));
        assert_eq!(a.quotations[0].style, QuoteStyle::CurlyDouble);
    }

    #[test]
    fn according_to_fallback() {
        let a = parse_quotations(r#"According to Gartner, the market is "growing fast and steadily.""#);
        let attr = a.quotations[0].attribution.as_ref().unwrap();
        assert_eq!(attr.method, AttributionMethod::AccordingTo);
        assert_eq!(attr.speaker, "Gartner");
    }

    #[test]
    fn short_unattributed_quote_is_scare() {
        let a = parse_quotations(r#"Their "premium" support never answers."#);
        assert_eq!(a.quotations[0].kind, QuoteKind::Scare);
        assert_eq!(a.unattributed_count, 1);
    }

    #[test]
    fn title_after_cue_word() {
        let a = parse_quotations(r#"She wrote an article titled "Why Search Is Changing" last year."#);
        assert_eq!(a.quotations[0].kind, QuoteKind::Title);
    }

    #[test]
    fn guillemets_and_apostrophes() {
        let a = parse_quotations("Il a dit « c’est parfait » hier. ‘I don’t know’ she said.");
        assert_eq!(a.quotations.len(), 2);
        assert_eq!(a.quotations[0].style, QuoteStyle::Guillemet);
        assert_eq!(a.quotations[0].text, "c’est parfait");
        assert_eq!(a.quotations[1].text, "I don’t know");
        assert_eq!(a.quotations[1].attribution.as_ref().unwrap().speaker, "she");
    }

    #[test]
    fn empty_text() {
        let a = parse_quotations("");
        assert!(a.quotations.is_empty());
        assert_eq!(a.quoted_ratio, 0.0);
    }
}
