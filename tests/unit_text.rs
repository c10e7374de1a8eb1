// Unit tests for the text primitives: tokenization, segmentation, stemming,
// syllables and stopword tables.
//
// These go through the public `lexiscope::text` API only.

use lexiscope::text::{
    count_syllables, get_stopwords, is_stopword, sentence_spans, stem, tokenize,
    tokenize_paragraphs, tokenize_sentences, tokenize_with, Language,
};

// ============================================================
// Tokenizer: offsets and flags
// ============================================================

#[test]
fn every_token_offset_slices_back_to_its_text() {
    let text = "Café prices rose 12% in März; it’s “fine”, they said.\n\nNew paragraph!";
    let tokens = tokenize(text);
    assert!(!tokens.is_empty());
    for t in &tokens {
        assert!(t.end > t.start, "empty token span at {}", t.start);
        assert_eq!(&text[t.start..t.end], t.text);
    }
}

#[test]
fn tokens_are_in_text_order() {
    let tokens = tokenize("alpha beta. gamma delta");
    let starts: Vec<usize> = tokens.iter().map(|t| t.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn stopword_flag_uses_language_table() {
    let en = tokenize("the nebula");
    assert!(en[0].is_stopword);
    assert!(!en[1].is_stopword);

    let es = tokenize_with::<&str>("los cometas", Language::Spanish, &[]);
    assert!(es[0].is_stopword);
}

#[test]
fn custom_stopwords_are_case_insensitive() {
    let tokens = tokenize_with("Acme builds rockets", Language::English, &["ACME"]);
    assert!(tokens[0].is_stopword);
    assert!(!tokens[2].is_stopword);
}

// ============================================================
// Segmentation
// ============================================================

#[test]
fn sentences_split_on_terminal_punctuation() {
    let s = tokenize_sentences("Is it ready? Yes! Ship it.");
    assert_eq!(s, vec!["Is it ready?", "Yes!", "Ship it."]);
}

#[test]
fn sentence_spans_are_trimmed_and_ordered() {
    let text = "  First one.   Second one.  ";
    let spans = sentence_spans(text);
    assert_eq!(spans.len(), 2);
    assert_eq!(&text[spans[0].0..spans[0].1], "First one.");
    assert_eq!(&text[spans[1].0..spans[1].1], "Second one.");
}

#[test]
fn paragraphs_split_on_blank_lines() {
    let p = tokenize_paragraphs("One\nstill one\n\n  \nTwo");
    assert_eq!(p, vec!["One\nstill one", "Two"]);
}

// ============================================================
// Stemming
// ============================================================

#[test]
fn stem_is_idempotent_on_common_inflections() {
    for w in ["running", "jumped", "cats", "flies", "agreed", "happiness", "connected"] {
        let once = stem(w);
        assert_eq!(stem(&once), once, "stem(stem({w})) changed");
    }
}

#[test]
fn stem_merges_inflections_of_one_word() {
    assert_eq!(stem("connected"), stem("connecting"));
    assert_eq!(stem("cats"), stem("cat"));
}

// ============================================================
// Syllables and stopwords
// ============================================================

#[test]
fn syllable_counts_are_positive_for_words() {
    for w in ["a", "strength", "idea", "university"] {
        assert!(count_syllables(w) >= 1, "{w} counted zero syllables");
    }
    assert!(count_syllables("university") > count_syllables("strength"));
}

#[test]
fn get_stopwords_unions_custom_terms() {
    let words = get_stopwords(Language::Portuguese, &["  Lexiscope "]);
    assert!(words.contains("lexiscope"));
    assert!(words.contains("não"));
    assert!(is_stopword("não", Language::Portuguese));
    assert!(!is_stopword("nebula", Language::English));
}
