// Text normalization: tokenization, sentence segmentation, stemming,
// syllable estimation and per-language stopword tables.
//
// Every other analyzer sits on top of these primitives. Tokens carry byte
// offsets into the original text so downstream spans can point back at the
// exact surface form.

pub mod stem;
pub mod stopwords;
pub mod syllables;
pub mod tokenize;

pub use stem::stem;
pub use stopwords::{get_stopwords, is_stopword, Language};
pub use syllables::count_syllables;
pub use tokenize::{
    gap_has_clause_break, sentence_spans, tokenize, tokenize_paragraphs, tokenize_sentences,
    tokenize_with, Token,
};
