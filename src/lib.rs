// Lexiscope: rule-based multilingual text analysis.
//
// This is the library root. Each module corresponds to one stage of the
// pipeline, from tokenization up to document-level reports. Every analyzer
// is a pure function of its input text.

pub mod absa;
pub mod analysis;
pub mod config;
pub mod coref;
pub mod lexicon;
pub mod output;
pub mod patterns;
pub mod pipeline;
pub mod text;
pub mod topics;
