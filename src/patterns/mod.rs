// Pattern extractors. Each one is data (a phrase or regex table tagged with
// what a hit means) driving one of the generic matchers in `matcher`, and
// reports typed spans with byte offsets into the source text.

pub mod aspects;
pub mod discourse;
pub mod intent;
pub mod keyphrases;
pub mod matcher;
pub mod negation;
pub mod quotes;
pub mod span;

pub use aspects::{detect_aspects, Aspect, AspectCategory};
pub use discourse::{detect_discourse_markers, DiscourseAnalysis};
pub use intent::{classify_query_intent, IntentClassification, QueryIntent};
pub use keyphrases::{extract_keyphrases, Keyphrase};
pub use negation::{detect_negations, NegationAnalysis};
pub use quotes::{parse_quotations, QuotationAnalysis};
pub use span::{resolve_overlaps, Located, Span};
