// Dictionary-driven scorers: sentiment polarity, hedging/certainty,
// comparative framing and temporal recency.

pub mod comparative;
pub mod hedges;
pub mod sentiment;
pub mod temporal;

pub use comparative::{analyze_comparative_patterns, ComparisonAnalysis};
pub use hedges::{analyze_certainty, score_certainty, CertaintyAnalysis};
pub use sentiment::{analyze_sentiment, analyze_sentiment_with, SentimentLabel, SentimentResult};
pub use temporal::{
    extract_temporal_expressions, extract_temporal_expressions_at, recency_score,
    TemporalAnalysis,
};
