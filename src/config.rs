use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::coref::CorefConfig;
use crate::topics::TopicModelOptions;

/// Central configuration loaded from environment variables.
///
/// Everything has a default; the .env file is loaded at startup via dotenvy.
/// CLI flags override these values per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How many sentences back a pronoun may look for its antecedent
    pub coref_window: usize,
    /// Fixed k-means seed (LEXISCOPE_TOPIC_SEED); random per run when unset
    pub topic_seed: Option<u64>,
    pub kmeans_max_iterations: usize,
    /// Wall-clock budget for k-means in milliseconds
    pub kmeans_deadline_ms: Option<u64>,
    pub min_cluster_size: usize,
    pub top_keywords: usize,
    /// How many documents the batch pipeline analyzes at once
    pub concurrency: usize,
    /// Extra stopwords for keyphrase and topic extraction
    pub stopwords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coref_window: 3,
            topic_seed: None,
            kmeans_max_iterations: 20,
            kmeans_deadline_ms: None,
            min_cluster_size: 2,
            top_keywords: 10,
            concurrency: 4,
            stopwords: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Malformed numbers are errors
    /// naming the offending variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let stopwords = lookup("LEXISCOPE_STOPWORDS")
            .map(|raw| {
                raw.split(',')
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            coref_window: parse(&lookup, "LEXISCOPE_COREF_WINDOW")?.unwrap_or(defaults.coref_window),
            topic_seed: parse(&lookup, "LEXISCOPE_TOPIC_SEED")?,
            kmeans_max_iterations: parse(&lookup, "LEXISCOPE_KMEANS_MAX_ITER")?
                .unwrap_or(defaults.kmeans_max_iterations),
            kmeans_deadline_ms: parse(&lookup, "LEXISCOPE_KMEANS_DEADLINE_MS")?,
            min_cluster_size: parse(&lookup, "LEXISCOPE_MIN_CLUSTER_SIZE")?
                .unwrap_or(defaults.min_cluster_size),
            top_keywords: parse(&lookup, "LEXISCOPE_TOP_KEYWORDS")?.unwrap_or(defaults.top_keywords),
            concurrency: parse(&lookup, "LEXISCOPE_CONCURRENCY")?.unwrap_or(defaults.concurrency),
            stopwords,
        })
    }

    pub fn coref_config(&self) -> CorefConfig {
        CorefConfig {
            max_sentence_distance: self.coref_window,
            ..CorefConfig::default()
        }
    }

    pub fn topic_options(&self) -> TopicModelOptions {
        TopicModelOptions {
            min_cluster_size: self.min_cluster_size,
            top_keywords: self.top_keywords,
            max_iterations: self.kmeans_max_iterations,
            seed: self.topic_seed,
            deadline: self.kmeans_deadline_ms.map(Duration::from_millis),
            custom_stopwords: self.stopwords.clone(),
            ..TopicModelOptions::default()
        }
    }
}

/// Parse an optional variable; empty values count as unset.
fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        _ => Ok(None),
    }
}
