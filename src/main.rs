use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use lexiscope::absa::analyze_absa;
use lexiscope::analysis::{analyze_multilingual, analyze_text};
use lexiscope::config::Config;
use lexiscope::coref::resolve_coreferences_with;
use lexiscope::lexicon::{
    analyze_certainty, analyze_comparative_patterns, extract_temporal_expressions_at,
};
use lexiscope::output::{terminal, to_json};
use lexiscope::patterns::{classify_query_intent, parse_quotations};
use lexiscope::pipeline::batch::{self, BatchOptions};
use lexiscope::topics::{Document, KMeansTopicModeler, TopicModeler};

/// Lexiscope: rule-based text analysis.
///
/// Sentiment, certainty, aspect opinions, coreference, comparisons, dates,
/// quotations and topic clusters, all from lexicons and patterns with no
/// model downloads. Any INPUT may be `-` to read stdin.
#[derive(Parser)]
#[command(name = "lexiscope", version, about)]
struct Cli {
    /// Print results as pretty JSON instead of a colored report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sentiment, readability, keyphrases, statistics, negation and hedging
    Analyze { input: String },

    /// Aspect-level sentiment
    Absa { input: String },

    /// Link pronouns to the entities they refer to
    Coref {
        input: String,

        /// Sentences a pronoun may look back (default: LEXISCOPE_COREF_WINDOW or 3)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Hedging and certainty score
    Certainty { input: String },

    /// Classify a search query's intent
    Intent {
        /// Query words, or `-` for stdin
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Comparative and superlative framing
    Compare { input: String },

    /// Dates and time references with recency scores
    Temporal {
        input: String,

        /// Resolve relative dates against this day (YYYY-MM-DD, default: today)
        #[arg(long)]
        reference_date: Option<String>,
    },

    /// Quotations and who said them
    Quotes { input: String },

    /// Language detection and language-aware sentiment
    Multilingual { input: String },

    /// Cluster documents into topics. Directories contribute every file
    /// inside; `-` reads one document per stdin line.
    Topics {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of clusters (default: min(10, max(2, docs / 5)))
        #[arg(long)]
        num_topics: Option<usize>,

        /// Fixed seed for reproducible clustering
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        min_cluster_size: Option<usize>,

        #[arg(long)]
        top_keywords: Option<usize>,
    },

    /// Run the full per-document analysis over many files in parallel
    Batch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Documents analyzed at once (default: LEXISCOPE_CONCURRENCY or 4)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Reference day for temporal analysis (YYYY-MM-DD)
        #[arg(long)]
        reference_date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lexiscope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let json = cli.json;

    match cli.command {
        Commands::Analyze { input } => {
            let text = read_input(&input)?;
            emit(json, &analyze_text(&text), terminal::display_text_analysis)?;
        }
        Commands::Absa { input } => {
            let text = read_input(&input)?;
            emit(json, &analyze_absa(&text), terminal::display_absa)?;
        }
        Commands::Coref { input, window } => {
            let text = read_input(&input)?;
            let mut coref = config.coref_config();
            if let Some(w) = window {
                coref.max_sentence_distance = w;
            }
            emit(json, &resolve_coreferences_with(&text, &coref), terminal::display_coreference)?;
        }
        Commands::Certainty { input } => {
            let text = read_input(&input)?;
            emit(json, &analyze_certainty(&text), terminal::display_certainty)?;
        }
        Commands::Intent { query } => {
            let query = if query.len() == 1 && query[0] == "-" {
                read_input("-")?
            } else {
                query.join(" ")
            };
            emit(json, &classify_query_intent(&query), terminal::display_intent)?;
        }
        Commands::Compare { input } => {
            let text = read_input(&input)?;
            emit(json, &analyze_comparative_patterns(&text), terminal::display_comparative)?;
        }
        Commands::Temporal {
            input,
            reference_date,
        } => {
            let text = read_input(&input)?;
            let reference = parse_reference_date(reference_date.as_deref())?;
            emit(
                json,
                &extract_temporal_expressions_at(&text, reference),
                terminal::display_temporal,
            )?;
        }
        Commands::Quotes { input } => {
            let text = read_input(&input)?;
            emit(json, &parse_quotations(&text), terminal::display_quotations)?;
        }
        Commands::Multilingual { input } => {
            let text = read_input(&input)?;
            emit(json, &analyze_multilingual(&text), terminal::display_multilingual)?;
        }
        Commands::Topics {
            paths,
            num_topics,
            seed,
            min_cluster_size,
            top_keywords,
        } => {
            let documents = collect_documents(&paths, true)?;
            let mut options = config.topic_options();
            options.num_topics = num_topics;
            if seed.is_some() {
                options.seed = seed;
            }
            if let Some(m) = min_cluster_size {
                options.min_cluster_size = m;
            }
            if let Some(k) = top_keywords {
                options.top_keywords = k;
            }
            info!(documents = documents.len(), "Building topic model");
            let modeler = KMeansTopicModeler::new(options);
            emit(json, &modeler.model(&documents), terminal::display_topics)?;
        }
        Commands::Batch {
            paths,
            concurrency,
            reference_date,
        } => {
            let documents = collect_documents(&paths, false)?;
            let options = BatchOptions {
                concurrency: concurrency.unwrap_or(config.concurrency),
                coref: config.coref_config(),
                reference_date: parse_reference_date(reference_date.as_deref())?,
                show_progress: !json,
            };
            let reports = batch::run(documents, &options).await?;
            emit(json, &reports, |r: &Vec<_>| terminal::display_batch(r))?;
        }
    }

    Ok(())
}

/// Print `value` as JSON or through its terminal renderer.
fn emit<T: Serialize>(json: bool, value: &T, display: impl Fn(&T)) -> Result<()> {
    if json {
        println!("{}", to_json(value)?);
    } else {
        display(value);
    }
    Ok(())
}

/// Read a file, or stdin for `-`.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}

fn parse_reference_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("--reference-date must be YYYY-MM-DD, got {s:?}")),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Turn path arguments into documents. Directories contribute each regular
/// file inside them (sorted, not recursive). `-` reads stdin, one document
/// per non-empty line when `stdin_lines` is set, otherwise the whole stream.
fn collect_documents(paths: &[PathBuf], stdin_lines: bool) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in paths {
        if path.as_os_str() == "-" {
            let text = read_input("-")?;
            if stdin_lines {
                documents.extend(
                    text.lines()
                        .filter(|l| !l.trim().is_empty())
                        .enumerate()
                        .map(|(i, line)| Document::new(format!("stdin:{}", i + 1), line)),
                );
            } else {
                documents.push(Document::new("stdin", text));
            }
        } else if path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("failed to list {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            files.sort();
            if files.is_empty() {
                warn!(dir = %path.display(), "Directory has no files, skipping");
            }
            for file in files {
                documents.push(read_document(&file)?);
            }
        } else {
            documents.push(read_document(path)?);
        }
    }
    Ok(documents)
}

fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Document::new(path.display().to_string(), text))
}
