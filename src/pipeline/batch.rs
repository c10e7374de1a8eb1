// Batch analysis: fan per-document analysis out across blocking workers.
//
// Analysis is CPU-bound and synchronous, so each document runs on tokio's
// blocking pool. `buffer_unordered` caps how many run at once; reports are
// put back in input order before returning.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::analysis::{analyze_document_with, DocumentReport};
use crate::coref::CorefConfig;
use crate::topics::Document;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub coref: CorefConfig,
    pub reference_date: NaiveDate,
    pub show_progress: bool,
}

/// Analyze every document. Reports come back in the order of `documents`.
pub async fn run(documents: Vec<Document>, options: &BatchOptions) -> Result<Vec<DocumentReport>> {
    let total = documents.len();
    let concurrency = options.concurrency.max(1);
    info!(documents = total, concurrency, "Starting batch analysis");

    let pb = if options.show_progress {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Analyzing [{bar:30}] {pos}/{len} ({eta})")
                .context("invalid progress bar template")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let coref = options.coref;
    let reference_date = options.reference_date;
    let results: Vec<(usize, Result<DocumentReport>)> =
        stream::iter(documents.into_iter().enumerate().map(|(index, doc)| {
            let pb = pb.clone();
            async move {
                let id = doc.id.clone();
                let report = tokio::task::spawn_blocking(move || {
                    analyze_document_with(&doc, &coref, reference_date)
                })
                .await
                .with_context(|| format!("analysis of document {id} did not complete"));
                pb.inc(1);
                (index, report)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;
    pb.finish_and_clear();

    let mut ordered: Vec<Option<DocumentReport>> = (0..total).map(|_| None).collect();
    for (index, report) in results {
        ordered[index] = Some(report?);
    }
    let reports: Vec<DocumentReport> = ordered.into_iter().flatten().collect();

    info!(documents = reports.len(), "Batch analysis complete");
    Ok(reports)
}
