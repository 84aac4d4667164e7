// Batch analysis: score many texts through the analyzer.
//
// Runs on the caller's task with a bounded number of analyses in flight.
// Each text still goes through its own probe-and-select cycle, so a remote
// that dies halfway through a batch is picked up by the fallback for the
// remaining items. Results come back in input order.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::moderation::{gate, PostVerdict};
use crate::output::truncate_chars;
use crate::toxicity::analyzer::ToxicityAnalyzer;
use crate::toxicity::traits::ToxicityResult;

const PREVIEW_CHARS: usize = 60;

/// One analyzed text.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub index: usize,
    pub preview: String,
    pub backend: Option<&'static str>,
    pub result: Option<ToxicityResult>,
    pub verdict: Option<PostVerdict>,
    /// Set when the analyzer rejected the text
    pub error: Option<String>,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub total: usize,
    pub flagged: usize,
    pub rejected: usize,
    /// Number of texts scored by each backend
    pub by_backend: BTreeMap<String, usize>,
    pub items: Vec<BatchItem>,
}

/// Read one text per non-blank line.
pub fn read_texts(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Analyze every text with at most `concurrency` analyses in flight.
pub async fn analyze_batch(
    analyzer: &ToxicityAnalyzer,
    texts: &[String],
    concurrency: usize,
    show_progress: bool,
) -> Result<BatchReport> {
    let pb = if show_progress {
        ProgressBar::new(texts.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Analyzing [{bar:30}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?,
    );

    let items: Vec<BatchItem> = stream::iter(texts.iter().enumerate().map(|(index, text)| {
        let pb = &pb;
        async move {
            let preview = truncate_chars(text, PREVIEW_CHARS);
            let item = match analyzer.analyze_detailed(text).await {
                Ok(outcome) => BatchItem {
                    index,
                    preview,
                    backend: Some(outcome.backend),
                    verdict: Some(gate(&outcome.result)),
                    result: Some(outcome.result),
                    error: None,
                },
                Err(e) => {
                    warn!(index = index, error = %e, "Skipping text");
                    BatchItem {
                        index,
                        preview,
                        backend: None,
                        result: None,
                        verdict: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            pb.inc(1);
            item
        }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;
    pb.finish_and_clear();

    let mut by_backend: BTreeMap<String, usize> = BTreeMap::new();
    for backend in items.iter().filter_map(|i| i.backend) {
        *by_backend.entry(backend.to_string()).or_insert(0) += 1;
    }
    let flagged = items
        .iter()
        .filter(|i| i.result.as_ref().is_some_and(|r| r.is_flagged))
        .count();
    let rejected = items.iter().filter(|i| i.error.is_some()).count();

    info!(
        total = items.len(),
        flagged = flagged,
        rejected = rejected,
        "Batch analysis complete"
    );

    Ok(BatchReport {
        generated_at: Utc::now().to_rfc3339(),
        total: items.len(),
        flagged,
        rejected,
        by_backend,
        items,
    })
}
