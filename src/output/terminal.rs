// Colored terminal output for single verdicts, health checks, and batches.
//
// main.rs delegates all human-readable formatting here; JSON output goes
// straight through serde_json instead.

use colored::Colorize;

use crate::moderation::{gate, ModerationRoute};
use crate::pipeline::batch::BatchReport;
use crate::toxicity::analyzer::AnalysisOutcome;
use crate::toxicity::selector::BackendHealth;
use crate::toxicity::traits::Severity;

/// Display one analysis outcome.
pub fn display_outcome(text: &str, outcome: &AnalysisOutcome) {
    let result = &outcome.result;
    let verdict = gate(result);

    println!("\n{}", "=== Toxicity Analysis ===".bold());
    println!("  Text: {}", super::truncate_chars(text, 120).dimmed());
    println!("  Backend: {}", outcome.backend);
    if let Some(reason) = &outcome.fallback_reason {
        println!("  {} {}", "Fallback:".yellow(), reason.dimmed());
    }
    println!();
    println!("  Score: {:.1}/100", result.score);
    println!("  Severity: {}", colorize_severity(result.severity));
    println!("  Sentiment: {}", result.sentiment);
    println!("  Confidence: {:.2}", result.confidence);
    println!(
        "  Status: {}",
        match verdict.route {
            ModerationRoute::Queue => "Flagged for review".red().bold(),
            ModerationRoute::Publish => "Safe to publish".green(),
        }
    );

    if !result.categories.is_empty() {
        println!("\n  Categories:");
        for category in &result.categories {
            let marker = if category.detected {
                "!".red().bold()
            } else {
                " ".normal()
            };
            println!("    {} {:<20} {:>5.1}", marker, category.name, category.score);
        }
    }

    if !result.toxic_words.is_empty() {
        println!("\n  Triggered by: {}", result.toxic_words.join(", ").yellow());
    }

    if !result.suggestions.is_empty() {
        println!("\n  Suggestions:");
        for suggestion in &result.suggestions {
            println!("    - {suggestion}");
        }
    }
    println!();
}

/// Display the outcome of a liveness probe.
pub fn display_health(backend: &str, url: Option<&str>, health: Option<&BackendHealth>) {
    match (url, health) {
        (Some(url), Some(BackendHealth::Healthy)) => {
            println!("  {} {} at {}", "UP".green().bold(), backend, url);
        }
        (Some(url), Some(BackendHealth::Unhealthy { reason })) => {
            println!("  {} {} at {}", "DOWN".red().bold(), backend, url);
            println!("    {}", reason.dimmed());
            println!("  Analyses will use the rule-based backend.");
        }
        _ => {
            println!("  No remote backend configured; using rule-based analysis.");
        }
    }
}

/// Display a batch summary followed by the flagged items.
pub fn display_batch_report(report: &BatchReport) {
    println!(
        "\n{}",
        format!("=== Batch Report ({} texts) ===", report.total).bold()
    );
    println!("  Generated: {}", report.generated_at.dimmed());
    for (backend, count) in &report.by_backend {
        println!("  {backend}: {count}");
    }
    if report.rejected > 0 {
        println!("  {} {} rejected", "!".yellow(), report.rejected);
    }

    if report.flagged == 0 {
        println!("\n  {}", "Nothing flagged.".green());
        return;
    }

    println!("\n  {} {} flagged:", "!!".red().bold(), report.flagged);
    for item in &report.items {
        let Some(result) = item.result.as_ref().filter(|r| r.is_flagged) else {
            continue;
        };
        println!(
            "  {:>4}. {:>5.1}  {:<9} {}",
            item.index + 1,
            result.score,
            colorize_severity(result.severity),
            item.preview.dimmed()
        );
    }
    println!();
}

/// Colorize a severity label.
fn colorize_severity(severity: Severity) -> colored::ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.bright_red(),
        Severity::Low => label.yellow(),
        Severity::None => label.green(),
    }
}
