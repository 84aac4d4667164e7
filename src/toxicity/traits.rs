// Toxicity backend traits: the swap-ready abstraction.
//
// Every backend (local rule engine or remote model) produces the same
// canonical ToxicityResult. Remote backends additionally expose a liveness
// probe so the selector can decide whether to route traffic to them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AnalysisError;

/// Coarse moderation urgency derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Score cut-offs (0-100 domain) for the none/low/medium/high bands.
/// `Critical` is only reachable through the threat override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBands {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Bands used by the local rule engine.
pub const RULE_BASED_BANDS: SeverityBands = SeverityBands {
    low: 20.0,
    medium: 40.0,
    high: 70.0,
};

/// Bands used for remote model output.
pub const REMOTE_BANDS: SeverityBands = SeverityBands {
    low: 30.0,
    medium: 50.0,
    high: 70.0,
};

impl Severity {
    /// Map a 0-100 score onto a band. NaN falls through to `None`.
    pub fn from_score(score: f64, bands: &SeverityBands) -> Self {
        match score {
            s if s >= bands.high => Severity::High,
            s if s >= bands.medium => Severity::Medium,
            s if s >= bands.low => Severity::Low,
            _ => Severity::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse sentiment label attached to every result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
    VeryPositive,
    VeryNegative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
            Sentiment::VeryPositive => "very_positive",
            Sentiment::VeryNegative => "very_negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named toxicity dimension with its display-domain score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityCategory {
    pub name: String,
    /// 0.0 to 100.0
    pub score: f64,
    /// True iff `score` exceeds the category's detection threshold
    pub detected: bool,
    /// Empty for dynamically named categories reported by a remote model
    pub description: String,
}

/// The canonical verdict for one piece of text.
///
/// Built fresh per analysis call and owned by the caller afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityResult {
    /// Overall score from 0.0 (benign) to 100.0 (very toxic)
    pub score: f64,
    pub is_flagged: bool,
    pub severity: Severity,
    pub sentiment: Sentiment,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub categories: Vec<ToxicityCategory>,
    /// Tokens and phrases that triggered a category, in detection order
    pub toxic_words: Vec<String>,
    /// Remediation and warning messages, in detection order
    pub suggestions: Vec<String>,
}

impl ToxicityResult {
    /// Look up a category by display name.
    pub fn category(&self, name: &str) -> Option<&ToxicityCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Trait for scoring text toxicity. Async because two of the three
/// backends make HTTP calls; the rule engine simply never awaits.
#[async_trait]
pub trait ToxicityBackend: Send + Sync {
    /// Short stable name used in logs and error context.
    fn name(&self) -> &'static str;

    /// Score a single text and return the canonical result.
    async fn analyze(&self, content: &str) -> Result<ToxicityResult, AnalysisError>;
}

/// A backend that lives behind the network and can be probed for liveness.
#[async_trait]
pub trait RemoteBackend: ToxicityBackend {
    /// Single liveness request. Any non-success outcome is an error.
    async fn check_health(&self) -> Result<(), AnalysisError>;
}
