// Remote ML service backend (transformer model behind a small HTTP API).
//
// POST {base}/predict with {"text": "..."} returns flat sub-scores plus a
// compound sentiment polarity. GET {base}/health is the liveness probe.
// No retries: any failure is reported and the analyzer falls back.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AnalysisError;
use super::normalize::{normalize, CategoryKind, RawScores, SentimentSignal, ML_SERVICE_PROFILE};
use super::traits::{RemoteBackend, ToxicityBackend, ToxicityResult};

/// Default base URL of the ML service.
pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:8000";

pub const BACKEND_NAME: &str = "ml-service";

/// Confidence assumed when the service does not report one.
const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Client for the ML scoring service.
pub struct MlServiceBackend {
    client: Client,
    predict_url: String,
    health_url: String,
}

impl MlServiceBackend {
    /// Create a client for the service at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("cinder/0.1 (toxicity-analysis)")
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            predict_url: format!("{base_url}/predict"),
            health_url: format!("{base_url}/health"),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl ToxicityBackend for MlServiceBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn analyze(&self, content: &str) -> Result<ToxicityResult, AnalysisError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&MlRequest { text: content })
            .send()
            .await
            .map_err(|e| AnalysisError::unavailable(BACKEND_NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::unavailable(
                BACKEND_NAME,
                format!("returned {status}: {body}"),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::unavailable(BACKEND_NAME, e.to_string()))?;
        let prediction: MlPrediction = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::malformed(BACKEND_NAME, e.to_string()))?;

        debug!(
            toxicity = prediction.toxicity_score,
            threat = ?prediction.threat,
            sentiment = ?prediction.sentiment_score,
            "ML service prediction"
        );

        Ok(normalize(
            &prediction.into_raw_scores(),
            content,
            &ML_SERVICE_PROFILE,
        ))
    }
}

#[async_trait]
impl RemoteBackend for MlServiceBackend {
    async fn check_health(&self) -> Result<(), AnalysisError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| AnalysisError::unavailable(BACKEND_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::unavailable(
                BACKEND_NAME,
                format!("health check returned {}", response.status()),
            ));
        }
        Ok(())
    }
}

// --- ML service request/response types ---

#[derive(Serialize)]
struct MlRequest<'a> {
    text: &'a str,
}

/// Reply from `/predict`. Only the primary toxicity score is required.
#[derive(Debug, Clone, Deserialize)]
pub struct MlPrediction {
    #[serde(alias = "toxicity")]
    pub toxicity_score: f64,
    pub severe_toxicity: Option<f64>,
    pub insult: Option<f64>,
    pub threat: Option<f64>,
    pub profanity: Option<f64>,
    pub obscene: Option<f64>,
    pub identity_attack: Option<f64>,
    pub sexual_explicit: Option<f64>,
    /// Compound polarity in [-1, 1]
    pub sentiment_score: Option<f64>,
    pub confidence: Option<f64>,
    /// Extra model-specific labels
    #[serde(default)]
    pub categories: BTreeMap<String, f64>,
}

impl MlPrediction {
    /// Translate into the normalizer's input. Sub-scores the service did
    /// not send are left out rather than reported as zero.
    pub fn into_raw_scores(self) -> RawScores {
        let categories = [
            (CategoryKind::SevereToxicity, self.severe_toxicity),
            (CategoryKind::Insult, self.insult),
            (CategoryKind::Threat, self.threat),
            (CategoryKind::Profanity, self.profanity),
            (CategoryKind::Obscene, self.obscene),
            (CategoryKind::IdentityAttack, self.identity_attack),
            (CategoryKind::SexualExplicit, self.sexual_explicit),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| (kind, v)))
        .collect();

        RawScores {
            toxicity: self.toxicity_score,
            categories,
            extra: self.categories,
            sentiment: self
                .sentiment_score
                .map_or(SentimentSignal::FromScores, SentimentSignal::Compound),
            confidence: self.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        }
    }
}
