// MAX toxic-comment classifier backend.
//
// The model server takes a list of texts, POST {"text": ["..."]}, and
// answers {"status": "ok", "results": [{"predictions": {...}}]} with one
// entry per input. We send exactly one text and read the first result.
// The server has no separate health route, so the probe posts a tiny
// request to the predict endpoint itself.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AnalysisError;
use super::normalize::{normalize, CategoryKind, RawScores, SentimentSignal, MAX_MODEL_PROFILE};
use super::traits::{RemoteBackend, ToxicityBackend, ToxicityResult};
use crate::output::truncate_chars;

/// Default predict endpoint of a locally running model server.
pub const DEFAULT_MAX_MODEL_URL: &str = "http://localhost:5000/model/predict";

pub const BACKEND_NAME: &str = "max-model";

/// The model reports no confidence of its own.
const MODEL_CONFIDENCE: f64 = 0.9;

const PROBE_TEXT: &str = "ping";

/// Client for the MAX model server.
pub struct MaxModelBackend {
    client: Client,
    predict_url: String,
}

impl MaxModelBackend {
    pub fn new(predict_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("cinder/0.1 (toxicity-analysis)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            predict_url: predict_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    async fn post(&self, content: &str) -> Result<reqwest::Response, AnalysisError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&MaxRequest {
                text: vec![content],
            })
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
        Ok(response)
    }
}

#[async_trait]
impl ToxicityBackend for MaxModelBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn analyze(&self, content: &str) -> Result<ToxicityResult, AnalysisError> {
        let body = self
            .post(content)
            .await?
            .text()
            .await
            .map_err(|e| AnalysisError::unavailable(BACKEND_NAME, e.to_string()))?;

        let reply: MaxResponse = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::malformed(BACKEND_NAME, e.to_string()))?;

        let first = reply
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::malformed(BACKEND_NAME, "no results returned"))?;

        debug!(
            status = ?reply.status,
            toxic = first.predictions.toxic,
            threat = first.predictions.threat,
            text_preview = %truncate_chars(first.original_text.as_deref().unwrap_or(""), 50),
            "MAX model prediction"
        );

        Ok(normalize(
            &first.predictions.into_raw_scores(),
            content,
            &MAX_MODEL_PROFILE,
        ))
    }
}

#[async_trait]
impl RemoteBackend for MaxModelBackend {
    async fn check_health(&self) -> Result<(), AnalysisError> {
        self.post(PROBE_TEXT).await.map(|_| ())
    }
}

// --- MAX model request/response types ---

#[derive(Serialize)]
struct MaxRequest<'a> {
    text: Vec<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaxResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub results: Vec<MaxResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaxResult {
    /// Echo of the input as the server received it
    pub original_text: Option<String>,
    pub predictions: MaxPredictions,
}

/// Per-label probabilities. Older deployments used the long label names,
/// which are accepted as aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct MaxPredictions {
    #[serde(alias = "toxicity")]
    pub toxic: f64,
    #[serde(default, alias = "severe_toxicity")]
    pub severe_toxic: f64,
    #[serde(default)]
    pub obscene: f64,
    #[serde(default)]
    pub threat: f64,
    #[serde(default)]
    pub insult: f64,
    #[serde(default, alias = "identity_attack")]
    pub identity_hate: f64,
    pub sexual_explicit: Option<f64>,
}

impl MaxPredictions {
    pub fn into_raw_scores(self) -> RawScores {
        let mut categories = vec![
            (CategoryKind::Toxicity, self.toxic),
            (CategoryKind::SevereToxicity, self.severe_toxic),
            (CategoryKind::Obscene, self.obscene),
            (CategoryKind::Threat, self.threat),
            (CategoryKind::Insult, self.insult),
            (CategoryKind::IdentityAttack, self.identity_hate),
        ];
        if let Some(sexual) = self.sexual_explicit {
            categories.push((CategoryKind::SexualExplicit, sexual));
        }

        RawScores {
            toxicity: self.toxic,
            categories,
            extra: Default::default(),
            sentiment: SentimentSignal::FromScores,
            confidence: MODEL_CONFIDENCE,
        }
    }
}
