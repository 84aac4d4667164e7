// Analysis facade: the single entry point for callers.
//
// Hides backend choice. Remote failures (probe or call) are absorbed by
// falling back to the rule engine, so in practice every valid input gets a
// result. The only error a caller sees is InvalidInput.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::error::AnalysisError;
use super::max_model::MaxModelBackend;
use super::ml_service::MlServiceBackend;
use super::selector::{BackendHealth, BackendSelector, Selection};
use super::traits::{RemoteBackend, ToxicityBackend, ToxicityResult};
use crate::config::{Config, PreferredBackend, DEFAULT_MAX_CHARS};

/// A result plus which backend produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub result: ToxicityResult,
    pub backend: &'static str,
    /// Why the preferred remote was skipped, if it was
    pub fallback_reason: Option<String>,
}

/// Scores text through whichever backend is currently available.
pub struct ToxicityAnalyzer {
    selector: BackendSelector,
    max_chars: usize,
}

impl ToxicityAnalyzer {
    pub fn new(selector: BackendSelector) -> Self {
        Self {
            selector,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Reject inputs longer than `max_chars` characters.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Wire up the preferred remote backend from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let selector = match config.preferred_backend {
            PreferredBackend::MlService => {
                let remote: Arc<dyn RemoteBackend> = Arc::new(MlServiceBackend::new(
                    &config.ml_service_url,
                    config.remote_timeout,
                )?);
                BackendSelector::new(remote)
            }
            PreferredBackend::MaxModel => {
                let remote: Arc<dyn RemoteBackend> = Arc::new(MaxModelBackend::new(
                    &config.max_model_url,
                    config.remote_timeout,
                )?);
                BackendSelector::new(remote)
            }
            PreferredBackend::RulesOnly => BackendSelector::rule_based_only(),
        };
        Ok(Self::new(selector).with_max_chars(config.max_chars))
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    /// Probe the configured remote without scoring anything.
    pub async fn health(&self) -> Option<BackendHealth> {
        self.selector.probe().await
    }

    /// Score `content` and return the canonical result.
    pub async fn analyze(&self, content: &str) -> Result<ToxicityResult, AnalysisError> {
        self.analyze_detailed(content).await.map(|o| o.result)
    }

    /// Score `content`, also reporting the backend used and any fallback.
    pub async fn analyze_detailed(
        &self,
        content: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let chars = content.chars().count();
        if chars > self.max_chars {
            return Err(AnalysisError::InvalidInput(format!(
                "text is {chars} characters, limit is {}",
                self.max_chars
            )));
        }

        let fallback_reason = match self.selector.select().await {
            Selection::Remote(remote) => match remote.analyze(content).await {
                Ok(result) => {
                    info!(
                        backend = remote.name(),
                        score = result.score,
                        flagged = result.is_flagged,
                        "Analysis complete"
                    );
                    return Ok(AnalysisOutcome {
                        result,
                        backend: remote.name(),
                        fallback_reason: None,
                    });
                }
                Err(e) if e.is_fallback_trigger() => {
                    warn!(
                        backend = remote.name(),
                        error = %e,
                        "Remote analysis failed, falling back to rule-based"
                    );
                    Some(e.to_string())
                }
                Err(e) => return Err(e),
            },
            Selection::RuleBased { reason, .. } => reason,
        };

        let rule_based = self.selector.rule_based();
        let result = rule_based.analyze(content).await?;

        info!(
            backend = rule_based.name(),
            score = result.score,
            flagged = result.is_flagged,
            "Analysis complete"
        );

        Ok(AnalysisOutcome {
            result,
            backend: rule_based.name(),
            fallback_reason,
        })
    }
}
