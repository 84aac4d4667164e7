// Backend selector: probe the preferred remote, else use the rule engine.
//
// Two states per request: the probe succeeds and the remote is used, or
// anything at all goes wrong and the rule-based backend is used. Nothing is
// cached between requests, so every call re-probes.

use std::sync::Arc;

use tracing::{debug, info};

use super::rule_based::RuleBasedBackend;
use super::traits::RemoteBackend;

/// Outcome of one liveness probe. Scoped to a single analysis call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendHealth {
    Healthy,
    Unhealthy { reason: String },
}

impl BackendHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, BackendHealth::Healthy)
    }
}

/// The backend chosen for one request.
pub enum Selection<'a> {
    Remote(&'a dyn RemoteBackend),
    /// Rule engine, with the reason the remote was skipped (None when no
    /// remote is configured).
    RuleBased {
        backend: &'a RuleBasedBackend,
        reason: Option<String>,
    },
}

/// Chooses a backend per request from live remote availability.
pub struct BackendSelector {
    remote: Option<Arc<dyn RemoteBackend>>,
    rule_based: RuleBasedBackend,
}

impl BackendSelector {
    /// Prefer `remote` whenever its probe succeeds.
    pub fn new(remote: Arc<dyn RemoteBackend>) -> Self {
        Self {
            remote: Some(remote),
            rule_based: RuleBasedBackend::new(),
        }
    }

    /// Never leave the process; always score with the rule engine.
    pub fn rule_based_only() -> Self {
        Self {
            remote: None,
            rule_based: RuleBasedBackend::new(),
        }
    }

    pub fn remote(&self) -> Option<&dyn RemoteBackend> {
        self.remote.as_deref()
    }

    pub fn rule_based(&self) -> &RuleBasedBackend {
        &self.rule_based
    }

    /// Probe the configured remote once. `None` when there is no remote.
    pub async fn probe(&self) -> Option<BackendHealth> {
        let remote = self.remote.as_deref()?;
        let health = match remote.check_health().await {
            Ok(()) => BackendHealth::Healthy,
            Err(e) => BackendHealth::Unhealthy {
                reason: e.to_string(),
            },
        };
        debug!(backend = remote.name(), healthy = health.is_healthy(), "Liveness probe");
        Some(health)
    }

    /// Pick the backend for one request.
    pub async fn select(&self) -> Selection<'_> {
        match (self.remote.as_deref(), self.probe().await) {
            (Some(remote), Some(BackendHealth::Healthy)) => Selection::Remote(remote),
            (Some(remote), Some(BackendHealth::Unhealthy { reason })) => {
                info!(
                    backend = remote.name(),
                    reason = %reason,
                    "Remote backend unhealthy, using rule-based analysis"
                );
                Selection::RuleBased {
                    backend: &self.rule_based,
                    reason: Some(reason),
                }
            }
            _ => Selection::RuleBased {
                backend: &self.rule_based,
                reason: None,
            },
        }
    }
}
