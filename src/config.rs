use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::toxicity::max_model::DEFAULT_MAX_MODEL_URL;
use crate::toxicity::ml_service::DEFAULT_ML_SERVICE_URL;

/// Per-request timeout for remote calls and liveness probes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Inputs longer than this many characters are rejected.
pub const DEFAULT_MAX_CHARS: usize = 10_000;

/// Which remote backend to probe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredBackend {
    /// ML service with /predict and /health routes (default)
    MlService,
    /// MAX toxic-comment classifier
    MaxModel,
    /// Skip remotes entirely and score locally
    RulesOnly,
}

impl PreferredBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredBackend::MlService => "ml",
            PreferredBackend::MaxModel => "max",
            PreferredBackend::RulesOnly => "rules",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Nothing here is secret; every value has a default so the analyzer works
/// out of the box against locally running model servers. The .env file is
/// loaded at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub preferred_backend: PreferredBackend,
    /// Base URL of the ML service (CINDER_ML_URL)
    pub ml_service_url: String,
    /// Predict endpoint of the MAX model server (CINDER_MAX_URL)
    pub max_model_url: String,
    /// Client timeout for every remote request (CINDER_TIMEOUT_SECS)
    pub remote_timeout: Duration,
    /// Oversized-input limit in characters (CINDER_MAX_CHARS)
    pub max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred_backend: PreferredBackend::MlService,
            ml_service_url: DEFAULT_ML_SERVICE_URL.to_string(),
            max_model_url: DEFAULT_MAX_MODEL_URL.to_string(),
            remote_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let preferred_backend = match lookup("CINDER_BACKEND").as_deref() {
            None | Some("") | Some("ml") => PreferredBackend::MlService,
            Some("max") => PreferredBackend::MaxModel,
            Some("rules") => PreferredBackend::RulesOnly,
            Some(other) => anyhow::bail!(
                "Unknown CINDER_BACKEND '{other}'. Expected one of: ml, max, rules."
            ),
        };

        let remote_timeout = match lookup("CINDER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("CINDER_TIMEOUT_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    anyhow::bail!("CINDER_TIMEOUT_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => defaults.remote_timeout,
        };

        let max_chars = match lookup("CINDER_MAX_CHARS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CINDER_MAX_CHARS is not a number: {raw}"))?,
            None => defaults.max_chars,
        };

        Ok(Self {
            preferred_backend,
            ml_service_url: lookup("CINDER_ML_URL").unwrap_or(defaults.ml_service_url),
            max_model_url: lookup("CINDER_MAX_URL").unwrap_or(defaults.max_model_url),
            remote_timeout,
            max_chars,
        })
    }

    /// URL of the remote that will be probed, if any.
    pub fn remote_url(&self) -> Option<&str> {
        match self.preferred_backend {
            PreferredBackend::MlService => Some(self.ml_service_url.as_str()),
            PreferredBackend::MaxModel => Some(self.max_model_url.as_str()),
            PreferredBackend::RulesOnly => None,
        }
    }
}
