// Error taxonomy for toxicity analysis.

use thiserror::Error;

/// Failures a backend or the analyzer can report.
///
/// Remote adapters distinguish "the service is not reachable" from "the
/// service answered with something we cannot read". Both currently trigger
/// fallback to the rule engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Connection failure, timeout, or non-2xx status.
    #[error("{backend} backend unavailable: {reason}")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },

    /// Undecodable body, missing fields, or an empty result set.
    #[error("{backend} backend returned a malformed response: {reason}")]
    MalformedResponse {
        backend: &'static str,
        reason: String,
    },

    /// Text the analyzer refuses to score.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    pub(crate) fn unavailable(backend: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::BackendUnavailable {
            backend,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(backend: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedResponse {
            backend,
            reason: reason.into(),
        }
    }

    /// Whether the analyzer should substitute the rule engine for this failure.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(
            self,
            AnalysisError::BackendUnavailable { .. } | AnalysisError::MalformedResponse { .. }
        )
    }

    /// The backend that failed, if the failure came from one.
    pub fn backend(&self) -> Option<&'static str> {
        match self {
            AnalysisError::BackendUnavailable { backend, .. }
            | AnalysisError::MalformedResponse { backend, .. } => Some(backend),
            AnalysisError::InvalidInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_trigger_fallback() {
        assert!(AnalysisError::unavailable("ml-service", "timeout").is_fallback_trigger());
        assert!(AnalysisError::malformed("max-model", "no results").is_fallback_trigger());
        assert!(!AnalysisError::InvalidInput("too long".into()).is_fallback_trigger());
    }

    #[test]
    fn message_names_backend() {
        let err = AnalysisError::unavailable("max-model", "connection refused");
        assert_eq!(err.backend(), Some("max-model"));
        assert_eq!(
            err.to_string(),
            "max-model backend unavailable: connection refused"
        );
    }
}
