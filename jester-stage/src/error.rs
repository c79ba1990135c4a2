//! Error types for jester-stage
//!
//! Collaborator errors are kept separate so each adapter reports in its own
//! terms; `StageError` is what a performance cycle fails with, and
//! [`StageError::class`] decides which recovery path the loop takes.

use jester_common::JokeId;
use thiserror::Error;

/// Joke source failure
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source or network unreachable, timed out, or answered with a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Source answered but refused to produce a joke
    #[error("Source rejected request: {0}")]
    Rejected(String),

    /// Payload could not be understood
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Punchline predictor failure
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Predicted text must be suppressed by content policy
    #[error("Content policy rejection (category: {})", .category.as_deref().unwrap_or("unspecified"))]
    ContentPolicy { category: Option<String> },

    /// Predictor unreachable
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Prediction failed: {0}")]
    Failed(String),
}

/// Best-effort side effect failure (narration, sound cues)
#[derive(Debug, Error)]
#[error("Effect failed: {0}")]
pub struct EffectError(pub String);

/// Performance store failure
#[derive(Debug, Error)]
#[error("Store error: {0}")]
pub struct StoreError(pub String);

/// Failure of one performance cycle
#[derive(Debug, Error)]
pub enum StageError {
    /// Joke source or predictor could not be reached
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Predictor refused to answer for this joke
    #[error("Content policy rejection for joke {joke_id}")]
    ContentPolicy {
        joke_id: JokeId,
        category: Option<String>,
    },

    /// Joke violated its structural invariants
    #[error("Invalid joke: {0}")]
    InvalidJoke(#[from] jester_common::Error),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Session cannot be replaced while a performance is running
    #[error("Session is in use by a running performance")]
    SessionBusy,

    /// A collaborator panicked while the cycle was running
    #[error("Cycle panicked: {0}")]
    Panicked(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Recovery path for a failed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// NetworkAwaiting overlay until cleared or stopped
    Transport,
    /// Speechless overlay, then abandon the joke
    ContentPolicy,
    /// Fixed backoff, then restart the cycle
    Unclassified,
}

impl StageError {
    pub fn class(&self) -> FailureClass {
        match self {
            StageError::Transport(_) => FailureClass::Transport,
            StageError::ContentPolicy { .. } => FailureClass::ContentPolicy,
            StageError::InvalidJoke(_)
            | StageError::Prediction(_)
            | StageError::SessionBusy
            | StageError::Panicked(_)
            | StageError::Internal(_) => FailureClass::Unclassified,
        }
    }

    /// Content-filter category of a content policy rejection
    pub fn filter_category(&self) -> Option<&str> {
        match self {
            StageError::ContentPolicy { category, .. } => category.as_deref(),
            _ => None,
        }
    }
}

impl From<SourceError> for StageError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Transport(msg) => StageError::Transport(msg),
            other => StageError::Internal(other.to_string()),
        }
    }
}

impl StageError {
    /// Convert a caught panic payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        StageError::Panicked(message)
    }

    /// Classify a predictor failure for the joke being guessed
    pub fn from_predictor(err: PredictorError, joke_id: JokeId) -> Self {
        match err {
            PredictorError::ContentPolicy { category } => {
                StageError::ContentPolicy { joke_id, category }
            }
            PredictorError::Transport(msg) => StageError::Transport(msg),
            PredictorError::Failed(msg) => StageError::Prediction(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_transport_maps_to_transport_class() {
        let err: StageError = SourceError::Transport("connection refused".into()).into();
        assert_eq!(err.class(), FailureClass::Transport);
    }

    #[test]
    fn test_source_rejection_is_unclassified() {
        let err: StageError = SourceError::Rejected("No matching joke found".into()).into();
        assert_eq!(err.class(), FailureClass::Unclassified);
    }

    #[test]
    fn test_predictor_errors_classify() {
        let policy = StageError::from_predictor(
            PredictorError::ContentPolicy {
                category: Some("hate".into()),
            },
            9,
        );
        assert_eq!(policy.class(), FailureClass::ContentPolicy);
        assert_eq!(policy.to_string(), "Content policy rejection for joke 9");
        assert_eq!(policy.filter_category(), Some("hate"));

        let failed = StageError::from_predictor(PredictorError::Failed("boom".into()), 9);
        assert_eq!(failed.class(), FailureClass::Unclassified);
    }

    #[test]
    fn test_panic_payload_is_unclassified() {
        let err = StageError::from_panic(Box::new("predictor exploded"));
        assert_eq!(err.class(), FailureClass::Unclassified);
        assert_eq!(err.to_string(), "Cycle panicked: predictor exploded");

        let owned = StageError::from_panic(Box::new(format!("joke {}", 7)));
        assert_eq!(owned.to_string(), "Cycle panicked: joke 7");
    }

    #[test]
    fn test_invalid_joke_is_unclassified() {
        let err: StageError = jester_common::Error::InvalidInput("Setup is required".into()).into();
        assert_eq!(err.class(), FailureClass::Unclassified);
    }
}
