//! Collaborator traits and the values that cross them
//!
//! The performance loop consumes five collaborators:
//! 1. [`JokeSource`] - supplies jokes (may fail with a transport error)
//! 2. [`PunchlinePredictor`] - guesses a punchline from a setup
//! 3. [`Narrator`] - speaks text (best-effort)
//! 4. [`EffectPlayer`] - plays sound cues (best-effort)
//! 5. [`PerformanceStore`] - records completed performances (best-effort)
//!
//! # Example
//! ```rust,ignore
//! use jester_stage::types::{JokeSource, SourceError};
//!
//! pub struct Deck(Vec<Joke>);
//!
//! #[async_trait::async_trait]
//! impl JokeSource for Deck {
//!     async fn fetch(&self, safe_mode: bool, exclude_ids: Option<&HashSet<JokeId>>) -> Result<Joke, SourceError> {
//!         // pick a joke not in exclude_ids
//!     }
//! }
//! ```

use crate::error::{EffectError, PredictorError, SourceError, StoreError};
use async_trait::async_trait;
use jester_common::config::Voice;
use jester_common::{Joke, JokeId, PerformanceRecord, Rating};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Confidence when the predictor finished normally
pub const CONFIDENCE_COMPLETE: f64 = 0.9;

/// Confidence when the predictor stopped for any other reason
pub const CONFIDENCE_TRUNCATED: f64 = 0.5;

// ============================================================================
// Joke source
// ============================================================================

/// Supplies jokes
#[async_trait]
pub trait JokeSource: Send + Sync {
    /// Fetch one joke
    ///
    /// `exclude_ids` is a hint; sources that cannot exclude may ignore it and
    /// leave deduplication to [`FetchRetryCoordinator`](crate::fetch::FetchRetryCoordinator).
    ///
    /// # Errors
    /// `SourceError::Transport` on network/service failure.
    async fn fetch(
        &self,
        safe_mode: bool,
        exclude_ids: Option<&HashSet<JokeId>>,
    ) -> Result<Joke, SourceError>;
}

// ============================================================================
// Predictor
// ============================================================================

/// Why the predictor stopped producing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of the answer
    Stop,
    /// Cut off by a length limit
    Length,
    /// Replaced by a safe fallback because of content filtering
    ContentFilter,
}

/// Predicted punchline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub text: String,
    pub finish: FinishReason,
}

impl Prediction {
    pub fn new(text: impl Into<String>, finish: FinishReason) -> Self {
        Self {
            text: text.into(),
            finish,
        }
    }

    /// Text is a content-filter fallback rather than a real guess
    pub fn is_content_filtered(&self) -> bool {
        self.finish == FinishReason::ContentFilter
    }

    /// 0.9 when the response terminated normally, 0.5 otherwise
    pub fn confidence(&self) -> f64 {
        match self.finish {
            FinishReason::Stop => CONFIDENCE_COMPLETE,
            FinishReason::Length | FinishReason::ContentFilter => CONFIDENCE_TRUNCATED,
        }
    }
}

/// Guesses punchlines
#[async_trait]
pub trait PunchlinePredictor: Send + Sync {
    /// Predict the punchline for `setup`
    ///
    /// # Errors
    /// `PredictorError::ContentPolicy` when the answer must be suppressed.
    async fn predict(&self, setup: &str) -> Result<Prediction, PredictorError>;

    /// Rate the joke; predictors without a rating model return `Ok(None)`
    async fn rate(&self, _joke: &Joke) -> Result<Option<Rating>, PredictorError> {
        Ok(None)
    }
}

// ============================================================================
// Best-effort side effects
// ============================================================================

/// Speaks text aloud
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn speak(&self, text: &str, voice: Voice) -> Result<(), EffectError>;

    /// Halt any narration in progress
    async fn stop(&self) -> Result<(), EffectError> {
        Ok(())
    }
}

/// Sound cue identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Drumroll,
    Fanfare,
    Trombone,
}

/// Sound cue request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectCue {
    pub kind: EffectKind,
    pub duration: Option<Duration>,
    pub volume: f32,
}

/// Plays sound cues
#[async_trait]
pub trait EffectPlayer: Send + Sync {
    /// Prepare the output device; called once per `start`
    async fn initialize(&self) -> Result<(), EffectError> {
        Ok(())
    }

    async fn play(&self, cue: EffectCue) -> Result<(), EffectError>;
}

/// Durably records completed performances
#[async_trait]
pub trait PerformanceStore: Send + Sync {
    async fn save(&self, record: &PerformanceRecord) -> Result<(), StoreError>;
}
