//! Prediction analysis and joke rating

use crate::models::Joke;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum similarity for a prediction to count as a triumph
pub const TRIUMPH_THRESHOLD: f64 = 0.55;

/// Rating of a joke on four 1-10 dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// How witty the wordplay or concept is
    pub cleverness: u8,
    /// How inappropriate or edgy the humor is
    pub rudeness: u8,
    /// How involved the joke structure is
    pub complexity: u8,
    /// How hard the punchline is to predict
    pub difficulty: u8,
    pub commentary: String,
}

impl Rating {
    pub fn new(
        cleverness: u8,
        rudeness: u8,
        complexity: u8,
        difficulty: u8,
        commentary: impl Into<String>,
    ) -> Result<Self> {
        for (name, value) in [
            ("cleverness", cleverness),
            ("rudeness", rudeness),
            ("complexity", complexity),
            ("difficulty", difficulty),
        ] {
            if !(1..=10).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "{} must be between 1 and 10, got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            cleverness,
            rudeness,
            complexity,
            difficulty,
            commentary: commentary.into(),
        })
    }

    /// Arithmetic mean of the four dimensions
    pub fn average(&self) -> f64 {
        (self.cleverness as f64
            + self.rudeness as f64
            + self.complexity as f64
            + self.difficulty as f64)
            / 4.0
    }
}

/// Outcome of scoring a predicted punchline against the real one
///
/// `is_triumph` is fixed at construction: similarity at or above
/// [`TRIUMPH_THRESHOLD`] and a prediction that did not come from a
/// content-filter fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub joke: Joke,
    pub predicted_punchline: String,
    /// Predictor confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Similarity between prediction and punchline (0.0 - 1.0)
    pub similarity: f64,
    pub is_triumph: bool,
    /// Prediction text is the predictor's content-filter fallback
    pub content_filtered: bool,
    pub latency_ms: u64,
    pub analyzed_at: DateTime<Utc>,
    pub rating: Option<Rating>,
}

impl AnalysisResult {
    pub fn new(
        joke: Joke,
        predicted_punchline: impl Into<String>,
        confidence: f64,
        similarity: f64,
        content_filtered: bool,
        latency_ms: u64,
    ) -> Self {
        let similarity = similarity.clamp(0.0, 1.0);
        Self {
            joke,
            predicted_punchline: predicted_punchline.into(),
            confidence: confidence.clamp(0.0, 1.0),
            similarity,
            is_triumph: Self::judge(similarity, content_filtered),
            content_filtered,
            latency_ms,
            analyzed_at: Utc::now(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: Option<Rating>) -> Self {
        self.rating = rating;
        self
    }

    /// Triumph rule shared by every producer of analysis results
    pub fn judge(similarity: f64, content_filtered: bool) -> bool {
        similarity >= TRIUMPH_THRESHOLD && !content_filtered
    }
}
