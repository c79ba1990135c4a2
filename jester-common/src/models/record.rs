//! Completed performance record handed to the performance store

use crate::models::{AnalysisResult, Joke};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One complete fetch + analysis cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: Uuid,
    /// Session grouping related performances
    pub session_id: String,
    /// Sequence number within the session (1-based)
    pub sequence_number: u32,
    pub joke: Joke,
    pub analysis: AnalysisResult,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl PerformanceRecord {
    pub fn new(
        session_id: impl Into<String>,
        sequence_number: u32,
        analysis: AnalysisResult,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            sequence_number,
            joke: analysis.joke.clone(),
            analysis,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn is_triumph(&self) -> bool {
        self.analysis.is_triumph
    }

    /// Wall-clock duration of the performance in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }
}
