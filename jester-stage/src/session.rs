//! Performance session: identity, seen-list and tallies
//!
//! A session is owned by exactly one performance loop at a time. Nothing in
//! here is shared, so independent orchestrators never see each other's
//! counters or seen jokes.

use chrono::{DateTime, Utc};
use jester_common::{AnalysisResult, JokeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

/// Most-recent joke ids kept for exclusion
pub const SEEN_LOOKBACK: usize = 50;

/// Snapshot of session statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub jokes_performed: u32,
    pub triumphs: u32,
    pub defeats: u32,
    /// Percentage (0-100) rounded to one decimal
    pub triumph_rate: f64,
    pub average_confidence: f64,
    pub average_similarity: f64,
    pub average_latency_ms: f64,
    pub started_at: DateTime<Utc>,
}

/// State of one performance session
#[derive(Debug, Clone)]
pub struct PerformanceSession {
    id: String,
    started_at: DateTime<Utc>,
    seen: VecDeque<JokeId>,
    triumphs: u32,
    defeats: u32,
    sequence: u32,
    confidence_sum: f64,
    similarity_sum: f64,
    latency_sum_ms: u64,
}

impl Default for PerformanceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceSession {
    pub fn new() -> Self {
        Self {
            id: new_session_id(),
            started_at: Utc::now(),
            seen: VecDeque::with_capacity(SEEN_LOOKBACK),
            triumphs: 0,
            defeats: 0,
            sequence: 0,
            confidence_sum: 0.0,
            similarity_sum: 0.0,
            latency_sum_ms: 0,
        }
    }

    /// Eight lowercase hex characters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Remember a joke; a repeat moves to the most-recent end
    pub fn record_seen(&mut self, joke_id: JokeId) {
        if let Some(pos) = self.seen.iter().position(|id| *id == joke_id) {
            self.seen.remove(pos);
        }
        self.seen.push_back(joke_id);
        while self.seen.len() > SEEN_LOOKBACK {
            self.seen.pop_front();
        }
    }

    /// Seen ids, oldest first
    pub fn seen_ids(&self) -> impl Iterator<Item = JokeId> + '_ {
        self.seen.iter().copied()
    }

    /// Ids the next fetch should avoid
    pub fn exclusion_set(&self) -> HashSet<JokeId> {
        self.seen.iter().copied().collect()
    }

    /// Next 1-based record sequence number
    pub fn next_sequence(&mut self) -> u32 {
        self.sequence += 1;
        self.sequence
    }

    /// Fold a revealed analysis into the tallies
    pub fn record_outcome(&mut self, analysis: &AnalysisResult) {
        if analysis.is_triumph {
            self.triumphs += 1;
        } else {
            self.defeats += 1;
        }
        self.confidence_sum += analysis.confidence;
        self.similarity_sum += analysis.similarity;
        self.latency_sum_ms += analysis.latency_ms;
    }

    pub fn triumphs(&self) -> u32 {
        self.triumphs
    }

    pub fn defeats(&self) -> u32 {
        self.defeats
    }

    pub fn jokes_performed(&self) -> u32 {
        self.triumphs + self.defeats
    }

    pub fn stats(&self) -> SessionStats {
        let performed = self.jokes_performed();
        let mean = |sum: f64| {
            if performed == 0 {
                0.0
            } else {
                sum / performed as f64
            }
        };

        SessionStats {
            session_id: self.id.clone(),
            jokes_performed: performed,
            triumphs: self.triumphs,
            defeats: self.defeats,
            triumph_rate: triumph_rate(self.triumphs, performed),
            average_confidence: mean(self.confidence_sum),
            average_similarity: mean(self.similarity_sum),
            average_latency_ms: mean(self.latency_sum_ms as f64),
            started_at: self.started_at,
        }
    }
}

/// Triumph percentage rounded to one decimal; 0 when nothing was performed
pub fn triumph_rate(triumphs: u32, performed: u32) -> f64 {
    if performed == 0 {
        return 0.0;
    }
    (triumphs as f64 / performed as f64 * 1000.0).round() / 10.0
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
