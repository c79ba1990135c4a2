//! In-memory performance store and leaderboard

use crate::error::StoreError;
use crate::session::triumph_rate;
use crate::types::PerformanceStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jester_common::PerformanceRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Leaderboard ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeaderboardSort {
    /// `triumphs * 100 + triumph_rate * 10`
    #[default]
    Score,
    Triumphs,
}

/// One ranked session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    pub session_id: String,
    pub total_jokes: u32,
    pub triumphs: u32,
    pub triumph_rate: f64,
    pub score: f64,
    /// Completion time of the session's latest performance
    pub completed_at: DateTime<Utc>,
}

/// Records kept before the oldest are pruned
pub const DEFAULT_MAX_RECORDS: usize = 10_000;

#[derive(Debug, Default)]
struct Records {
    /// Oldest first
    log: VecDeque<PerformanceRecord>,
    ids: HashSet<Uuid>,
}

/// Records kept in process memory; cloning shares the same storage
///
/// Holds at most `max_records`; saving beyond that drops the oldest.
#[derive(Debug, Clone)]
pub struct InMemoryPerformanceStore {
    records: Arc<RwLock<Records>>,
    max_records: usize,
}

impl Default for InMemoryPerformanceStore {
    fn default() -> Self {
        Self::with_max_records(DEFAULT_MAX_RECORDS)
    }
}

impl InMemoryPerformanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(Records::default())),
            max_records: max_records.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.log.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.log.is_empty()
    }

    /// Records of one session in sequence order
    pub async fn session_records(&self, session_id: &str) -> Vec<PerformanceRecord> {
        let mut records: Vec<_> = self
            .records
            .read()
            .await
            .log
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.sequence_number);
        records
    }

    /// Top `top` sessions ranked by `sort`
    pub async fn leaderboard(&self, top: usize, sort: LeaderboardSort) -> Vec<LeaderboardEntry> {
        let records = self.records.read().await;

        let mut sessions: HashMap<&str, (u32, u32, DateTime<Utc>)> = HashMap::new();
        for record in records.log.iter() {
            let entry = sessions
                .entry(record.session_id.as_str())
                .or_insert((0, 0, record.completed_at));
            entry.0 += 1;
            if record.is_triumph() {
                entry.1 += 1;
            }
            entry.2 = entry.2.max(record.completed_at);
        }

        let mut entries: Vec<LeaderboardEntry> = sessions
            .into_iter()
            .map(|(session_id, (total_jokes, triumphs, completed_at))| {
                let rate = triumph_rate(triumphs, total_jokes);
                LeaderboardEntry {
                    rank: 0,
                    session_id: session_id.to_string(),
                    total_jokes,
                    triumphs,
                    triumph_rate: rate,
                    score: triumphs as f64 * 100.0 + rate * 10.0,
                    completed_at,
                }
            })
            .collect();

        match sort {
            LeaderboardSort::Score => {
                entries.sort_by(|a, b| b.score.total_cmp(&a.score).then(b.completed_at.cmp(&a.completed_at)))
            }
            LeaderboardSort::Triumphs => {
                entries.sort_by(|a, b| b.triumphs.cmp(&a.triumphs).then(b.score.total_cmp(&a.score)))
            }
        }

        entries.truncate(top);
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }
        entries
    }
}

#[async_trait]
impl PerformanceStore for InMemoryPerformanceStore {
    async fn save(&self, record: &PerformanceRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if !records.ids.insert(record.id) {
            return Err(StoreError(format!("Duplicate performance record {}", record.id)));
        }
        records.log.push_back(record.clone());

        while records.log.len() > self.max_records {
            if let Some(pruned) = records.log.pop_front() {
                records.ids.remove(&pruned.id);
            }
        }

        debug!(
            record_id = %record.id,
            session_id = %record.session_id,
            sequence = record.sequence_number,
            duration_ms = record.duration_ms(),
            "Performance recorded"
        );
        Ok(())
    }
}
