//! Observable stage state
//!
//! Everything a presentation layer needs to draw the stage lives in one
//! [`StageSnapshot`], published through a `tokio::sync::watch` channel.

use crate::session::SessionStats;
use jester_common::events::{Overlay, OverlayKind};
use jester_common::{AnalysisResult, Joke, PerformanceState};
use serde::Serialize;

/// Shown while waiting for the joke source to come back
pub const NETWORK_LOST_MESSAGE: &str = "The courier was lost on the road...";

/// Idle network overlay text
pub const NETWORK_IDLE_MESSAGE: &str = "Searching for a path to the server...";

/// Idle speechless overlay text
pub const SPEECHLESS_IDLE_MESSAGE: &str = "The Court's content policy has silenced this jest.";

/// Current stage values
#[derive(Debug, Clone, Serialize)]
pub struct StageSnapshot {
    pub state: PerformanceState,
    pub joke: Option<Joke>,
    pub analysis: Option<AnalysisResult>,
    /// Session id and running tallies
    pub stats: SessionStats,
    pub speechless: Overlay,
    pub network: Overlay,
    pub is_retrying: bool,
    pub retry_count: u32,
    pub is_running: bool,
}

impl StageSnapshot {
    pub fn new(stats: SessionStats) -> Self {
        Self {
            state: PerformanceState::Idle,
            joke: None,
            analysis: None,
            stats,
            speechless: Overlay::inactive(SPEECHLESS_IDLE_MESSAGE),
            network: Overlay::inactive(NETWORK_IDLE_MESSAGE),
            is_retrying: false,
            retry_count: 0,
            is_running: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.stats.session_id
    }

    pub fn triumphs(&self) -> u32 {
        self.stats.triumphs
    }

    pub fn defeats(&self) -> u32 {
        self.stats.defeats
    }

    pub fn overlay(&self, kind: OverlayKind) -> &Overlay {
        match kind {
            OverlayKind::Speechless => &self.speechless,
            OverlayKind::NetworkAwaiting => &self.network,
        }
    }

    pub(crate) fn overlay_mut(&mut self, kind: OverlayKind) -> &mut Overlay {
        match kind {
            OverlayKind::Speechless => &mut self.speechless,
            OverlayKind::NetworkAwaiting => &mut self.network,
        }
    }
}
