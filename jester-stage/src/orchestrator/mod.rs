//! Five-act performance orchestrator
//!
//! # State Progression
//! Idle → Fetching → ShowingSetup → ShowingAiGuess → RevealingPunchline → Transitioning → Fetching → …
//!
//! # Architecture
//! One spawned task drives the loop and owns the [`PerformanceSession`] for
//! as long as it runs; the session is handed back through the task's
//! `JoinHandle` when the loop exits. Each act is an `act_*` method in its own
//! file. Observable values are published through a `watch` channel
//! ([`StageSnapshot`]) and every mutation also emits a [`StageEvent`] on the
//! [`EventBus`].
//!
//! Failures never end the loop (a panicking collaborator counts as an
//! unclassified failure):
//! - transport failure raises the NetworkAwaiting overlay and waits for
//!   [`PerformanceOrchestrator::retry_network`] (or the configured auto retry)
//! - content policy rejection raises the Speechless overlay, waits for
//!   [`PerformanceOrchestrator::resume_speechless`], then abandons the joke
//! - anything else backs off for `timings.failure_backoff_ms`
//!
//! Cancellation is cooperative: every await inside the loop races the
//! session's `CancellationToken`.

use crate::error::{FailureClass, StageError};
use crate::fetch::FetchRetryCoordinator;
use crate::scorer::SimilarityScorer;
use crate::session::{PerformanceSession, SessionStats};
use crate::types::{EffectCue, EffectKind, EffectPlayer, JokeSource, Narrator, PerformanceStore, PunchlinePredictor};
use chrono::Utc;
use futures::FutureExt;
use jester_common::config::{StageConfig, Voice};
use jester_common::events::{EventBus, OverlayKind, StageEvent};
use jester_common::PerformanceState;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

mod act_fetching;
mod act_guess;
mod act_reveal;
mod act_setup;
mod act_transition;
mod messages;
mod snapshot;
mod waits;

pub use messages::{speechless_message, SPEECHLESS_UNCATEGORIZED};
pub use snapshot::{StageSnapshot, NETWORK_IDLE_MESSAGE, NETWORK_LOST_MESSAGE, SPEECHLESS_IDLE_MESSAGE};

use waits::sleep_or_cancel;

/// Collaborators consumed by the performance loop
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn JokeSource>,
    pub predictor: Arc<dyn PunchlinePredictor>,
    pub narrator: Arc<dyn Narrator>,
    pub effects: Arc<dyn EffectPlayer>,
    pub store: Arc<dyn PerformanceStore>,
}

/// Ownership of the session between runs
enum Runner {
    Parked(PerformanceSession),
    Running {
        handle: JoinHandle<PerformanceSession>,
        cancel: CancellationToken,
    },
    /// Only observed while the runner lock is held
    Vacant,
}

/// Drives the five-act performance cycle
pub struct PerformanceOrchestrator {
    stage: Arc<Stage>,
    runner: Mutex<Runner>,
}

impl PerformanceOrchestrator {
    pub fn new(config: StageConfig, cast: Collaborators, events: EventBus) -> Self {
        let session = PerformanceSession::new();
        let (snapshot, _) = watch::channel(StageSnapshot::new(session.stats()));

        let stage = Stage {
            fetcher: FetchRetryCoordinator::new(Arc::clone(&cast.source)),
            scorer: SimilarityScorer::new(),
            config,
            cast,
            events,
            snapshot,
        };

        Self {
            stage: Arc::new(stage),
            runner: Mutex::new(Runner::Parked(session)),
        }
    }

    /// Begin performing; returns `false` if a loop is already running
    pub async fn start(&self) -> bool {
        let mut runner = self.runner.lock().await;
        if let Runner::Running { cancel, .. } = &*runner {
            if !cancel.is_cancelled() {
                debug!("Start ignored, performance already running");
                return false;
            }
            // A stop was abandoned before the loop handed its session back
            self.reclaim(&mut runner).await;
        }

        if self.stage.config.audio_enabled {
            if let Err(e) = self.stage.cast.effects.initialize().await {
                warn!(error = %e, "Sound effects unavailable");
            }
        }

        let session = match std::mem::replace(&mut *runner, Runner::Vacant) {
            Runner::Parked(session) => session,
            _ => PerformanceSession::new(),
        };

        info!(
            session_id = %session.id(),
            safe_mode = self.stage.config.safe_mode,
            audio_enabled = self.stage.config.audio_enabled,
            "Starting performance"
        );

        self.stage.snapshot.send_modify(|s| {
            s.is_running = true;
            s.stats = session.stats();
        });

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Arc::clone(&self.stage).run(session, cancel.clone()));
        *runner = Runner::Running { handle, cancel };
        true
    }

    /// Stop performing and wait for the loop to exit
    ///
    /// State is Idle when this returns and no further events are emitted by
    /// the loop. Stopping an idle orchestrator does nothing.
    ///
    /// Cancel safe: if this future is dropped early the loop still winds
    /// down, and the next `stop` or `start` parks its session.
    pub async fn stop(&self) {
        let mut runner = self.runner.lock().await;
        let Runner::Running { cancel, .. } = &*runner else {
            return;
        };

        cancel.cancel();
        if let Err(e) = self.stage.cast.narrator.stop().await {
            warn!(error = %e, "Failed to halt narration");
        }

        self.reclaim(&mut runner).await;
    }

    /// Wait for a cancelled loop to return its session, then park it
    ///
    /// The runner stays `Running` until the join completes.
    async fn reclaim(&self, runner: &mut Runner) {
        let Runner::Running { handle, .. } = runner else {
            return;
        };

        let session = match handle.await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Performance loop aborted, starting a fresh session");
                PerformanceSession::new()
            }
        };

        self.stage.park(&session);
        *runner = Runner::Parked(session);
    }

    /// Clear the Speechless overlay so the loop moves on to the next joke
    pub fn resume_speechless(&self) {
        if self.stage.set_overlay(OverlayKind::Speechless, false, None) {
            info!("Speechless overlay dismissed");
        }
    }

    /// Manual network retry
    ///
    /// Marks a retry in progress, waits `timings.retry_settle_ms`, then clears
    /// the NetworkAwaiting overlay so the Fetching act runs again.
    pub async fn retry_network(&self) {
        let cancel = match &*self.runner.lock().await {
            Runner::Running { cancel, .. } => cancel.clone(),
            _ => CancellationToken::new(),
        };

        let mut retry_count = 0;
        self.stage.snapshot.send_modify(|s| {
            s.is_retrying = true;
            s.retry_count += 1;
            retry_count = s.retry_count;
        });
        self.stage.emit_retry_progress(true, retry_count);
        info!(retry_count, "Retrying network");

        if sleep_or_cancel(&cancel, self.stage.config.timings.retry_settle())
            .await
            .is_none()
        {
            return;
        }

        self.stage.snapshot.send_modify(|s| s.is_retrying = false);
        self.stage.emit_retry_progress(false, retry_count);
        self.stage.set_overlay(OverlayKind::NetworkAwaiting, false, None);
    }

    /// Discard the session (id, seen-list, tallies) and begin a fresh one
    ///
    /// # Errors
    /// `StageError::SessionBusy` while a performance is running.
    pub async fn clear_session(&self) -> Result<(), StageError> {
        let mut runner = self.runner.lock().await;
        if matches!(*runner, Runner::Running { .. }) {
            return Err(StageError::SessionBusy);
        }

        let session = PerformanceSession::new();
        let old_session_id = self.stage.session_id();
        self.stage.snapshot.send_modify(|s| {
            s.stats = session.stats();
            s.joke = None;
            s.analysis = None;
            s.retry_count = 0;
        });

        info!(old_session_id = %old_session_id, new_session_id = %session.id(), "Session cleared");
        self.stage.events.emit_lossy(StageEvent::SessionCleared {
            old_session_id,
            new_session_id: session.id().to_string(),
            timestamp: Utc::now(),
        });

        *runner = Runner::Parked(session);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.stage.snapshot.borrow().is_running
    }

    pub fn state(&self) -> PerformanceState {
        self.stage.snapshot.borrow().state
    }

    /// Copy of the current stage values
    pub fn snapshot(&self) -> StageSnapshot {
        self.stage.snapshot.borrow().clone()
    }

    /// Receiver that always holds the latest snapshot
    pub fn watch(&self) -> watch::Receiver<StageSnapshot> {
        self.stage.snapshot.subscribe()
    }

    /// Subscribe to stage events
    pub fn subscribe(&self) -> broadcast::Receiver<StageEvent> {
        self.stage.events.subscribe()
    }

    pub fn session_stats(&self) -> SessionStats {
        self.stage.snapshot.borrow().stats.clone()
    }
}

/// State shared by the control surface and the loop task
struct Stage {
    config: StageConfig,
    cast: Collaborators,
    fetcher: FetchRetryCoordinator,
    scorer: SimilarityScorer,
    events: EventBus,
    snapshot: watch::Sender<StageSnapshot>,
}

impl Stage {
    async fn run(
        self: Arc<Self>,
        mut session: PerformanceSession,
        cancel: CancellationToken,
    ) -> PerformanceSession {
        while !cancel.is_cancelled() {
            let cycle = AssertUnwindSafe(self.perform_cycle(&mut session, &cancel)).catch_unwind();
            let outcome = match cycle.await {
                Ok(outcome) => outcome,
                Err(payload) => Err(StageError::from_panic(payload)),
            };
            if let Err(err) = outcome {
                self.recover(err, &cancel).await;
            }
        }

        info!(
            session_id = %session.id(),
            triumphs = session.triumphs(),
            defeats = session.defeats(),
            "Performance loop exited"
        );
        session
    }

    /// One pass through the five acts; `Ok` also covers cancellation
    async fn perform_cycle(
        &self,
        session: &mut PerformanceSession,
        cancel: &CancellationToken,
    ) -> Result<(), StageError> {
        let started_at = Utc::now();

        let Some(joke) = self.act_fetching(session, cancel).await? else {
            return Ok(());
        };
        if self.act_setup(&joke, cancel).await.is_none() {
            return Ok(());
        }
        let Some(analysis) = self.act_guess(&joke, session, started_at, cancel).await? else {
            return Ok(());
        };
        if self.act_reveal(&analysis, session, cancel).await.is_none() {
            return Ok(());
        }
        self.act_transition(cancel).await;
        Ok(())
    }

    async fn recover(&self, err: StageError, cancel: &CancellationToken) {
        match err.class() {
            FailureClass::Transport => {
                warn!(error = %err, "Joke source unreachable, awaiting network");
                self.await_network(cancel).await;
            }
            FailureClass::ContentPolicy => {
                let message = speechless_message(err.filter_category());
                warn!(error = %err, category = ?err.filter_category(), "Jester silenced");
                self.await_speechless(message, cancel).await;
            }
            FailureClass::Unclassified => {
                error!(error = %err, "Performance cycle failed, backing off");
                sleep_or_cancel(cancel, self.config.timings.failure_backoff()).await;
            }
        }
    }

    async fn await_network(&self, cancel: &CancellationToken) {
        self.set_overlay(OverlayKind::NetworkAwaiting, true, Some(NETWORK_LOST_MESSAGE));

        let cleared = overlay_cleared(self.snapshot.subscribe(), OverlayKind::NetworkAwaiting);
        let auto_retry = async {
            match self.config.network_auto_retry() {
                Some(after) => tokio::time::sleep(after).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = cleared => {
                info!("Network overlay cleared, fetching again");
            }
            _ = auto_retry => {
                info!("Automatic network retry");
                self.set_overlay(OverlayKind::NetworkAwaiting, false, None);
            }
        }
    }

    async fn await_speechless(&self, message: &str, cancel: &CancellationToken) {
        self.set_overlay(OverlayKind::Speechless, true, Some(message));

        let cleared = overlay_cleared(self.snapshot.subscribe(), OverlayKind::Speechless);
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = cleared => {
                debug!("Speechless overlay cleared, abandoning joke");
            }
        }
    }

    /// Enter `state` unless cancelled
    fn enter(&self, state: PerformanceState, cancel: &CancellationToken) -> Option<()> {
        if cancel.is_cancelled() {
            return None;
        }
        self.set_state(state);
        Some(())
    }

    fn set_state(&self, new_state: PerformanceState) {
        let mut old_state = new_state;
        let changed = self.snapshot.send_if_modified(|s| {
            old_state = s.state;
            s.state = new_state;
            old_state != new_state
        });

        if changed {
            debug!(from = %old_state, to = %new_state, act = ?new_state.act(), "State changed");
            self.events.emit_lossy(StageEvent::StateChanged {
                session_id: self.session_id(),
                old_state,
                new_state,
                timestamp: Utc::now(),
            });
        }
    }

    /// Raise or clear an overlay; returns whether anything changed
    fn set_overlay(&self, kind: OverlayKind, active: bool, message: Option<&str>) -> bool {
        let mut shown = String::new();
        let changed = self.snapshot.send_if_modified(|s| {
            let overlay = s.overlay_mut(kind);
            let mut modified = overlay.active != active;
            if let Some(message) = message {
                modified |= overlay.message != message;
                overlay.message = message.to_string();
            }
            overlay.active = active;
            shown = overlay.message.clone();
            modified
        });

        if changed {
            self.events.emit_lossy(StageEvent::OverlayChanged {
                session_id: self.session_id(),
                overlay: kind,
                active,
                message: shown,
                timestamp: Utc::now(),
            });
        }
        changed
    }

    fn emit_retry_progress(&self, is_retrying: bool, retry_count: u32) {
        self.events.emit_lossy(StageEvent::RetryProgress {
            session_id: self.session_id(),
            is_retrying,
            retry_count,
            timestamp: Utc::now(),
        });
    }

    fn session_id(&self) -> String {
        self.snapshot.borrow().session_id().to_string()
    }

    /// Force the stopped shape: overlays down, Idle, not running
    fn park(&self, session: &PerformanceSession) {
        self.set_overlay(OverlayKind::Speechless, false, None);
        self.set_overlay(OverlayKind::NetworkAwaiting, false, None);
        self.snapshot.send_modify(|s| {
            s.is_running = false;
            s.is_retrying = false;
            s.stats = session.stats();
        });
        self.set_state(PerformanceState::Idle);

        info!(
            session_id = %session.id(),
            triumphs = session.triumphs(),
            defeats = session.defeats(),
            "Performance stopped"
        );
        self.events.emit_lossy(StageEvent::Stopped {
            session_id: session.id().to_string(),
            triumphs: session.triumphs(),
            defeats: session.defeats(),
            timestamp: Utc::now(),
        });
    }

    /// Fire-and-forget narration
    fn narrate(&self, text: String, voice: Voice) {
        if !self.config.audio_enabled {
            return;
        }
        let narrator = Arc::clone(&self.cast.narrator);
        tokio::spawn(async move {
            if let Err(e) = narrator.speak(&text, voice).await {
                warn!(error = %e, "Narration failed");
            }
        });
    }

    /// Fire-and-forget sound cue
    fn cue(&self, kind: EffectKind, duration: Option<Duration>, volume: f32) {
        if !self.config.audio_enabled {
            return;
        }
        let effects = Arc::clone(&self.cast.effects);
        tokio::spawn(async move {
            let cue = EffectCue { kind, duration, volume };
            if let Err(e) = effects.play(cue).await {
                warn!(error = %e, effect = ?kind, "Sound cue failed");
            }
        });
    }
}

/// Resolves once `kind` is no longer active
async fn overlay_cleared(mut rx: watch::Receiver<StageSnapshot>, kind: OverlayKind) {
    let _ = rx.wait_for(|s| !s.overlay(kind).active).await.map(|_| ());
}
