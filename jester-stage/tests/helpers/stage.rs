//! Orchestrator wiring and event waiting for tests

use super::stubs::{RecordingEffects, RecordingNarrator};
use jester_common::config::{StageConfig, TimingConfig};
use jester_common::events::{EventBus, StageEvent};
use jester_stage::services::InMemoryPerformanceStore;
use jester_stage::types::{JokeSource, PerformanceStore, PunchlinePredictor};
use jester_stage::{Collaborators, PerformanceOrchestrator, StageSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Upper bound for any single wait in a test
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Config with 1 ms dwell, pause and backoff
pub fn fast_config() -> StageConfig {
    StageConfig {
        timings: TimingConfig::uniform(1),
        ..StageConfig::default()
    }
}

/// Orchestrator plus handles to its recording collaborators
pub struct TestStage {
    pub orchestrator: PerformanceOrchestrator,
    pub narrator: Arc<RecordingNarrator>,
    pub effects: Arc<RecordingEffects>,
    pub store: InMemoryPerformanceStore,
}

pub fn build_stage(
    config: StageConfig,
    source: Arc<dyn JokeSource>,
    predictor: Arc<dyn PunchlinePredictor>,
) -> TestStage {
    let store = InMemoryPerformanceStore::new();
    build_stage_with_store(config, source, predictor, Arc::new(store.clone()), store)
}

pub fn build_stage_with_store(
    config: StageConfig,
    source: Arc<dyn JokeSource>,
    predictor: Arc<dyn PunchlinePredictor>,
    store_impl: Arc<dyn PerformanceStore>,
    store: InMemoryPerformanceStore,
) -> TestStage {
    let narrator = Arc::new(RecordingNarrator::default());
    let effects = Arc::new(RecordingEffects::default());
    let cast = Collaborators {
        source,
        predictor,
        narrator: narrator.clone(),
        effects: effects.clone(),
        store: store_impl,
    };
    let events = EventBus::new(1024);

    TestStage {
        orchestrator: PerformanceOrchestrator::new(config, cast, events),
        narrator,
        effects,
        store,
    }
}

/// Receive events until one matches; returns everything received, match last
pub async fn collect_until<F>(rx: &mut broadcast::Receiver<StageEvent>, mut matches: F) -> Vec<StageEvent>
where
    F: FnMut(&StageEvent) -> bool,
{
    let mut seen = Vec::new();
    tokio::time::timeout(TEST_TIMEOUT, async {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let done = matches(&event);
                    seen.push(event);
                    if done {
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event");
    seen
}

/// Wait until the snapshot satisfies `condition`; returns a copy of it
pub async fn wait_for_snapshot<F>(rx: &mut watch::Receiver<StageSnapshot>, condition: F) -> StageSnapshot
where
    F: FnMut(&StageSnapshot) -> bool,
{
    tokio::time::timeout(TEST_TIMEOUT, rx.wait_for(condition))
        .await
        .expect("timed out waiting for snapshot")
        .map(|snapshot| snapshot.clone())
        .expect("snapshot channel closed")
}

/// Drain whatever is buffered without waiting
pub fn drain(rx: &mut broadcast::Receiver<StageEvent>) -> Vec<StageEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
