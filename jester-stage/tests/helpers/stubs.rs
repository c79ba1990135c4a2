//! Collaborator stubs with call recording

use async_trait::async_trait;
use jester_common::config::Voice;
use jester_common::{Joke, JokeId, PerformanceRecord};
use jester_stage::error::{EffectError, PredictorError, SourceError, StoreError};
use jester_stage::types::{
    EffectCue, EffectKind, EffectPlayer, FinishReason, JokeSource, Narrator, PerformanceStore,
    Prediction, PunchlinePredictor,
};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Every generated joke has this punchline
pub const PUNCHLINE: &str = "An impasta.";

pub fn joke(id: JokeId) -> Joke {
    Joke::two_part(id, "Pun", format!("What do you call fake noodle #{}?", id), PUNCHLINE)
}

// ============================================================================
// Joke sources
// ============================================================================

/// Serves scripted results first, then fresh jokes with increasing ids
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Joke, SourceError>>>,
    next_id: AtomicU32,
    calls: AtomicUsize,
    exclusions: Mutex<Vec<Option<usize>>>,
}

impl ScriptedSource {
    pub fn fresh() -> Self {
        Self {
            next_id: AtomicU32::new(1),
            ..Default::default()
        }
    }

    pub fn with_script(script: Vec<Result<Joke, SourceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            next_id: AtomicU32::new(1000),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Size of the exclusion set passed on each call (`None` = unconstrained)
    pub fn exclusion_sizes(&self) -> Vec<Option<usize>> {
        self.exclusions.lock().unwrap().clone()
    }
}

#[async_trait]
impl JokeSource for ScriptedSource {
    async fn fetch(
        &self,
        _safe_mode: bool,
        exclude_ids: Option<&HashSet<JokeId>>,
    ) -> Result<Joke, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.exclusions
            .lock()
            .unwrap()
            .push(exclude_ids.map(|ids| ids.len()));

        if let Some(scripted) = self.script.lock().unwrap().pop_front() {
            return scripted;
        }
        Ok(joke(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Always returns the same joke id
pub struct FixedSource {
    id: JokeId,
    calls: AtomicUsize,
    constrained_calls: AtomicUsize,
}

impl FixedSource {
    pub fn new(id: JokeId) -> Self {
        Self {
            id,
            calls: AtomicUsize::new(0),
            constrained_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn constrained_calls(&self) -> usize {
        self.constrained_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JokeSource for FixedSource {
    async fn fetch(
        &self,
        _safe_mode: bool,
        exclude_ids: Option<&HashSet<JokeId>>,
    ) -> Result<Joke, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if exclude_ids.is_some() {
            self.constrained_calls.fetch_add(1, Ordering::SeqCst);
        }
        Ok(joke(self.id))
    }
}

// ============================================================================
// Predictors
// ============================================================================

pub enum Answer {
    Text(&'static str, FinishReason),
    Refuse(Option<&'static str>),
    Fail,
}

/// Gives the same answer for every setup
pub struct StubPredictor {
    answer: Answer,
    calls: AtomicUsize,
}

impl StubPredictor {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    /// Exact punchline: always a triumph
    pub fn sharp() -> Self {
        Self::new(Answer::Text(PUNCHLINE, FinishReason::Stop))
    }

    /// Unrelated text: always a defeat
    pub fn dull() -> Self {
        Self::new(Answer::Text("Because the moon is made of cheese", FinishReason::Stop))
    }

    pub fn refusing(category: Option<&'static str>) -> Self {
        Self::new(Answer::Refuse(category))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PunchlinePredictor for StubPredictor {
    async fn predict(&self, _setup: &str) -> Result<Prediction, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Answer::Text(text, finish) => Ok(Prediction::new(*text, *finish)),
            Answer::Refuse(category) => Err(PredictorError::ContentPolicy {
                category: category.map(str::to_string),
            }),
            Answer::Fail => Err(PredictorError::Failed("model unavailable".to_string())),
        }
    }
}

/// Panics on the first call, then answers with the exact punchline
#[derive(Default)]
pub struct PanicOncePredictor {
    calls: AtomicUsize,
}

impl PanicOncePredictor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PunchlinePredictor for PanicOncePredictor {
    async fn predict(&self, _setup: &str) -> Result<Prediction, PredictorError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("predictor lost its marbles");
        }
        Ok(Prediction::new(PUNCHLINE, FinishReason::Stop))
    }
}

// ============================================================================
// Side effects
// ============================================================================

#[derive(Default)]
pub struct RecordingNarrator {
    lines: Mutex<Vec<String>>,
    stops: AtomicUsize,
}

impl RecordingNarrator {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Narrator for RecordingNarrator {
    async fn speak(&self, text: &str, _voice: Voice) -> Result<(), EffectError> {
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn stop(&self) -> Result<(), EffectError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEffects {
    played: Mutex<Vec<EffectKind>>,
}

impl RecordingEffects {
    pub fn played(&self) -> Vec<EffectKind> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl EffectPlayer for RecordingEffects {
    async fn play(&self, cue: EffectCue) -> Result<(), EffectError> {
        self.played.lock().unwrap().push(cue.kind);
        Ok(())
    }
}

/// Store that rejects every record
pub struct FailingStore;

#[async_trait]
impl PerformanceStore for FailingStore {
    async fn save(&self, _record: &PerformanceRecord) -> Result<(), StoreError> {
        Err(StoreError("disk full".to_string()))
    }
}
