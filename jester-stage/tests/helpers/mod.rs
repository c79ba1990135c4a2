//! Test Helper Utilities
//!
//! Shared stubs and orchestrator wiring for jester-stage integration tests

#![allow(dead_code, unused_imports)]

pub mod stage;
pub mod stubs;

pub use stage::{
    build_stage, build_stage_with_store, collect_until, drain, fast_config, wait_for_snapshot,
    TestStage, TEST_TIMEOUT,
};
pub use stubs::{
    joke, Answer, FailingStore, FixedSource, PanicOncePredictor, RecordingEffects, RecordingNarrator,
    ScriptedSource, StubPredictor, PUNCHLINE,
};
