//! # Jester Common Library
//!
//! Shared code for the jester crates including:
//! - Joke, analysis and rating models
//! - Performance state machine states
//! - Event types (StageEvent enum) and the EventBus
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
pub use models::{
    AnalysisResult, Joke, JokeFlags, JokeId, JokeKind, PerformanceRecord, PerformanceState,
    Rating, TRIUMPH_THRESHOLD,
};
