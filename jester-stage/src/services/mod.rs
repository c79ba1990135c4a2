//! Collaborator implementations
//!
//! - [`JokeApiClient`]: JokeAPI v2 over HTTP
//! - [`CannedJokeSource`]: offline joke deck
//! - [`MockPredictor`]: canned punchline guesses
//! - [`LoggingNarrator`] / [`LoggingEffectPlayer`]: log-only speech and sound cues
//! - [`InMemoryPerformanceStore`]: performance records and leaderboard

pub mod canned_source;
pub mod joke_api_client;
pub mod logging_effects;
pub mod memory_store;
pub mod mock_predictor;

pub use canned_source::CannedJokeSource;
pub use joke_api_client::JokeApiClient;
pub use logging_effects::{LoggingEffectPlayer, LoggingNarrator};
pub use memory_store::{InMemoryPerformanceStore, LeaderboardEntry, LeaderboardSort};
pub use mock_predictor::MockPredictor;
