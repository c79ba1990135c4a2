//! Data model shared by the performance loop and its collaborators

mod analysis;
mod joke;
mod record;
mod state;

pub use analysis::{AnalysisResult, Rating, TRIUMPH_THRESHOLD};
pub use joke::{Joke, JokeFlags, JokeId, JokeKind, MAX_SETUP_LEN, MAX_SINGLE_LEN};
pub use record::PerformanceRecord;
pub use state::PerformanceState;
