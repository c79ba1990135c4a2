//! jester-stage library interface
//!
//! A jester performs jokes in five acts while a predictor tries to guess each
//! punchline. Exposes the orchestrator, its collaborator traits and the
//! bundled collaborator implementations.

pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod scorer;
pub mod services;
pub mod session;
pub mod types;

pub use crate::error::{FailureClass, StageError};
pub use crate::orchestrator::{Collaborators, PerformanceOrchestrator, StageSnapshot};
pub use crate::scorer::{Similarity, SimilarityScorer};
pub use crate::session::{PerformanceSession, SessionStats};

/// Build identification captured by build.rs
pub fn build_info() -> String {
    format!(
        "{} ({}, {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    )
}
