//! Bounded retry against repeat jokes
//!
//! Wraps a [`JokeSource`] and keeps asking until it yields a joke whose id is
//! not excluded. After [`MAX_FETCH_ATTEMPTS`] misses one last fetch is made
//! without any exclusion and returned as-is, duplicate or not.

use crate::error::SourceError;
use crate::types::JokeSource;
use jester_common::{Joke, JokeId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Constrained attempts before the unconstrained fallback fetch
pub const MAX_FETCH_ATTEMPTS: usize = 5;

/// Joke fetcher with duplicate avoidance
#[derive(Clone)]
pub struct FetchRetryCoordinator {
    source: Arc<dyn JokeSource>,
    max_attempts: usize,
}

impl FetchRetryCoordinator {
    pub fn new(source: Arc<dyn JokeSource>) -> Self {
        Self {
            source,
            max_attempts: MAX_FETCH_ATTEMPTS,
        }
    }

    /// Fetch a joke, avoiding `exclude_ids` where possible
    ///
    /// An empty exclusion set accepts the first result. Transport errors are
    /// returned unchanged on the first occurrence.
    pub async fn fetch(
        &self,
        safe_mode: bool,
        exclude_ids: &HashSet<JokeId>,
    ) -> Result<Joke, SourceError> {
        if exclude_ids.is_empty() {
            return self.source.fetch(safe_mode, None).await;
        }

        for attempt in 1..=self.max_attempts {
            let joke = self.source.fetch(safe_mode, Some(exclude_ids)).await?;
            if !exclude_ids.contains(&joke.id) {
                return Ok(joke);
            }
            debug!(joke_id = joke.id, attempt, "Source returned a seen joke, retrying");
        }

        warn!(
            attempts = self.max_attempts,
            excluded = exclude_ids.len(),
            "No fresh joke found, accepting a repeat"
        );
        self.source.fetch(safe_mode, None).await
    }
}
