//! Act 1: FETCHING
//!
//! Obtain a joke the session has not seen recently

use super::waits::until_cancelled;
use super::Stage;
use crate::error::StageError;
use crate::session::PerformanceSession;
use chrono::Utc;
use jester_common::events::StageEvent;
use jester_common::{Joke, PerformanceState};
use tokio_util::sync::CancellationToken;
use tracing::info;

impl Stage {
    /// Act 1: FETCHING - `Ok(None)` when cancelled
    pub(super) async fn act_fetching(
        &self,
        session: &mut PerformanceSession,
        cancel: &CancellationToken,
    ) -> Result<Option<Joke>, StageError> {
        if self.enter(PerformanceState::Fetching, cancel).is_none() {
            return Ok(None);
        }

        let exclude_ids = session.exclusion_set();
        let Some(fetched) =
            until_cancelled(cancel, self.fetcher.fetch(self.config.safe_mode, &exclude_ids)).await
        else {
            return Ok(None);
        };
        let joke = fetched?;

        // Remembered before validation so a malformed joke is not served again
        session.record_seen(joke.id);
        joke.validate()?;

        info!(
            session_id = %session.id(),
            joke_id = joke.id,
            category = %joke.category,
            kind = %joke.kind,
            "Act 1: joke fetched"
        );

        self.snapshot.send_modify(|s| {
            s.joke = Some(joke.clone());
            s.analysis = None;
        });
        self.events.emit_lossy(StageEvent::JokeFetched {
            session_id: session.id().to_string(),
            joke_id: joke.id,
            category: joke.category.clone(),
            timestamp: Utc::now(),
        });

        Ok(Some(joke))
    }
}
