//! Act 3: SHOWING AI GUESS
//!
//! The predictor, the optional rating and the drumroll run concurrently.
//! A content policy rejection surfaces as `StageError::ContentPolicy` and is
//! handled by the loop's recovery path.

use super::messages::guess_line;
use super::waits::{sleep_or_cancel, until_cancelled};
use super::Stage;
use crate::error::StageError;
use crate::session::PerformanceSession;
use crate::types::EffectKind;
use chrono::{DateTime, Utc};
use jester_common::events::StageEvent;
use jester_common::{AnalysisResult, Joke, PerformanceRecord, PerformanceState};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

impl Stage {
    /// Act 3: SHOWING AI GUESS - `Ok(None)` when cancelled
    pub(super) async fn act_guess(
        &self,
        joke: &Joke,
        session: &mut PerformanceSession,
        started_at: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Option<AnalysisResult>, StageError> {
        if self.enter(PerformanceState::ShowingAiGuess, cancel).is_none() {
            return Ok(None);
        }

        let timings = &self.config.timings;
        let drumroll = if self.config.audio_enabled {
            timings.drumroll()
        } else {
            Duration::ZERO
        };
        self.cue(
            EffectKind::Drumroll,
            Some(drumroll),
            self.config.effects.drumroll_volume,
        );

        let predictor = &self.cast.predictor;
        let guessing = async {
            let clock = Instant::now();
            let prediction = predictor.predict(joke.display_text()).await;
            (prediction, clock.elapsed())
        };
        let work = async {
            let (guess, rating, ()) =
                tokio::join!(guessing, predictor.rate(joke), tokio::time::sleep(drumroll));
            (guess, rating)
        };

        let Some(((prediction, latency), rating)) = until_cancelled(cancel, work).await else {
            return Ok(None);
        };
        let prediction = prediction.map_err(|e| StageError::from_predictor(e, joke.id))?;

        let rating = match rating {
            Ok(rating) => rating,
            Err(e) => {
                warn!(joke_id = joke.id, error = %e, "Rating failed, continuing without one");
                None
            }
        };

        if prediction.is_content_filtered() {
            warn!(joke_id = joke.id, "Predictor returned a content-filter fallback");
        }

        let similarity = self.scorer.score(joke.expected_punchline(), &prediction.text);
        let analysis = AnalysisResult::new(
            joke.clone(),
            prediction.text.clone(),
            prediction.confidence(),
            similarity.score,
            prediction.is_content_filtered(),
            latency.as_millis() as u64,
        )
        .with_rating(rating);

        info!(
            session_id = %session.id(),
            joke_id = joke.id,
            similarity = analysis.similarity,
            exact_match = similarity.is_exact_match,
            is_triumph = analysis.is_triumph,
            latency_ms = analysis.latency_ms,
            "Act 3: guess analyzed"
        );

        self.snapshot.send_modify(|s| s.analysis = Some(analysis.clone()));
        self.events.emit_lossy(StageEvent::GuessAnalyzed {
            session_id: session.id().to_string(),
            joke_id: joke.id,
            predicted_punchline: analysis.predicted_punchline.clone(),
            similarity: analysis.similarity,
            confidence: analysis.confidence,
            is_triumph: analysis.is_triumph,
            timestamp: Utc::now(),
        });

        let sequence = session.next_sequence();
        let record = PerformanceRecord::new(session.id(), sequence, analysis.clone(), started_at);
        if let Some(Err(e)) = until_cancelled(cancel, self.cast.store.save(&record)).await {
            warn!(record_id = %record.id, error = %e, "Failed to save performance record");
        }

        self.narrate(guess_line(&analysis.predicted_punchline), self.config.speech.guess);

        if sleep_or_cancel(cancel, timings.guess_hold()).await.is_none() {
            return Ok(None);
        }
        Ok(Some(analysis))
    }
}
