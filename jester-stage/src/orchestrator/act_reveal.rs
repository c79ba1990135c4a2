//! Act 4: REVEALING PUNCHLINE
//!
//! Classify the guess, update the session tallies and play the matching cue

use super::messages::reveal_line;
use super::waits::sleep_or_cancel;
use super::Stage;
use crate::session::PerformanceSession;
use crate::types::EffectKind;
use chrono::Utc;
use jester_common::events::StageEvent;
use jester_common::{AnalysisResult, PerformanceState};
use tokio_util::sync::CancellationToken;
use tracing::info;

impl Stage {
    /// Act 4: REVEALING PUNCHLINE - `None` when cancelled
    pub(super) async fn act_reveal(
        &self,
        analysis: &AnalysisResult,
        session: &mut PerformanceSession,
        cancel: &CancellationToken,
    ) -> Option<()> {
        self.enter(PerformanceState::RevealingPunchline, cancel)?;

        session.record_outcome(analysis);
        let stats = session.stats();
        self.snapshot.send_modify(|s| s.stats = stats);

        info!(
            session_id = %session.id(),
            joke_id = analysis.joke.id,
            is_triumph = analysis.is_triumph,
            triumphs = session.triumphs(),
            defeats = session.defeats(),
            "Act 4: punchline revealed"
        );
        self.events.emit_lossy(StageEvent::Revealed {
            session_id: session.id().to_string(),
            joke_id: analysis.joke.id,
            is_triumph: analysis.is_triumph,
            triumphs: session.triumphs(),
            defeats: session.defeats(),
            timestamp: Utc::now(),
        });

        let effects = &self.config.effects;
        if analysis.is_triumph {
            self.cue(EffectKind::Fanfare, None, effects.fanfare_volume);
        } else {
            self.cue(EffectKind::Trombone, None, effects.trombone_volume);
        }

        let timings = &self.config.timings;
        sleep_or_cancel(cancel, timings.reveal_narration_delay()).await?;
        self.narrate(
            reveal_line(analysis.joke.expected_punchline()),
            self.config.speech.reveal,
        );
        sleep_or_cancel(cancel, timings.reveal_dwell()).await
    }
}
