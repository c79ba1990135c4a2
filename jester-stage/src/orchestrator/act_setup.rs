//! Act 2: SHOWING SETUP

use super::waits::sleep_or_cancel;
use super::Stage;
use jester_common::{Joke, PerformanceState};
use tokio_util::sync::CancellationToken;

impl Stage {
    /// Act 2: SHOWING SETUP - narrate the setup and hold it on stage
    pub(super) async fn act_setup(&self, joke: &Joke, cancel: &CancellationToken) -> Option<()> {
        self.enter(PerformanceState::ShowingSetup, cancel)?;
        self.narrate(joke.display_text().to_string(), self.config.speech.setup);
        sleep_or_cancel(cancel, self.config.timings.setup_dwell()).await
    }
}
