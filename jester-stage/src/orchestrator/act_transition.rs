//! Act 5: TRANSITIONING

use super::waits::sleep_or_cancel;
use super::Stage;
use jester_common::PerformanceState;
use tokio_util::sync::CancellationToken;

impl Stage {
    /// Act 5: TRANSITIONING - short pause before the next joke
    pub(super) async fn act_transition(&self, cancel: &CancellationToken) -> Option<()> {
        self.enter(PerformanceState::Transitioning, cancel)?;
        sleep_or_cancel(cancel, self.config.timings.transition_pause()).await
    }
}
