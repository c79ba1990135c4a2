//! Cancellable waits
//!
//! Every await in the performance loop goes through one of these so that
//! `stop` is observed at the next await point. `None` means cancelled.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = fut => Some(output),
    }
}

pub(crate) async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> Option<()> {
    until_cancelled(cancel, tokio::time::sleep(duration)).await
}
