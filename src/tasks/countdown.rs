//! Countdown background task

use std::time::Duration;

use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Drive `on_tick` once per `period` until it returns false or `cancel` fires.
///
/// The first tick happens one full period after the task starts.
pub async fn countdown_task<F>(period: Duration, cancel: CancellationToken, mut on_tick: F)
where
    F: FnMut() -> bool,
{
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Countdown cancelled");
                break;
            }
            _ = interval.tick() => {
                if !on_tick() {
                    debug!("Countdown finished");
                    break;
                }
            }
        }
    }
}
