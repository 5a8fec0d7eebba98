//! Interval scheduler.
//!
//! A single task waits on two sources, the interval timer and the
//! cancellation token. A tick runs to completion inside the select arm, so a
//! tick is never raced against cancellation and never overlaps another tick.
//! Firings that elapse while a tick is running are skipped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{ReceiverState, TickPipeline};

/// Drive `pipeline` every `period` until `token` is cancelled.
///
/// The first tick fires one full period after the call. On return the state
/// is published as [`ReceiverState::Stopped`].
pub(crate) async fn run_scheduler(
    period: Duration,
    token: CancellationToken,
    pipeline: TickPipeline,
    state: Arc<watch::Sender<ReceiverState>>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval = ?period, "Started processing metrics");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::info!("Receiver shutdown initiated");
                break;
            }
            _ = ticker.tick() => {
                pipeline.execute().await;
            }
        }
    }

    state.send_replace(ReceiverState::Stopped);
    tracing::info!("Receiver stopped");
}
