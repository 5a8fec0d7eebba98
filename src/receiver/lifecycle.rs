//! Receiver lifecycle.
//!
//! ```text
//! Created --start--> Started --shutdown--> ShuttingDown --(loop exits)--> Stopped
//! ```
//!
//! `Started` is only entered after the configuration has been validated.
//! `Stopped` is published by the background task once it has observed
//! cancellation, which may be after `shutdown` has returned.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::scheduler::run_scheduler;
use super::{ReceiverError, ReceiverStats, ScriptInvoker, StatsSnapshot, TickPipeline};
use crate::config::ReceiverConfig;
use crate::consumer::MetricsConsumer;

/// Default bound for [`ExecReceiver::wait_stopped`] used by the binary.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle state of a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Created,
    Started,
    ShuttingDown,
    Stopped,
}

impl std::fmt::Display for ReceiverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::ShuttingDown => "shutting_down",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Handle to the hosting process.
///
/// Accepted by [`ExecReceiver::start`] and only used to label log output.
#[derive(Debug, Clone)]
pub struct Host {
    component_id: String,
}

impl Host {
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
        }
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new("execreceiver")
    }
}

/// Periodic script-driven metrics receiver.
pub struct ExecReceiver {
    config: ReceiverConfig,
    consumer: Arc<dyn MetricsConsumer>,
    cancel: Option<CancellationToken>,
    state: Arc<watch::Sender<ReceiverState>>,
    stats: Arc<ReceiverStats>,
}

impl std::fmt::Debug for ExecReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecReceiver")
            .field("config", &self.config)
            .field("consumer", &self.consumer.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ExecReceiver {
    /// Create a receiver in the `Created` state. Nothing runs until [`start`](Self::start).
    pub fn new(config: ReceiverConfig, consumer: Arc<dyn MetricsConsumer>) -> Self {
        Self {
            config,
            consumer,
            cancel: None,
            state: Arc::new(watch::Sender::new(ReceiverState::Created)),
            stats: Arc::new(ReceiverStats::default()),
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReceiverState {
        *self.state.borrow()
    }

    /// Tick counters since construction.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Validate the configuration and spawn the scheduler task.
    ///
    /// Returns as soon as the task is spawned. The loop runs on its own root
    /// cancellation token: cancelling `_ctx` does not stop it, only
    /// [`shutdown`](Self::shutdown) does.
    ///
    /// # Errors
    /// - `ReceiverError::Config` if the interval or script is invalid; no task is spawned
    /// - `ReceiverError::InvalidState` if the receiver is not in `Created`
    pub async fn start(
        &mut self,
        _ctx: &CancellationToken,
        host: &Host,
    ) -> Result<(), ReceiverError> {
        let current = self.state();
        if current != ReceiverState::Created {
            return Err(ReceiverError::InvalidState(current));
        }

        tracing::info!(component = host.component_id(), "Starting exec receiver");

        let interval = self.config.validate().inspect_err(|e| {
            tracing::error!(
                component = host.component_id(),
                interval = %self.config.interval,
                script = %self.config.script.display(),
                error = %e,
                "Invalid receiver config"
            );
        })?;
        tracing::info!(interval = ?interval, "Interval parsed successfully");

        let token = CancellationToken::new();
        let pipeline = TickPipeline::new(
            ScriptInvoker::from_config(&self.config),
            Arc::clone(&self.consumer),
            Arc::clone(&self.stats),
        );

        self.state.send_replace(ReceiverState::Started);
        tokio::spawn(run_scheduler(
            interval,
            token.clone(),
            pipeline,
            Arc::clone(&self.state),
        ));
        self.cancel = Some(token);

        tracing::info!(
            component = host.component_id(),
            script = %self.config.script.display(),
            interpreter = %self.config.interpreter.display(),
            "Exec receiver started"
        );
        Ok(())
    }

    /// Signal the scheduler task to stop and return.
    ///
    /// Does not wait for a tick that is already running; use
    /// [`wait_stopped`](Self::wait_stopped) for that. Calling this before
    /// `start` or more than once is a no-op.
    pub async fn shutdown(&mut self, _ctx: &CancellationToken) -> Result<(), ReceiverError> {
        tracing::info!("Shutting down exec receiver");

        if let Some(token) = self.cancel.take() {
            self.state.send_if_modified(|state| {
                if *state == ReceiverState::Started {
                    *state = ReceiverState::ShuttingDown;
                    true
                } else {
                    false
                }
            });
            token.cancel();
        }

        tracing::info!(state = %self.state(), "Exec receiver shutdown signaled");
        Ok(())
    }

    /// Wait until the scheduler task has exited.
    ///
    /// Returns `true` once the receiver is `Stopped` (or was never started),
    /// `false` if `timeout` elapsed first.
    pub async fn wait_stopped(&self, timeout: Duration) -> bool {
        if self.state() == ReceiverState::Created {
            return true;
        }

        let mut rx = self.state.subscribe();
        tokio::time::timeout(timeout, async move {
            rx.wait_for(|state| *state == ReceiverState::Stopped)
                .await
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }
}
