//! One tick: invoke, decode, forward.

use std::sync::Arc;
use std::time::Instant;

use super::{ReceiverStats, ScriptInvoker, TickError};
use crate::consumer::MetricsConsumer;
use crate::metrics::{MetricsDocument, decode_metrics};

/// Everything a tick needs, owned by the scheduler task.
pub struct TickPipeline {
    invoker: ScriptInvoker,
    consumer: Arc<dyn MetricsConsumer>,
    stats: Arc<ReceiverStats>,
}

impl std::fmt::Debug for TickPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickPipeline")
            .field("invoker", &self.invoker)
            .field("consumer", &self.consumer.name())
            .finish_non_exhaustive()
    }
}

impl TickPipeline {
    pub fn new(
        invoker: ScriptInvoker,
        consumer: Arc<dyn MetricsConsumer>,
        stats: Arc<ReceiverStats>,
    ) -> Self {
        Self {
            invoker,
            consumer,
            stats,
        }
    }

    /// Run one tick and return the forwarded document.
    ///
    /// # Errors
    /// Returns the [`TickError`] of the first stage that failed. Nothing is
    /// forwarded in that case.
    pub async fn run_tick(&self) -> Result<MetricsDocument, TickError> {
        let invocation = self.invoker.invoke().await?;
        tracing::debug!(
            script = %self.invoker.script().display(),
            bytes = invocation.stdout.len(),
            duration_ms = invocation.duration.as_millis(),
            "Script output received"
        );

        let metrics = decode_metrics(&invocation.stdout)?;
        self.forward(metrics.clone()).await?;
        Ok(metrics)
    }

    async fn forward(&self, metrics: MetricsDocument) -> Result<(), TickError> {
        self.consumer
            .consume_metrics(metrics)
            .await
            .map_err(TickError::ForwardFailed)
    }

    /// Run one tick, record its outcome and log it. Never fails.
    pub async fn execute(&self) {
        let start = Instant::now();
        let script = self.invoker.script().display();
        self.stats.record_tick();
        tracing::debug!(script = %script, "Tick received, running script");

        match self.run_tick().await {
            Ok(metrics) => {
                self.stats.record_forwarded();
                tracing::info!(
                    script = %script,
                    consumer = self.consumer.name(),
                    resource_metrics = metrics.resource_metrics_count(),
                    metrics = metrics.metric_count(),
                    duration_ms = start.elapsed().as_millis(),
                    "Metrics processed successfully"
                );
            }
            Err(e) => {
                self.stats.record_error(&e);
                match &e {
                    TickError::EmptyPayload => {
                        tracing::warn!(script = %script, "Decoded metrics are empty, skipping tick");
                    }
                    TickError::ExecutionFailed { reason, stderr } => {
                        tracing::error!(script = %script, reason = %reason, stderr = %stderr, "Error running script");
                    }
                    TickError::DecodeFailed(err) => {
                        tracing::error!(script = %script, error = %err, "Error decoding metrics payload");
                    }
                    TickError::ForwardFailed(err) => {
                        tracing::error!(script = %script, consumer = self.consumer.name(), error = %err, "Error forwarding metrics");
                    }
                }
            }
        }
    }
}
