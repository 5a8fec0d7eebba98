//! Downstream consumers for decoded metrics.
//!
//! - [`MetricsConsumer`]: the single "consume metrics document" seam
//! - [`ChannelConsumer`]: hands documents to an in-process MPSC channel
//! - [`JsonLinesConsumer`]: writes documents as JSON lines to a file or stdout

mod channel;
mod json_lines;

use thiserror::Error;

use crate::metrics::MetricsDocument;

pub use channel::ChannelConsumer;
pub use json_lines::JsonLinesConsumer;

/// Errors reported by a downstream consumer.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// The receiving side is gone.
    #[error("downstream channel closed")]
    Closed,

    /// Writing the document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the document failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The consumer refused the document.
    #[error("metrics rejected: {0}")]
    Rejected(String),
}

/// Downstream consumer of decoded metrics documents.
///
/// The receiver calls `consume_metrics` sequentially from a single task, so
/// implementations never see overlapping calls from one receiver.
#[async_trait::async_trait]
pub trait MetricsConsumer: Send + Sync + 'static {
    /// Consumer name used in logs.
    fn name(&self) -> &str;

    /// Accept one non-empty metrics document.
    async fn consume_metrics(&self, metrics: MetricsDocument) -> Result<(), ConsumerError>;
}
