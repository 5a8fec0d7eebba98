//! JSON-lines consumer.

use std::path::Path;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use super::{ConsumerError, MetricsConsumer};
use crate::metrics::MetricsDocument;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Writes each document as a single JSON line and flushes it.
pub struct JsonLinesConsumer {
    name: String,
    writer: Mutex<BoxedWriter>,
}

impl JsonLinesConsumer {
    /// Create a consumer over any async writer.
    pub fn new(name: impl Into<String>, writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write to standard output.
    pub fn stdout() -> Self {
        Self::new("stdout", tokio::io::stdout())
    }

    /// Append to a file, creating it if needed.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, ConsumerError> {
        let path = path.as_ref();
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self::new(path.display().to_string(), file))
    }
}

impl std::fmt::Debug for JsonLinesConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesConsumer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl MetricsConsumer for JsonLinesConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn consume_metrics(&self, metrics: MetricsDocument) -> Result<(), ConsumerError> {
        let mut line = serde_json::to_vec(&metrics)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}
