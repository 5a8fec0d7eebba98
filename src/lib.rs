//! Execreceiver - Periodic Script Metrics Receiver
//!
//! Runs an external script on a fixed interval, decodes the metrics document
//! it prints on stdout, and forwards it to a downstream consumer. It can be
//! embedded as a library or run standalone with the `execreceiver` binary.
//!
//! # Architecture
//!
//! - **Config**: YAML settings and validation (interval >= 1m, script path)
//! - **Receiver**: lifecycle, interval scheduler, script invoker, tick pipeline
//! - **Metrics**: metrics document model and payload decoder
//! - **Consumer**: downstream seam with channel and JSON-lines implementations
//!
//! A failing tick is logged and skipped; it never stops the receiver.

pub mod config;
pub mod consumer;
pub mod metrics;
pub mod receiver;

pub use config::{AppConfig, ConfigError, ReceiverConfig};
pub use consumer::{ChannelConsumer, ConsumerError, JsonLinesConsumer, MetricsConsumer};
pub use metrics::{MetricsDocument, ResourceMetrics, decode_metrics};
pub use receiver::{
    DEFAULT_SHUTDOWN_TIMEOUT, ExecReceiver, Host, ReceiverError, ReceiverState, StatsSnapshot,
    TickError,
};
