//! Receiver Layer
//!
//! Runs a user-supplied script on a fixed interval, decodes its stdout as a
//! metrics document and forwards the result downstream. All ticks of one
//! receiver run sequentially in a single Tokio task.
//!
//! # Architecture
//!
//! - [`ExecReceiver`]: start/shutdown lifecycle and [`ReceiverState`]
//! - [`ScriptInvoker`]: spawns the interpreter and captures its output
//! - [`TickPipeline`]: invoke, decode and forward for one tick
//! - [`ReceiverStats`]: per-receiver tick counters
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use execreceiver::{ChannelConsumer, ExecReceiver, Host, ReceiverConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (consumer, mut rx) = ChannelConsumer::new(16);
//! let config = ReceiverConfig::new("/scripts/m.py").with_interval("1m");
//! let mut receiver = ExecReceiver::new(config, Arc::new(consumer));
//!
//! let ctx = CancellationToken::new();
//! receiver.start(&ctx, &Host::default()).await?;
//! let metrics = rx.recv().await;
//! receiver.shutdown(&ctx).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod invoker;
mod lifecycle;
mod pipeline;
mod scheduler;
mod stats;

pub use error::{ReceiverError, TickError};
pub use invoker::{Invocation, ScriptInvoker};
pub use lifecycle::{DEFAULT_SHUTDOWN_TIMEOUT, ExecReceiver, Host, ReceiverState};
pub use pipeline::TickPipeline;
pub use stats::{ReceiverStats, StatsSnapshot};
