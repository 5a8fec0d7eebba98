//! Tick counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::TickError;

/// Counters shared between a receiver and its background task.
#[derive(Debug, Default)]
pub struct ReceiverStats {
    ticks: AtomicU64,
    forwarded: AtomicU64,
    execution_failures: AtomicU64,
    decode_failures: AtomicU64,
    empty_payloads: AtomicU64,
    forward_failures: AtomicU64,
}

/// Point-in-time copy of [`ReceiverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub ticks: u64,
    pub forwarded: u64,
    pub execution_failures: u64,
    pub decode_failures: u64,
    pub empty_payloads: u64,
    pub forward_failures: u64,
}

impl ReceiverStats {
    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self, err: &TickError) {
        let counter = match err {
            TickError::ExecutionFailed { .. } => &self.execution_failures,
            TickError::DecodeFailed(_) => &self.decode_failures,
            TickError::EmptyPayload => &self.empty_payloads,
            TickError::ForwardFailed(_) => &self.forward_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            execution_failures: self.execution_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            empty_payloads: self.empty_payloads.load(Ordering::Relaxed),
            forward_failures: self.forward_failures.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Ticks that ended without forwarding.
    pub fn skipped(&self) -> u64 {
        self.execution_failures + self.decode_failures + self.empty_payloads + self.forward_failures
    }
}
