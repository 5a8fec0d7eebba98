//! Metrics document model and payload decoding.
//!
//! Scripts print an OTLP/JSON metrics export on stdout. Only the top-level
//! resource grouping is modelled; everything below it is carried through as
//! raw JSON so the downstream consumer sees exactly what the script emitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::receiver::TickError;

/// One decoded tick payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDocument {
    /// Resource-metric groups (`resourceMetrics`).
    #[serde(default, alias = "resource_metrics")]
    pub resource_metrics: Vec<ResourceMetrics>,
}

/// Metrics produced under a single resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetrics {
    /// Resource attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Instrumentation-scope groups, kept opaque.
    #[serde(
        default,
        alias = "scope_metrics",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub scope_metrics: Vec<Value>,

    #[serde(default, alias = "schema_url", skip_serializing_if = "String::is_empty")]
    pub schema_url: String,
}

impl MetricsDocument {
    /// Create a document from resource-metric groups.
    pub fn new(resource_metrics: Vec<ResourceMetrics>) -> Self {
        Self { resource_metrics }
    }

    /// A document without resource-metric groups is never forwarded.
    pub fn is_empty(&self) -> bool {
        self.resource_metrics.is_empty()
    }

    /// Number of resource-metric groups.
    pub fn resource_metrics_count(&self) -> usize {
        self.resource_metrics.len()
    }

    /// Number of individual metrics across all scopes.
    pub fn metric_count(&self) -> usize {
        self.resource_metrics
            .iter()
            .flat_map(|rm| rm.scope_metrics.iter())
            .filter_map(|scope| scope.get("metrics").and_then(Value::as_array))
            .map(Vec::len)
            .sum()
    }
}

/// Decode a raw script payload.
///
/// # Errors
/// - `TickError::DecodeFailed` if the payload is not a valid metrics document
///   (an empty payload included)
/// - `TickError::EmptyPayload` if it decodes to zero resource-metric groups
pub fn decode_metrics(payload: &[u8]) -> Result<MetricsDocument, TickError> {
    let document: MetricsDocument = serde_json::from_slice(payload)?;
    if document.is_empty() {
        return Err(TickError::EmptyPayload);
    }
    Ok(document)
}
