//! Job template domain types

use serde::{Deserialize, Serialize};

/// A reusable, parameterized description of a cluster job
///
/// Templates are matched against canonical object URIs by their `pattern`
/// and instantiated once per triggering object. `image_config` is opaque to
/// the dispatcher and forwarded verbatim to the cluster's template renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTemplate {
    /// Human-readable identifier
    #[serde(default)]
    pub name: String,
    /// Regular expression evaluated against canonical object URIs
    #[serde(default)]
    pub pattern: String,
    /// Container image reference
    #[serde(default)]
    pub image: String,
    /// Opaque structured blob forwarded to the cluster template renderer
    #[serde(default)]
    pub image_config: serde_json::Value,
    /// Resource request, interpreted by the cluster (e.g. "500m")
    #[serde(default)]
    pub request_cpu: String,
    /// Resource request, interpreted by the cluster (e.g. "1Gi")
    #[serde(default)]
    pub request_mem: String,
    /// Maximum permitted wall time in seconds; 0 means unbounded
    #[serde(default)]
    pub deadline: u64,
    /// Cluster identity to run as; empty means the cluster default
    #[serde(default)]
    pub service_account: String,
}
