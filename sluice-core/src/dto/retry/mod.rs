//! Manual retry DTOs

use serde::{Deserialize, Serialize};

/// Request to reprocess a single stored object without a real queue event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryObject {
    pub bucket: String,
    pub key: String,
}
