//! Execution DTOs for status lookups

use serde::{Deserialize, Serialize};

use crate::domain::execution::{Execution, ExecutionStatus};

/// Execution summary returned by the status-by-url lookup
///
/// Carries everything an operator needs without the retained queue message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionView {
    pub uid: String,
    pub name: String,
    pub url: String,
    pub status: ExecutionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl From<Execution> for ExecutionView {
    fn from(execution: Execution) -> Self {
        Self {
            uid: execution.uid,
            name: execution.name,
            url: execution.url,
            status: execution.status,
            submitted_at: execution.submitted_at,
        }
    }
}
