//! Execution domain types

use serde::{Deserialize, Serialize};

use crate::domain::message::QueueMessage;

/// A submitted, tracked instance of a job template on the cluster
///
/// Created on successful cluster submit, mutated only by the monitor loop's
/// status refresh, and removed once the cluster reports a terminal status.
/// The originating queue message is retained so a failed execution can be
/// re-injected into the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    /// Cluster-assigned unique identifier
    pub uid: String,
    /// Cluster-visible name, unique within the cluster namespace
    pub name: String,
    /// Canonical object URI that triggered the execution
    pub url: String,
    pub status: ExecutionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    /// The originating queue message, retained for re-injection
    pub message: QueueMessage,
}

/// Execution status as classified by the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Unknown,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::Unknown => "Unknown",
            ExecutionStatus::Running => "Running",
            ExecutionStatus::Completed => "Completed",
            ExecutionStatus::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

impl ExecutionStatus {
    /// True once the cluster will no longer change the status on its own
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_under_cluster_names() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Running).unwrap(),
            "\"Running\""
        );
        let status: ExecutionStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(status, ExecutionStatus::Completed);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(!ExecutionStatus::Unknown.is_terminal());
    }
}
