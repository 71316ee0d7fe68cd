//! Execution tracker
//!
//! In-memory index of currently submitted executions, keyed by the
//! cluster-assigned UID. Each entry carries the originating queue message so
//! a failed execution can be re-injected, plus a count of consecutive
//! failures observed for that UID.
//!
//! Written by the dispatch loop (insert) and the monitor loop
//! (refresh/remove); read by the admin status lookup. All access goes
//! through a single lock and snapshots are value copies. The tracker is not
//! persisted: across restarts the queue is the system of record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sluice_core::domain::execution::{Execution, ExecutionStatus};

struct TrackedExecution {
    execution: Execution,
    retries: u32,
}

/// Thread-safe index of in-flight executions
#[derive(Clone, Default)]
pub struct ExecutionTracker {
    entries: Arc<Mutex<HashMap<String, TrackedExecution>>>,
}

impl ExecutionTracker {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly submitted execution with a zero retry count
    pub fn insert(&self, execution: Execution) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            execution.uid.clone(),
            TrackedExecution {
                execution,
                retries: 0,
            },
        );
    }

    /// Value snapshot of every tracked execution
    pub fn snapshot(&self) -> Vec<Execution> {
        let entries = self.entries.lock().unwrap();
        entries.values().map(|e| e.execution.clone()).collect()
    }

    /// Looks up the tracked execution for a canonical object URI
    pub fn status_by_url(&self, url: &str) -> Option<Execution> {
        let entries = self.entries.lock().unwrap();
        entries
            .values()
            .find(|e| e.execution.url == url)
            .map(|e| e.execution.clone())
    }

    /// Refreshes the stored status for a UID, if still tracked
    pub fn set_status(&self, uid: &str, status: ExecutionStatus) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(uid) {
            entry.execution.status = status;
        }
    }

    /// Current consecutive-failure count for a UID
    pub fn retries(&self, uid: &str) -> Option<u32> {
        let entries = self.entries.lock().unwrap();
        entries.get(uid).map(|e| e.retries)
    }

    /// Increments the consecutive-failure count and returns the new value
    pub fn record_failure(&self, uid: &str) -> Option<u32> {
        let mut entries = self.entries.lock().unwrap();
        entries.get_mut(uid).map(|entry| {
            entry.retries += 1;
            entry.retries
        })
    }

    /// Drops a UID from the tracker
    pub fn remove(&self, uid: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(uid);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
