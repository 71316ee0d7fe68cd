//! Scheduling loops
//!
//! Two long-running tasks drive the dispatcher:
//! - The dispatch loop consumes queue messages, resolves templates, and
//!   submits cluster jobs under the concurrency ceiling.
//! - The monitor loop polls tracked executions and applies the
//!   retry-or-discard protocol to failures.
//!
//! Both loops exit when the shutdown signal flips; neither cancels in-flight
//! cluster jobs.

mod dispatcher;
mod monitor;

pub use dispatcher::Dispatcher;
pub use monitor::Monitor;

use std::time::Duration;

/// Consecutive failures of one execution before its message is discarded
pub(crate) const MAX_RETRIES: u32 = 3;

/// Pause between admission re-checks while the cluster is saturated
pub(crate) const ADMISSION_SLEEP: Duration = Duration::from_secs(5);

/// Pause between monitor passes over the tracked executions
pub(crate) const MONITOR_INTERVAL: Duration = Duration::from_secs(30);

/// Pause after a failed queue receive before polling again
pub(crate) const RECEIVE_BACKOFF: Duration = Duration::from_secs(5);

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted queue and cluster fakes shared by the loop tests

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use sluice_core::domain::execution::{Execution, ExecutionStatus};
    use sluice_core::domain::message::QueueMessage;
    use sluice_core::domain::template::JobTemplate;

    use crate::adapter::{ClusterAdapter, ClusterJob, ClusterJobStatus, QueueAdapter};

    #[derive(Default)]
    pub(crate) struct FakeQueue {
        pub sent: Mutex<Vec<String>>,
        pub deleted: Mutex<Vec<String>>,
        pub fail_sends: AtomicBool,
    }

    #[async_trait]
    impl QueueAdapter for FakeQueue {
        async fn receive(&self) -> Result<Vec<QueueMessage>> {
            Ok(Vec::new())
        }

        async fn delete(&self, receipt_handle: &str) -> Result<()> {
            self.deleted.lock().unwrap().push(receipt_handle.to_string());
            Ok(())
        }

        async fn send(&self, body: &str) -> Result<()> {
            if self.fail_sends.load(Ordering::SeqCst) {
                anyhow::bail!("queue unavailable");
            }
            self.sent.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    pub(crate) struct FakeCluster {
        capacity: usize,
        /// Scripted running-count answers; once drained, the count is 0
        pub running_counts: Mutex<VecDeque<usize>>,
        pub count_calls: AtomicUsize,
        /// Object URI whose submission is rejected
        pub fail_submit_for: Option<String>,
        pub created: Mutex<Vec<(String, JobTemplate)>>,
        /// Status reported per UID; unknown UIDs produce a query error
        pub statuses: Mutex<HashMap<String, ExecutionStatus>>,
        pub deleted: Mutex<Vec<(String, Duration)>>,
        next_uid: AtomicUsize,
    }

    impl FakeCluster {
        pub fn new(capacity: usize) -> Self {
            Self {
                capacity,
                running_counts: Mutex::new(VecDeque::new()),
                count_calls: AtomicUsize::new(0),
                fail_submit_for: None,
                created: Mutex::new(Vec::new()),
                statuses: Mutex::new(HashMap::new()),
                deleted: Mutex::new(Vec::new()),
                next_uid: AtomicUsize::new(0),
            }
        }

        pub fn with_running_counts(self, counts: &[usize]) -> Self {
            *self.running_counts.lock().unwrap() = counts.iter().copied().collect();
            self
        }

        pub fn failing_submits_for(mut self, url: &str) -> Self {
            self.fail_submit_for = Some(url.to_string());
            self
        }

        pub fn set_status(&self, uid: &str, status: ExecutionStatus) {
            self.statuses.lock().unwrap().insert(uid.to_string(), status);
        }
    }

    #[async_trait]
    impl ClusterAdapter for FakeCluster {
        async fn create(&self, url: &str, template: &JobTemplate) -> Result<ClusterJob> {
            if let Some(fail_url) = &self.fail_submit_for {
                if fail_url == url {
                    anyhow::bail!("submission rejected for {}", url);
                }
            }

            let n = self.next_uid.fetch_add(1, Ordering::SeqCst) + 1;
            self.created
                .lock()
                .unwrap()
                .push((url.to_string(), template.clone()));

            Ok(ClusterJob {
                uid: format!("uid-{}", n),
                name: format!("{}-{}", template.name, n),
            })
        }

        async fn status(&self, uid: &str) -> Result<ClusterJobStatus> {
            let statuses = self.statuses.lock().unwrap();
            match statuses.get(uid) {
                Some(status) => Ok(ClusterJobStatus {
                    name: format!("job-{}", uid),
                    status: *status,
                }),
                None => anyhow::bail!("no such job: {}", uid),
            }
        }

        async fn delete(&self, uid: &str, grace_period: Duration) -> Result<()> {
            self.deleted.lock().unwrap().push((uid.to_string(), grace_period));
            Ok(())
        }

        async fn running_count(&self) -> Result<usize> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            let mut counts = self.running_counts.lock().unwrap();
            Ok(counts.pop_front().unwrap_or(0))
        }

        fn capacity(&self) -> usize {
            self.capacity
        }
    }

    pub(crate) fn tracked_execution(uid: &str, url: &str, body: &str) -> Execution {
        Execution {
            uid: uid.to_string(),
            name: format!("job-{}", uid),
            url: url.to_string(),
            status: ExecutionStatus::Unknown,
            submitted_at: chrono::Utc::now(),
            message: QueueMessage {
                message_id: "m-1".to_string(),
                receipt_handle: "r-1".to_string(),
                body: body.to_string(),
            },
        }
    }
}
