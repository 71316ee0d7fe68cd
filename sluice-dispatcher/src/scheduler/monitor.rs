//! Monitor loop
//!
//! Polls the cluster for the status of every tracked execution and drives
//! the retry-or-discard protocol:
//! - Unknown/Running executions stay tracked.
//! - Completed executions are deleted cluster-side (after the configured
//!   grace period) and dropped.
//! - Failed executions have their triggering message re-enqueued; a UID that
//!   keeps failing is discarded once its consecutive-failure count reaches
//!   the retry ceiling.
//!
//! Retry counts are attached to the cluster UID. A re-enqueued message
//! produces a fresh UID on its next submission and therefore a fresh count:
//! the ceiling bounds consecutive failures of one physical execution, not
//! the logical work item.

use std::sync::Arc;
use std::time::Duration;

use sluice_core::domain::execution::{Execution, ExecutionStatus};
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::adapter::{ClusterAdapter, QueueAdapter};
use crate::scheduler::{MAX_RETRIES, MONITOR_INTERVAL};
use crate::tracker::ExecutionTracker;

/// Periodic poller that classifies tracked executions
pub struct Monitor {
    tracker: ExecutionTracker,
    queue: Arc<dyn QueueAdapter>,
    cluster: Arc<dyn ClusterAdapter>,
    grace_period: Duration,
}

impl Monitor {
    /// Creates a new monitor over the given collaborators
    pub fn new(
        tracker: ExecutionTracker,
        queue: Arc<dyn QueueAdapter>,
        cluster: Arc<dyn ClusterAdapter>,
        grace_period: Duration,
    ) -> Self {
        Self {
            tracker,
            queue,
            cluster,
            grace_period,
        }
    }

    /// Runs the poll loop until the shutdown signal flips
    ///
    /// The current pass always finishes before the loop exits.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting monitor loop (interval: {:?})", MONITOR_INTERVAL);

        let mut interval = time::interval(MONITOR_INTERVAL);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = interval.tick() => {}
            }

            self.tick().await;
        }

        info!("Monitor loop stopped");
    }

    /// One pass over the tracked executions
    ///
    /// Per-execution errors are isolated: one failing status query does not
    /// affect the others.
    pub(crate) async fn tick(&self) {
        if self.tracker.is_empty() {
            return;
        }

        let executions = self.tracker.snapshot();
        debug!("Checking {} tracked execution(s)", executions.len());

        for execution in executions {
            match self.cluster.status(&execution.uid).await {
                Ok(report) => {
                    info!("{}: {}", report.name, report.status);
                    self.apply_status(&execution, report.status).await;
                }
                Err(e) => {
                    // Transient: the execution stays tracked for the next pass.
                    warn!(
                        "Failed to query status of job {}: {:#}",
                        execution.name, e
                    );
                }
            }
        }
    }

    async fn apply_status(&self, execution: &Execution, status: ExecutionStatus) {
        self.tracker.set_status(&execution.uid, status);

        if !status.is_terminal() {
            return;
        }

        if status == ExecutionStatus::Completed {
            self.finish(execution).await;
        } else {
            self.handle_failure(execution).await;
        }
    }

    /// Deletes a completed job cluster-side and drops it from the tracker
    async fn finish(&self, execution: &Execution) {
        if let Err(e) = self.cluster.delete(&execution.uid, self.grace_period).await {
            warn!(
                "Failed to delete completed job {}: {:#}",
                execution.name, e
            );
            return;
        }

        self.tracker.remove(&execution.uid);
    }

    /// Re-enqueues the triggering message of a failed execution
    ///
    /// The UID stays tracked until it has been observed failing
    /// `MAX_RETRIES` consecutive times; on that transition the message is
    /// discarded and the UID dropped.
    async fn handle_failure(&self, execution: &Execution) {
        let Some(previous) = self.tracker.retries(&execution.uid) else {
            return;
        };
        debug!(
            "Re-enqueueing message for job {} (attempt {}/{})",
            execution.name,
            previous + 1,
            MAX_RETRIES
        );

        if let Err(e) = self.queue.send(&execution.message.body).await {
            // Transient: retry the re-enqueue on the next pass, uncounted.
            warn!(
                "Failed to re-enqueue message for job {}: {:#}",
                execution.name, e
            );
            return;
        }

        let Some(attempts) = self.tracker.record_failure(&execution.uid) else {
            return;
        };

        if let Err(e) = self.cluster.delete(&execution.uid, self.grace_period).await {
            warn!("Failed to delete failed job {}: {:#}", execution.name, e);
        }

        if attempts >= MAX_RETRIES {
            warn!(
                "Job {} failed {} consecutive times; discarding its message",
                execution.name, attempts
            );
            self.tracker.remove(&execution.uid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::{FakeCluster, FakeQueue, tracked_execution};

    const GRACE: Duration = Duration::from_secs(300);

    fn monitor_with(
        tracker: ExecutionTracker,
        queue: Arc<FakeQueue>,
        cluster: Arc<FakeCluster>,
    ) -> Monitor {
        Monitor::new(tracker, queue, cluster, GRACE)
    }

    #[tokio::test]
    async fn test_running_execution_stays_tracked() {
        let tracker = ExecutionTracker::new();
        tracker.insert(tracked_execution("uid-1", "s3://b/a.tsv", "{}"));

        let queue = Arc::new(FakeQueue::default());
        let cluster = Arc::new(FakeCluster::new(10));
        cluster.set_status("uid-1", ExecutionStatus::Running);

        let monitor = monitor_with(tracker.clone(), queue.clone(), cluster.clone());
        monitor.tick().await;

        assert_eq!(
            tracker.status_by_url("s3://b/a.tsv").unwrap().status,
            ExecutionStatus::Running
        );
        assert!(cluster.deleted.lock().unwrap().is_empty());
        assert!(queue.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completed_execution_is_deleted_and_dropped() {
        let tracker = ExecutionTracker::new();
        tracker.insert(tracked_execution("uid-1", "s3://b/a.tsv", "{}"));

        let queue = Arc::new(FakeQueue::default());
        let cluster = Arc::new(FakeCluster::new(10));
        cluster.set_status("uid-1", ExecutionStatus::Completed);

        let monitor = monitor_with(tracker.clone(), queue.clone(), cluster.clone());
        monitor.tick().await;

        assert!(tracker.is_empty());
        assert_eq!(
            *cluster.deleted.lock().unwrap(),
            vec![("uid-1".to_string(), GRACE)]
        );
        assert!(queue.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_query_error_keeps_execution() {
        let tracker = ExecutionTracker::new();
        tracker.insert(tracked_execution("uid-1", "s3://b/a.tsv", "{}"));

        let queue = Arc::new(FakeQueue::default());
        // No status registered for uid-1: every query errors.
        let cluster = Arc::new(FakeCluster::new(10));

        let monitor = monitor_with(tracker.clone(), queue.clone(), cluster.clone());
        monitor.tick().await;

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.retries("uid-1"), Some(0));
    }

    #[tokio::test]
    async fn test_failed_execution_is_reenqueued_and_kept() {
        let tracker = ExecutionTracker::new();
        tracker.insert(tracked_execution("uid-1", "s3://b/a.tsv", "the-body"));

        let queue = Arc::new(FakeQueue::default());
        let cluster = Arc::new(FakeCluster::new(10));
        cluster.set_status("uid-1", ExecutionStatus::Failed);

        let monitor = monitor_with(tracker.clone(), queue.clone(), cluster.clone());
        monitor.tick().await;

        assert_eq!(*queue.sent.lock().unwrap(), vec!["the-body"]);
        assert_eq!(cluster.deleted.lock().unwrap().len(), 1);
        assert_eq!(tracker.retries("uid-1"), Some(1));
    }

    #[tokio::test]
    async fn test_retry_exhaustion_discards_message() {
        let tracker = ExecutionTracker::new();
        tracker.insert(tracked_execution("uid-1", "s3://b/a.tsv", "the-body"));

        let queue = Arc::new(FakeQueue::default());
        let cluster = Arc::new(FakeCluster::new(10));
        cluster.set_status("uid-1", ExecutionStatus::Failed);

        let monitor = monitor_with(tracker.clone(), queue.clone(), cluster.clone());
        monitor.tick().await;
        monitor.tick().await;
        monitor.tick().await;

        assert_eq!(queue.sent.lock().unwrap().len(), 3);
        assert_eq!(cluster.deleted.lock().unwrap().len(), 3);
        assert_eq!(tracker.retries("uid-1"), None);
        assert!(tracker.is_empty());

        // A further pass finds nothing to do.
        monitor.tick().await;
        assert_eq!(queue.sent.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reenqueue_failure_is_not_counted() {
        let tracker = ExecutionTracker::new();
        tracker.insert(tracked_execution("uid-1", "s3://b/a.tsv", "the-body"));

        let queue = Arc::new(FakeQueue::default());
        queue
            .fail_sends
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let cluster = Arc::new(FakeCluster::new(10));
        cluster.set_status("uid-1", ExecutionStatus::Failed);

        let monitor = monitor_with(tracker.clone(), queue.clone(), cluster.clone());
        monitor.tick().await;

        assert_eq!(tracker.retries("uid-1"), Some(0));
        assert!(cluster.deleted.lock().unwrap().is_empty());

        // Once the queue recovers, the retry goes through.
        queue
            .fail_sends
            .store(false, std::sync::atomic::Ordering::SeqCst);
        monitor.tick().await;

        assert_eq!(queue.sent.lock().unwrap().len(), 1);
        assert_eq!(tracker.retries("uid-1"), Some(1));
    }
}
