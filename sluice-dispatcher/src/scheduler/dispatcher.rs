//! Dispatch loop
//!
//! Consumes one queue message at a time: decode the envelope, resolve each
//! object URI to a template, wait for cluster capacity, submit, register the
//! execution, and only then delete the message. Any error before the delete
//! leaves the message in flight so the visibility timeout returns it.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use sluice_core::domain::execution::{Execution, ExecutionStatus};
use sluice_core::domain::message::QueueMessage;
use sluice_core::domain::template::JobTemplate;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::adapter::{ClusterAdapter, QueueAdapter};
use crate::event::{decode_object_uris, synthesize_envelope};
use crate::matcher::resolve_template;
use crate::registry::TemplateRegistry;
use crate::scheduler::{ADMISSION_SLEEP, RECEIVE_BACKOFF};
use crate::tracker::ExecutionTracker;

/// Queue consumer that turns notification messages into cluster jobs
pub struct Dispatcher {
    registry: TemplateRegistry,
    tracker: ExecutionTracker,
    queue: Arc<dyn QueueAdapter>,
    cluster: Arc<dyn ClusterAdapter>,
}

impl Dispatcher {
    /// Creates a new dispatcher over the given collaborators
    pub fn new(
        registry: TemplateRegistry,
        tracker: ExecutionTracker,
        queue: Arc<dyn QueueAdapter>,
        cluster: Arc<dyn ClusterAdapter>,
    ) -> Self {
        Self {
            registry,
            tracker,
            queue,
            cluster,
        }
    }

    /// Runs the consume loop until the shutdown signal flips
    ///
    /// A message picked up before shutdown is either fully
    /// processed-and-deleted or failed-and-left-visible; the loop never
    /// abandons one halfway.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting dispatch loop");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let messages = tokio::select! {
                _ = shutdown.changed() => break,
                received = self.queue.receive() => match received {
                    Ok(messages) => messages,
                    Err(e) => {
                        error!("Failed to receive from queue: {:#}", e);
                        time::sleep(RECEIVE_BACKOFF).await;
                        continue;
                    }
                },
            };

            for message in messages {
                self.process_message(&message).await;
            }
        }

        info!("Dispatch loop stopped");
    }

    /// Handles one message and deletes it on success
    ///
    /// On failure the message is left in flight and redelivered once its
    /// visibility timeout expires.
    pub(crate) async fn process_message(&self, message: &QueueMessage) {
        match self.handle_message(message).await {
            Ok(()) => {
                if let Err(e) = self.queue.delete(&message.receipt_handle).await {
                    warn!(
                        "Failed to delete message {}; it will be redelivered: {:#}",
                        message.message_id, e
                    );
                }
            }
            Err(e) => {
                error!("Failed to handle message {}: {:#}", message.message_id, e);
            }
        }
    }

    /// Submits a cluster job for every matched object URI in the message
    ///
    /// A single message may carry multiple records; each distinct URI gets
    /// at most one submission. Submit failure aborts the whole handler so
    /// the caller does not delete the message.
    async fn handle_message(&self, message: &QueueMessage) -> Result<()> {
        let uris = decode_object_uris(&message.body);
        let templates = self.registry.list();

        let mut work: BTreeMap<String, JobTemplate> = BTreeMap::new();
        for uri in uris {
            if let Some(template) = resolve_template(&uri, &templates) {
                work.insert(uri, template);
            }
        }

        if work.is_empty() {
            debug!("Message {} matched no job templates", message.message_id);
            return Ok(());
        }

        info!("Dispatching {} job(s)", work.len());

        for (url, template) in work {
            self.wait_for_capacity().await?;

            info!("Processing: {}", url);
            let job = self
                .cluster
                .create(&url, &template)
                .await
                .with_context(|| format!("Failed to submit job for {}", url))?;

            info!("Submitted job {} ({}) for {}", job.name, job.uid, url);

            self.tracker.insert(Execution {
                uid: job.uid,
                name: job.name,
                url,
                status: ExecutionStatus::Unknown,
                submitted_at: chrono::Utc::now(),
                message: message.clone(),
            });
        }

        debug!("Tracking {} execution(s)", self.tracker.len());
        Ok(())
    }

    /// Blocks while the cluster is over its concurrency ceiling
    ///
    /// The gate is a strict greater-than: a running count equal to the
    /// ceiling is admitted.
    async fn wait_for_capacity(&self) -> Result<()> {
        while self.cluster.running_count().await? > self.cluster.capacity() {
            debug!(
                "Cluster at capacity; re-checking in {:?}",
                ADMISSION_SLEEP
            );
            time::sleep(ADMISSION_SLEEP).await;
        }
        Ok(())
    }

    /// Reprocesses a single stored object as if a notification had arrived
    ///
    /// Synthesizes a one-record envelope so the object runs through the
    /// regular decode/match/submit path.
    pub async fn retry_object(&self, bucket: &str, key: &str) -> Result<()> {
        let message = QueueMessage {
            message_id: uuid::Uuid::new_v4().to_string(),
            receipt_handle: String::new(),
            body: synthesize_envelope(bucket, key),
        };

        self.handle_message(&message).await
    }
}
