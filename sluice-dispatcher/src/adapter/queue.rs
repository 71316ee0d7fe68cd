//! Queue adapter
//!
//! Handles communication with the durable message queue:
//! - Long-poll receive of notification messages
//! - Post-submit deletion by receipt handle
//! - Fresh enqueue of message bodies for retries

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sluice_core::domain::message::QueueMessage;

/// Messages fetched per receive call
const MAX_MESSAGES: usize = 1;
/// Seconds a received message stays invisible to other consumers
const VISIBILITY_TIMEOUT_SECS: u64 = 30;
/// Long-poll wait per receive call, in seconds
const WAIT_TIME_SECS: u64 = 20;

/// Adapter trait for the durable message queue
#[async_trait]
pub trait QueueAdapter: Send + Sync {
    /// Receives up to one message, long-polling for up to 20 seconds
    ///
    /// A received message stays invisible to other consumers for the
    /// visibility timeout; if it is not deleted before that expires, the
    /// queue redelivers it.
    async fn receive(&self) -> Result<Vec<QueueMessage>>;

    /// Deletes a message by its receipt handle
    async fn delete(&self, receipt_handle: &str) -> Result<()>;

    /// Enqueues a fresh message with the given body
    ///
    /// Used to re-inject the triggering message of a failed execution. This
    /// is a new enqueue, not a visibility-timeout return.
    async fn send(&self, body: &str) -> Result<()>;
}

/// HTTP implementation of QueueAdapter
pub struct HttpQueueAdapter {
    client: Client,
    queue_url: String,
}

impl HttpQueueAdapter {
    /// Creates a new HTTP queue adapter
    ///
    /// # Arguments
    /// * `queue_url` - Base URL of the queue endpoint
    pub fn new(queue_url: String) -> Self {
        Self {
            client: Client::new(),
            queue_url,
        }
    }
}

#[async_trait]
impl QueueAdapter for HttpQueueAdapter {
    async fn receive(&self) -> Result<Vec<QueueMessage>> {
        let url = format!("{}/receive", self.queue_url);

        let response = self
            .client
            .post(&url)
            .json(&ReceiveRequest {
                max_messages: MAX_MESSAGES,
                visibility_timeout: VISIBILITY_TIMEOUT_SECS,
                wait_time_seconds: WAIT_TIME_SECS,
            })
            .send()
            .await
            .context("Failed to receive from queue")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to receive from queue: {} - {}", status, body);
        }

        let received = response
            .json::<ReceiveResponse>()
            .await
            .context("Failed to parse received messages")?;

        Ok(received.messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<()> {
        let url = format!("{}/delete", self.queue_url);

        let response = self
            .client
            .post(&url)
            .json(&DeleteRequest { receipt_handle })
            .send()
            .await
            .context("Failed to delete queue message")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to delete queue message: {} - {}", status, body);
        }

        Ok(())
    }

    async fn send(&self, body: &str) -> Result<()> {
        let url = format!("{}/send", self.queue_url);

        let response = self
            .client
            .post(&url)
            .json(&SendRequest { body })
            .send()
            .await
            .context("Failed to enqueue message")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to enqueue message: {} - {}", status, text);
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ReceiveRequest {
    max_messages: usize,
    visibility_timeout: u64,
    wait_time_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct ReceiveResponse {
    messages: Vec<QueueMessage>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    receipt_handle: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    body: &'a str,
}
