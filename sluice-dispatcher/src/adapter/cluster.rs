//! Cluster adapter
//!
//! Handles communication with the cluster workload manager:
//! - Rendering and submitting batch jobs from a template
//! - Querying per-job status
//! - Deleting terminal jobs after a grace period
//! - Reading the cluster-wide running-job count

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sluice_core::domain::execution::ExecutionStatus;
use sluice_core::domain::template::JobTemplate;

/// A freshly submitted cluster job
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterJob {
    /// Cluster-assigned unique identifier
    pub uid: String,
    /// Cluster-visible job name
    pub name: String,
}

/// Status report for a submitted job
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterJobStatus {
    pub name: String,
    pub status: ExecutionStatus,
}

/// Adapter trait for the cluster workload manager
#[async_trait]
pub trait ClusterAdapter: Send + Sync {
    /// Renders the template for an object URI and submits the job
    ///
    /// The cluster assigns the UID. `image_config` and the resource request
    /// strings are forwarded verbatim; the dispatcher does not interpret
    /// them.
    async fn create(&self, url: &str, template: &JobTemplate) -> Result<ClusterJob>;

    /// Queries the current status of a submitted job
    async fn status(&self, uid: &str) -> Result<ClusterJobStatus>;

    /// Deletes a job, honoring a grace period before cluster-side removal
    ///
    /// The grace period lets external observers scrape the final status
    /// before the job object disappears.
    async fn delete(&self, uid: &str, grace_period: Duration) -> Result<()>;

    /// Number of jobs currently running on the cluster
    async fn running_count(&self) -> Result<usize>;

    /// Configured cluster-wide concurrency ceiling
    fn capacity(&self) -> usize;
}

/// HTTP implementation of ClusterAdapter
pub struct HttpClusterAdapter {
    client: Client,
    cluster_url: String,
    capacity: usize,
}

impl HttpClusterAdapter {
    /// Creates a new HTTP cluster adapter
    ///
    /// # Arguments
    /// * `cluster_url` - Base URL of the cluster manager endpoint
    /// * `capacity` - Cluster-wide ceiling on concurrently running jobs
    pub fn new(cluster_url: String, capacity: usize) -> Self {
        Self {
            client: Client::new(),
            cluster_url,
            capacity,
        }
    }
}

#[async_trait]
impl ClusterAdapter for HttpClusterAdapter {
    async fn create(&self, url: &str, template: &JobTemplate) -> Result<ClusterJob> {
        let endpoint = format!("{}/jobs", self.cluster_url);

        let response = self
            .client
            .post(&endpoint)
            .json(&CreateJobRequest { url, template })
            .send()
            .await
            .context("Failed to submit cluster job")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to submit cluster job: {} - {}", status, body);
        }

        let job = response
            .json::<ClusterJob>()
            .await
            .context("Failed to parse submitted job")?;

        Ok(job)
    }

    async fn status(&self, uid: &str) -> Result<ClusterJobStatus> {
        let endpoint = format!("{}/jobs/{}/status", self.cluster_url, uid);

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .context("Failed to query job status")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to query job status: {} - {}", status, body);
        }

        let job_status = response
            .json::<ClusterJobStatus>()
            .await
            .context("Failed to parse job status")?;

        Ok(job_status)
    }

    async fn delete(&self, uid: &str, grace_period: Duration) -> Result<()> {
        let endpoint = format!("{}/jobs/{}/delete", self.cluster_url, uid);

        let response = self
            .client
            .post(&endpoint)
            .json(&DeleteJobRequest {
                grace_period_seconds: grace_period.as_secs(),
            })
            .send()
            .await
            .context("Failed to delete cluster job")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to delete cluster job: {} - {}", status, body);
        }

        Ok(())
    }

    async fn running_count(&self) -> Result<usize> {
        let endpoint = format!("{}/jobs/running/count", self.cluster_url);

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .context("Failed to read running-job count")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to read running-job count: {} - {}", status, body);
        }

        let count = response
            .json::<RunningCountResponse>()
            .await
            .context("Failed to parse running-job count")?;

        Ok(count.count)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Serialize)]
struct CreateJobRequest<'a> {
    url: &'a str,
    template: &'a JobTemplate,
}

#[derive(Debug, Serialize)]
struct DeleteJobRequest {
    grace_period_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct RunningCountResponse {
    count: usize,
}
