//! Job-related API endpoints

use sluice_core::dto::execution::ExecutionView;
use sluice_core::dto::retry::RetryObject;

use crate::DispatcherClient;
use crate::error::Result;

impl DispatcherClient {
    /// Look up the tracked execution for a canonical object URL
    ///
    /// # Arguments
    /// * `url` - Canonical object URI, e.g. `s3://bucket/key`
    pub async fn job_status(&self, url: &str) -> Result<ExecutionView> {
        let endpoint = format!("{}/job/status", self.base_url);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("url", url)])
            .send()
            .await?;

        self.read_json(response).await
    }

    /// Reprocess a stored object without a real queue event
    ///
    /// # Arguments
    /// * `bucket` - Bucket holding the object
    /// * `key` - Object key within the bucket
    pub async fn retry_object(&self, bucket: &str, key: &str) -> Result<()> {
        let endpoint = format!("{}/job/retry", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .json(&RetryObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }
}
