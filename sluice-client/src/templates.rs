//! Template-related API endpoints

use sluice_core::domain::template::JobTemplate;
use sluice_core::dto::template::RemoveTemplate;

use crate::DispatcherClient;
use crate::error::Result;

impl DispatcherClient {
    /// Register a new job template
    ///
    /// # Arguments
    /// * `template` - The template to register; `name` and `image` are
    ///   required
    pub async fn create_template(&self, template: &JobTemplate) -> Result<()> {
        let url = format!("{}/template/create", self.base_url);
        let response = self.client.post(&url).json(template).send().await?;

        self.check(response).await?;
        Ok(())
    }

    /// Remove the first registered template with the given pattern text
    ///
    /// # Arguments
    /// * `pattern` - The exact pattern source to remove
    pub async fn delete_template(&self, pattern: &str) -> Result<()> {
        let url = format!("{}/template/delete", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RemoveTemplate {
                pattern: pattern.to_string(),
            })
            .send()
            .await?;

        self.check(response).await?;
        Ok(())
    }

    /// List all registered templates, in insertion order
    pub async fn list_templates(&self) -> Result<Vec<JobTemplate>> {
        let url = format!("{}/template/list", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.read_json(response).await
    }
}
