//! Dispatcher configuration
//!
//! Defines all configurable parameters for the daemon including the queue
//! and cluster endpoints, the concurrency ceiling, and the grace period
//! applied to terminal jobs.

use std::time::Duration;

use sluice_core::domain::template::JobTemplate;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Queue endpoint the dispatch loop consumes from
    pub queue_url: String,

    /// Cluster workload-manager endpoint
    pub cluster_url: String,

    /// Bind address for the admin API
    pub admin_bind_addr: String,

    /// Cluster-wide ceiling on concurrently running jobs
    pub max_total_jobs: usize,

    /// Delay between a terminal status observation and cluster-side job
    /// deletion, so external observers can scrape the final state
    pub grace_period: Duration,

    /// Job templates seeded into the registry at startup
    pub job_templates: Vec<JobTemplate>,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QUEUE_URL (required)
    /// - CLUSTER_URL (required)
    /// - ADMIN_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - MAX_TOTAL_JOBS (optional, default: 10)
    /// - GRACE_PERIOD (optional, seconds, default: 300)
    /// - JOB_TEMPLATES (optional, JSON array of job templates)
    pub fn from_env() -> anyhow::Result<Self> {
        let queue_url = std::env::var("QUEUE_URL")
            .map_err(|_| anyhow::anyhow!("QUEUE_URL environment variable not set"))?;

        let cluster_url = std::env::var("CLUSTER_URL")
            .map_err(|_| anyhow::anyhow!("CLUSTER_URL environment variable not set"))?;

        let admin_bind_addr =
            std::env::var("ADMIN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let max_total_jobs = std::env::var("MAX_TOTAL_JOBS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(10);

        let grace_period = std::env::var("GRACE_PERIOD")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));

        let job_templates = match std::env::var("JOB_TEMPLATES") {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("Failed to parse JOB_TEMPLATES: {}", e))?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            queue_url,
            cluster_url,
            admin_bind_addr,
            max_total_jobs,
            grace_period,
            job_templates,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.queue_url.is_empty() {
            anyhow::bail!("queue_url cannot be empty");
        }

        if !self.queue_url.starts_with("http://") && !self.queue_url.starts_with("https://") {
            anyhow::bail!("queue_url must start with http:// or https://");
        }

        if self.cluster_url.is_empty() {
            anyhow::bail!("cluster_url cannot be empty");
        }

        if !self.cluster_url.starts_with("http://") && !self.cluster_url.starts_with("https://") {
            anyhow::bail!("cluster_url must start with http:// or https://");
        }

        if self.admin_bind_addr.is_empty() {
            anyhow::bail!("admin_bind_addr cannot be empty");
        }

        if self.max_total_jobs == 0 {
            anyhow::bail!("max_total_jobs must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_url: "http://localhost:9324/queue/sluice".to_string(),
            cluster_url: "http://localhost:9090".to_string(),
            admin_bind_addr: "0.0.0.0:8080".to_string(),
            max_total_jobs: 10,
            grace_period: Duration::from_secs(300),
            job_templates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_total_jobs, 10);
        assert_eq!(config.grace_period, Duration::from_secs(300));
        assert!(config.job_templates.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.queue_url = String::new();
        assert!(config.validate().is_err());

        config.queue_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.queue_url = "http://localhost:9324/queue/sluice".to_string();
        assert!(config.validate().is_ok());

        config.cluster_url = "ftp://somewhere".to_string();
        assert!(config.validate().is_err());

        config.cluster_url = "https://cluster.internal".to_string();
        config.max_total_jobs = 0;
        assert!(config.validate().is_err());
    }
}
