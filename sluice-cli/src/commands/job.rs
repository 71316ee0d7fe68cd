//! Job command handlers
//!
//! Handles execution status lookups and manual retries.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use sluice_client::{ClientError, DispatcherClient};
use sluice_core::domain::execution::ExecutionStatus;
use sluice_core::dto::execution::ExecutionView;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Look up the tracked execution for an object URL
    Status {
        /// Canonical object URI, e.g. s3://bucket/key
        url: String,
    },
    /// Reprocess a stored object without a real queue event
    Retry {
        /// Bucket holding the object
        bucket: String,
        /// Object key within the bucket
        key: String,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = DispatcherClient::new(&config.dispatcher_url);

    match command {
        JobCommands::Status { url } => job_status(&client, &url).await,
        JobCommands::Retry { bucket, key } => retry_object(&client, &bucket, &key).await,
    }
}

/// Look up and display a tracked execution
async fn job_status(client: &DispatcherClient, url: &str) -> Result<()> {
    match client.job_status(url).await {
        Ok(execution) => {
            print_execution(&execution);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{}", format!("No tracked execution for {}.", url).yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Trigger a manual retry for a bucket/key pair
async fn retry_object(client: &DispatcherClient, bucket: &str, key: &str) -> Result<()> {
    match client.retry_object(bucket, key).await {
        Ok(()) => {
            println!(
                "{} Dispatched retry for s3://{}/{}",
                "✓".green(),
                bucket,
                key
            );
            Ok(())
        }
        Err(ClientError::Api { message, .. }) => {
            println!("{} {}", "✗".red(), message);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_execution(execution: &ExecutionView) {
    println!("{}", "Execution:".bold());
    println!("  UID:       {}", execution.uid.cyan());
    println!("  Name:      {}", execution.name);
    println!("  URL:       {}", execution.url.dimmed());
    println!("  Status:    {}", colorize_status(execution.status));
    println!(
        "  Submitted: {}",
        execution.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );
}

fn colorize_status(status: ExecutionStatus) -> ColoredString {
    match status {
        ExecutionStatus::Unknown => status.to_string().dimmed(),
        ExecutionStatus::Running => status.to_string().cyan(),
        ExecutionStatus::Completed => status.to_string().green(),
        ExecutionStatus::Failed => status.to_string().red(),
    }
}
