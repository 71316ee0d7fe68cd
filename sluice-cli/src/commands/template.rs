//! Template command handlers
//!
//! Handles registering, removing, and listing job templates.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use sluice_client::DispatcherClient;
use sluice_core::domain::template::JobTemplate;

use crate::config::Config;

/// Template subcommands
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Register a new job template
    Add {
        /// Human-readable template name
        #[arg(long)]
        name: String,

        /// Regular expression matched against object URIs (s3://bucket/key)
        #[arg(long)]
        pattern: String,

        /// Container image reference
        #[arg(long)]
        image: String,

        /// Opaque JSON forwarded to the cluster template renderer
        #[arg(long)]
        image_config: Option<String>,

        /// CPU request string, interpreted by the cluster
        #[arg(long, default_value = "")]
        cpu: String,

        /// Memory request string, interpreted by the cluster
        #[arg(long, default_value = "")]
        mem: String,

        /// Maximum wall time in seconds; 0 means unbounded
        #[arg(long, default_value_t = 0)]
        deadline: u64,

        /// Cluster identity to run as; empty means the cluster default
        #[arg(long, default_value = "")]
        service_account: String,
    },
    /// Remove the first template with this exact pattern text
    Remove {
        /// Pattern source to remove
        pattern: String,
    },
    /// List all registered templates
    List,
}

/// Handle template commands
pub async fn handle_template_command(command: TemplateCommands, config: &Config) -> Result<()> {
    let client = DispatcherClient::new(&config.dispatcher_url);

    match command {
        TemplateCommands::Add {
            name,
            pattern,
            image,
            image_config,
            cpu,
            mem,
            deadline,
            service_account,
        } => {
            let image_config: serde_json::Value = match image_config {
                Some(raw) => serde_json::from_str(&raw)
                    .context("--image-config must be valid JSON")?,
                None => serde_json::Value::Null,
            };

            let template = JobTemplate {
                name,
                pattern,
                image,
                image_config,
                request_cpu: cpu,
                request_mem: mem,
                deadline,
                service_account,
            };

            client.create_template(&template).await?;
            println!(
                "{} Registered template '{}' for pattern '{}'",
                "✓".green(),
                template.name,
                template.pattern
            );
            Ok(())
        }
        TemplateCommands::Remove { pattern } => {
            client.delete_template(&pattern).await?;
            println!("{} Removed template with pattern '{}'", "✓".green(), pattern);
            Ok(())
        }
        TemplateCommands::List => list_templates(&client).await,
    }
}

/// List all registered templates
async fn list_templates(client: &DispatcherClient) -> Result<()> {
    let templates = client.list_templates().await?;

    if templates.is_empty() {
        println!("{}", "No templates registered.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} template(s):", templates.len()).bold()
        );
        println!();
        for template in templates {
            print_template(&template);
        }
    }

    Ok(())
}

fn print_template(template: &JobTemplate) {
    println!("  {} {}", "▸".cyan(), template.name.bold());
    println!("    Pattern: {}", template.pattern.dimmed());
    println!("    Image:   {}", template.image);
    if !template.request_cpu.is_empty() || !template.request_mem.is_empty() {
        println!(
            "    Request: cpu={} mem={}",
            template.request_cpu, template.request_mem
        );
    }
    if template.deadline > 0 {
        println!("    Deadline: {}s", template.deadline);
    }
    if !template.service_account.is_empty() {
        println!("    Service account: {}", template.service_account);
    }
    println!();
}
