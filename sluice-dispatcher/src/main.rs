//! Sluice Dispatcher
//!
//! An event-driven workload dispatcher that consumes object-storage
//! notification events from a durable message queue, matches each referenced
//! object against a registry of job templates, and spawns isolated batch
//! executions on a cluster workload manager.
//!
//! Architecture:
//! - Configuration: Load settings from environment variables
//! - Adapters: HTTP communication with the queue and the cluster manager
//! - Registry/Tracker: In-memory template catalogue and execution index
//! - Scheduler: Dispatch loop and monitor loop
//! - Admin API: Template management, status lookups, manual retries
//!
//! Delivery is at-least-once: a queue message is deleted only after every
//! job derived from it has been submitted and registered. The process keeps
//! no state across restarts; the queue is the system of record.

mod adapter;
mod api;
mod config;
mod event;
mod matcher;
mod registry;
mod scheduler;
mod tracker;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapter::{ClusterAdapter, HttpClusterAdapter, HttpQueueAdapter, QueueAdapter};
use crate::config::Config;
use crate::registry::TemplateRegistry;
use crate::scheduler::{Dispatcher, Monitor};
use crate::tracker::ExecutionTracker;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sluice_dispatcher=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sluice Dispatcher");

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;
    info!(
        "Loaded configuration: queue_url={}, cluster_url={}, max_total_jobs={}",
        config.queue_url, config.cluster_url, config.max_total_jobs
    );

    // Initialize adapters
    let queue: Arc<dyn QueueAdapter> = Arc::new(HttpQueueAdapter::new(config.queue_url.clone()));
    let cluster: Arc<dyn ClusterAdapter> = Arc::new(HttpClusterAdapter::new(
        config.cluster_url.clone(),
        config.max_total_jobs,
    ));

    // Seed the registry with configured templates
    let registry = TemplateRegistry::new();
    for template in &config.job_templates {
        registry
            .add(template.clone())
            .context("Invalid template in JOB_TEMPLATES")?;
    }
    info!("Registered {} job template(s)", registry.list().len());

    let tracker = ExecutionTracker::new();

    let dispatcher = Arc::new(Dispatcher::new(
        registry.clone(),
        tracker.clone(),
        Arc::clone(&queue),
        Arc::clone(&cluster),
    ));
    let monitor = Monitor::new(
        tracker.clone(),
        Arc::clone(&queue),
        Arc::clone(&cluster),
        config.grace_period,
    );

    // Shutdown signal shared by both loops and the admin server
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let dispatch_handle = tokio::spawn({
        let dispatcher = Arc::clone(&dispatcher);
        let shutdown = shutdown_rx.clone();
        async move { dispatcher.run(shutdown).await }
    });

    let monitor_handle = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { monitor.run(shutdown).await }
    });

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // Serve the admin API until shutdown
    let app = api::create_router(api::AppState {
        registry,
        tracker,
        dispatcher,
    });

    let listener = tokio::net::TcpListener::bind(&config.admin_bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.admin_bind_addr))?;
    info!("Admin API listening on {}", config.admin_bind_addr);

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
        })
        .await
        .context("Admin server error")?;

    // Let both loops finish their current work
    let _ = dispatch_handle.await;
    let _ = monitor_handle.await;

    info!("Sluice Dispatcher stopped");
    Ok(())
}
