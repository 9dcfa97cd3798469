// Main entry point for the organization sync worker

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use org_sync::domains::organization::{OrganizationSync, RunOutcome};
use org_sync::kernel::{start_scheduler, SyncDeps};
use org_sync::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "org-sync")]
#[command(about = "Sync PRAS organisation structure into the IdM core")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run on the configured schedule until interrupted (default)
    Schedule,

    /// Run a single pass and exit
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,org_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        pras_url = %config.pras_url,
        idm_core_api_url = %config.idm_core_api_url,
        principal = config.client_principal_name.as_deref().unwrap_or("-"),
        "Configuration loaded"
    );

    let deps = SyncDeps::from_config(&config)?;
    let sync = Arc::new(OrganizationSync::new(deps));

    match cli.command.unwrap_or(Commands::Schedule) {
        Commands::Run => {
            if let RunOutcome::Completed(report) = sync.run().await? {
                tracing::info!(
                    created = report.created,
                    updated = report.updated,
                    unchanged = report.unchanged,
                    "Sync finished"
                );
            }
        }
        Commands::Schedule => {
            let mut scheduler = start_scheduler(sync, &config.sync_schedule)
                .await
                .context("Failed to start scheduler")?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down");
            scheduler.shutdown().await?;
        }
    }

    Ok(())
}
