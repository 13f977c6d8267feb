//! Retreat booking and lead-capture service
//!
//! Backend for the retreat marketing site: serves the lead-capture
//! endpoints and validates the CMS catalog export at startup.
//!
//! Module structure:
//! - `domain/` - Core business types (Currency, Retreat, Booking)
//! - `services/` - Business logic (wizard, catalog, lead validation)
//! - `io/` - External interfaces (HTTP, CRM, preference storage)
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use retreat_api::infra::{Config, Metrics};
use retreat_api::io::crm::{GhlClient, LeadSink};
use retreat_api::services::catalog::RetreatCatalog;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Retreat booking and lead-capture service
#[derive(Parser, Debug)]
#[command(name = "retreat-api", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("retreat-api starting");

    let args = Args::parse();
    let config = Arc::new(Config::load_from_path(&args.config));

    info!(
        config_file = %config.config_file(),
        bind_address = %config.bind_address(),
        port = %config.port(),
        catalog_file = %config.catalog_file(),
        crm_configured = %config.has_crm_credentials(),
        cms_project = ?config.cms_project_id(),
        "config_loaded"
    );

    // Validate the CMS export up front; a broken catalog should be visible
    // at startup, not when the first booking flow mounts.
    match RetreatCatalog::from_file(config.catalog_file()) {
        Ok(catalog) => {
            for retreat in catalog.iter() {
                if !retreat.has_availability() {
                    warn!(retreat = %retreat.slug, "retreat_without_availability");
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "catalog_unavailable");
        }
    }

    let metrics = Arc::new(Metrics::new());

    let crm: Option<Arc<dyn LeadSink>> = match GhlClient::from_config(&config) {
        Some(client) => Some(Arc::new(client)),
        None => {
            warn!("crm_not_configured_leads_logged_locally");
            None
        }
    };

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start metrics reporter
    let metrics_clone = metrics.clone();
    let metrics_interval = config.metrics_interval_secs();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(metrics_interval));
        loop {
            interval.tick().await;
            metrics_clone.snapshot().log();
        }
    });

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    retreat_api::io::http::start_server(config, metrics, crm, shutdown_rx).await?;

    info!("retreat-api shutdown complete");
    Ok(())
}
