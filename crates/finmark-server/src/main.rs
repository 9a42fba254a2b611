//! # Finmark Server
//!
//! Hosts the service catalog behind its read-through cache. Loads
//! configuration, initializes telemetry, assembles the application and runs
//! until Ctrl+C or SIGTERM.

use anyhow::Context;
use finmark_config::{AppConfig, ConfigLoader};
use finmark_core::telemetry::{init_telemetry, shutdown_telemetry};
use finmark_server::{startup, Application};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {:#}", e);
        eprintln!("Application error: {:#}", e);
        shutdown_telemetry();
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config_loader = ConfigLoader::from_default_location().context("failed to load configuration")?;
    let config = config_loader.get().await;

    init_telemetry(&config.observability.telemetry(&config.app.name))
        .context("failed to initialize telemetry")?;

    startup::print_banner();
    info!("Starting {} v{}", config.app.name, config.app.version);

    if config.observability.metrics_enabled {
        install_metrics_exporter(&config)?;
    }

    let app = Application::build(config).await;
    let cache_health = app.cache_health().await;
    startup::print_startup_info(app.config(), &cache_health);

    shutdown_signal().await;

    app.shutdown();
    shutdown_telemetry();
    info!("Server shutdown complete");
    Ok(())
}

fn install_metrics_exporter(config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .observability
        .metrics_addr
        .parse()
        .with_context(|| format!("invalid metrics address '{}'", config.observability.metrics_addr))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("failed to install Prometheus exporter")?;
    finmark_service::stats::register_metrics();

    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
