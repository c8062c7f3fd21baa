use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use telemetry_agent::helpers::time::parse_daily_time;
use telemetry_agent::ingest::IngestJobs;
use telemetry_agent::resilience::retry::RetrySettings;
use telemetry_agent::server;
use telemetry_agent::store::TelemetryStore;
use telemetry_agent::utils::config_loader;
use telemetry_agent::utils::logging::{self, LogLevel};
use telemetry_agent::vendor::VendorClient;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "telemetry-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Restore the store
    // -------------------------------

    let snapshot_path = service_config.store.snapshot_path.as_ref().map(PathBuf::from);
    let store = match &snapshot_path {
        Some(path) => TelemetryStore::load_snapshot(path).await?,
        None => TelemetryStore::new(),
    };

    // -------------------------------
    // 3. Vendor client with its token manager
    // -------------------------------

    let client = VendorClient::from_config(&service_config.vendor, &service_config.settings)?;
    let retry = RetrySettings::from_config(service_config.settings.retry.as_ref());

    // -------------------------------
    // 4. Ingest workers
    // -------------------------------

    let jobs = Arc::new(IngestJobs::new(client, store.clone(), retry).with_snapshot(snapshot_path.clone()));
    let daily_at = parse_daily_time(&service_config.jobs.historical_daily_at)
        .ok_or_else(|| anyhow!("invalid jobs.historical_daily_at"))?;

    let realtime = jobs.clone().loop_realtime(service_config.jobs.realtime_interval_seconds);
    let historical = jobs.loop_historical(daily_at);

    // -------------------------------
    // 5. Read API
    // -------------------------------

    let http_server = server::server::start(&service_config.settings, store.clone(), &service_config.api.api_key);

    info!("Service starting...");
    tokio::select! {
        joined = async { tokio::try_join!(http_server, realtime, historical) } => {
            joined?;
        }
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    if let Some(path) = &snapshot_path {
        store.save_snapshot(path).await?;
        info!("store snapshot saved to {}", path.display());
    }

    Ok(())
}
