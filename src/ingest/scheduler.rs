use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveTime, Utc};
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use crate::helpers::time::seconds_until_next_daily;
use crate::ingest::jobs::{IngestJobs, HISTORICAL_JOB, REALTIME_JOB};
use crate::observability::metrics::get_metrics;

impl IngestJobs {
    /// Runs a realtime cycle right away and then every `interval_seconds`.
    /// A failed cycle is logged and counted; the loop keeps going.
    pub async fn loop_realtime(self: Arc<Self>, interval_seconds: u64) -> Result<()> {
        loop {
            match self.fetch_and_store_realtime().await {
                Ok(report) => info!(
                    devices = report.devices,
                    locations = report.locations,
                    failed = report.failed_devices.len(),
                    "realtime cycle done"
                ),
                Err(err) => {
                    error!(error = %err, "realtime cycle failed");
                    get_metrics()
                        .await
                        .ingest_cycle_failures
                        .with_label_values(&[REALTIME_JOB])
                        .inc();
                }
            }
            sleep(Duration::from_secs(interval_seconds)).await;
        }
    }

    /// Sleeps until the next `daily_at` (UTC) and runs a historical sync.
    pub async fn loop_historical(self: Arc<Self>, daily_at: NaiveTime) -> Result<()> {
        loop {
            let wait = seconds_until_next_daily(Utc::now(), daily_at);
            info!("next historical sync in {} seconds", wait);
            sleep(Duration::from_secs(wait as u64)).await;

            match self.sync_historical().await {
                Ok(report) => info!(
                    devices = report.devices,
                    trips = report.trips,
                    alarms = report.alarms,
                    failed = report.failed_devices.len(),
                    "historical sync done"
                ),
                Err(err) => {
                    error!(error = %err, "historical sync failed");
                    get_metrics()
                        .await
                        .ingest_cycle_failures
                        .with_label_values(&[HISTORICAL_JOB])
                        .inc();
                }
            }
        }
    }
}
