use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::error::{VendorError, VendorResult};
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::RetrySettings;
use crate::store::TelemetryStore;
use crate::vendor::VendorClient;

pub static REALTIME_JOB: &str = "realtime";
pub static HISTORICAL_JOB: &str = "historical";

/// Counts from one ingest cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub devices: usize,
    pub locations: usize,
    pub trips: usize,
    pub alarms: usize,
    /// devices skipped because a per-device call failed
    pub failed_devices: Vec<String>,
}

/// Polls the vendor and writes into the store.
#[derive(Debug, Clone)]
pub struct IngestJobs {
    client: VendorClient,
    store: TelemetryStore,
    retry: RetrySettings,
    snapshot_path: Option<PathBuf>,
}

impl IngestJobs {
    pub fn new(client: VendorClient, store: TelemetryStore, retry: RetrySettings) -> Self {
        Self {
            client,
            store,
            retry,
            snapshot_path: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot_path: Option<PathBuf>) -> Self {
        self.snapshot_path = snapshot_path;
        self
    }

    /// Refresh the device table and store one realtime location per device.
    pub async fn fetch_and_store_realtime(&self) -> VendorResult<IngestReport> {
        let metrics = get_metrics().await;
        let mut report = IngestReport::default();

        let device_ids = self.refresh_devices(&mut report).await?;
        let client = &self.client;

        for device_id in &device_ids {
            let id = device_id.as_str();
            match self
                .retry
                .run_with_retry(move || client.get_realtime_location(id))
                .await
            {
                Ok(Some(location)) => {
                    if self.store.insert_location(location).await.is_some() {
                        report.locations += 1;
                    } else {
                        debug!(device_id = id, "realtime location unchanged");
                    }
                }
                Ok(None) => debug!(device_id = id, "no realtime location reported"),
                Err(err) if err.is_auth() => return Err(err),
                Err(err) => {
                    warn!(device_id = id, error = %err, "realtime location fetch failed");
                    metrics.ingest_device_failures.with_label_values(&[REALTIME_JOB]).inc();
                    report.failed_devices.push(device_id.clone());
                }
            }
        }

        metrics
            .ingested_records
            .with_label_values(&["location"])
            .inc_by(report.locations as u64);
        self.persist().await;
        Ok(report)
    }

    /// Refresh the device table and upsert every device's trips and alarms.
    pub async fn sync_historical(&self) -> VendorResult<IngestReport> {
        let metrics = get_metrics().await;
        let mut report = IngestReport::default();

        let device_ids = self.refresh_devices(&mut report).await?;
        let client = &self.client;

        for device_id in &device_ids {
            let id = device_id.as_str();
            let mut failed = false;

            match self.retry.run_with_retry(move || client.list_trips(id)).await {
                Ok(trips) => report.trips += self.store.upsert_trips(trips).await,
                Err(err) if err.is_auth() => return Err(err),
                Err(err) => {
                    warn!(device_id = id, error = %err, "trip sync failed");
                    failed = true;
                }
            }

            match self.retry.run_with_retry(move || client.list_alarms(id)).await {
                Ok(alarms) => report.alarms += self.store.upsert_alarms(alarms).await,
                Err(err) if err.is_auth() => return Err(err),
                Err(err) => {
                    warn!(device_id = id, error = %err, "alarm sync failed");
                    failed = true;
                }
            }

            if failed {
                metrics.ingest_device_failures.with_label_values(&[HISTORICAL_JOB]).inc();
                report.failed_devices.push(device_id.clone());
            }
        }

        metrics.ingested_records.with_label_values(&["trip"]).inc_by(report.trips as u64);
        metrics.ingested_records.with_label_values(&["alarm"]).inc_by(report.alarms as u64);
        self.persist().await;
        Ok(report)
    }

    async fn refresh_devices(&self, report: &mut IngestReport) -> Result<Vec<String>, VendorError> {
        let client = &self.client;
        let devices = self
            .retry
            .run_with_retry(move || client.list_devices())
            .await?;
        let device_ids = devices.iter().map(|device| device.device_id.clone()).collect();

        report.devices = self.store.upsert_devices(devices).await;
        get_metrics()
            .await
            .ingested_records
            .with_label_values(&["device"])
            .inc_by(report.devices as u64);
        info!("stored total devices {}", report.devices);
        Ok(device_ids)
    }

    async fn persist(&self) {
        if let Some(path) = &self.snapshot_path {
            if let Err(err) = self.store.save_snapshot(path).await {
                error!(path = %path.display(), error = %err, "store snapshot failed");
            }
        }
    }
}
