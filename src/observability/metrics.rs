use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token endpoint
    pub token_requests: IntCounterVec,
    pub token_failures: IntCounterVec,

    // Vendor resource endpoints
    pub vendor_requests: IntCounterVec,
    pub vendor_failures: IntCounterVec,
    pub vendor_duration: HistogramVec,

    // Ingest
    pub ingested_records: IntCounterVec,
    pub ingest_device_failures: IntCounterVec,
    pub ingest_cycle_failures: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("telemetryagent".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token endpoint requests by grant type"), &["grant"]).unwrap(),
            token_failures: IntCounterVec::new(Opts::new("token_failures_total", "Failed token endpoint requests by grant type"), &["grant"]).unwrap(),

            // Vendor
            vendor_requests: IntCounterVec::new(Opts::new("vendor_requests_total", "Vendor resource requests by endpoint"), &["endpoint"]).unwrap(),
            vendor_failures: IntCounterVec::new(Opts::new("vendor_failures_total", "Vendor resource failures by endpoint and reason"), &["endpoint", "reason"]).unwrap(),
            vendor_duration: HistogramVec::new(HistogramOpts::new("vendor_request_duration_seconds", "Vendor request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["endpoint"]).unwrap(),

            // Ingest
            ingested_records: IntCounterVec::new(Opts::new("ingested_records_total", "Records written to the store by kind"), &["kind"]).unwrap(),
            ingest_device_failures: IntCounterVec::new(Opts::new("ingest_device_failures_total", "Per-device ingest failures by job"), &["job"]).unwrap(),
            ingest_cycle_failures: IntCounterVec::new(Opts::new("ingest_cycle_failures_total", "Failed ingest cycles by job"), &["job"]).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_failures.clone())).unwrap();
        reg.register(Box::new(metrics.vendor_requests.clone())).unwrap();
        reg.register(Box::new(metrics.vendor_failures.clone())).unwrap();
        reg.register(Box::new(metrics.vendor_duration.clone())).unwrap();
        reg.register(Box::new(metrics.ingested_records.clone())).unwrap();
        reg.register(Box::new(metrics.ingest_device_failures.clone())).unwrap();
        reg.register(Box::new(metrics.ingest_cycle_failures.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
