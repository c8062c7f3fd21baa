use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::config::vendor::VendorConfig;
use crate::utils::constants::{DEFAULT_HISTORICAL_DAILY_AT, DEFAULT_REALTIME_INTERVAL_SECS};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub vendor: VendorConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Read API exposed to consumers
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// expected value of the `x-api-key` header
    pub api_key: String,
}

/// ================================
/// Periodic ingest jobs
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    #[serde(default = "default_realtime_interval")]
    pub realtime_interval_seconds: u64,
    /// UTC wall-clock time, `HH:MM`
    #[serde(default = "default_historical_daily_at")]
    pub historical_daily_at: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            realtime_interval_seconds: default_realtime_interval(),
            historical_daily_at: default_historical_daily_at(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON snapshot, loaded at startup and rewritten after every ingest cycle
    pub snapshot_path: Option<String>,
}

fn default_realtime_interval() -> u64 {
    DEFAULT_REALTIME_INTERVAL_SECS
}

fn default_historical_daily_at() -> String {
    DEFAULT_HISTORICAL_DAILY_AT.to_string()
}
