use serde::Deserialize;

use crate::utils::constants::{DEFAULT_VENDOR_TIMEOUT_SECS, TOKEN_PATH};

/// ================================
/// Vendor API connection
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct VendorConfig {
    /// e.g. https://api.matrack.live/v1
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// connect + request timeout for every vendor call, token endpoint included
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub schema: ApiSchema,
    #[serde(default)]
    pub paths: PathOverrides,
}

impl VendorConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url(), TOKEN_PATH)
    }
}

/// Vendor payload/path variant.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiSchema {
    /// `/devices` style paths, snake_case payloads
    #[default]
    V1,
    /// `/device/list` style paths, camelCase payloads
    Legacy,
}

/// Per-endpoint path overrides. Per-device paths must contain `{device_id}`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PathOverrides {
    pub device_list: Option<String>,
    pub device_info: Option<String>,
    pub realtime: Option<String>,
    pub trips: Option<String>,
    pub alarms: Option<String>,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_VENDOR_TIMEOUT_SECS
}
