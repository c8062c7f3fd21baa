//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 60;
/// lifetime assumed when a token response omits `expires_in`
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
pub const DEFAULT_VENDOR_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REALTIME_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_HISTORICAL_DAILY_AT: &str = "00:00";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

pub const TOKEN_PATH: &str = "/auth/token";
pub const DEVICE_ID_PLACEHOLDER: &str = "{device_id}";

// Grant types
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

pub const API_KEY_HEADER: &str = "x-api-key";
