//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * vendor connection (url, credentials, timeout, path templates)
//!   * token safety margin against the default token lifetime
//!   * server / metrics / logging / retry invariants
//!   * job schedule

use tracing::{error, info};

use crate::config::service::{ApiConfig, JobsConfig, ServiceConfig};
use crate::config::settings::{RetryConfig, SettingsConfig};
use crate::config::vendor::VendorConfig;
use crate::helpers::time::parse_daily_time;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{DEFAULT_TOKEN_LIFETIME_SECS, DEVICE_ID_PLACEHOLDER};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_vendor(&cfg.vendor, &mut errors);
    validate_api(&cfg.api, &mut errors);
    validate_jobs(&cfg.jobs, &mut errors);

    if let Some(path) = &cfg.store.snapshot_path {
        if path.trim().is_empty() {
            errors.push("store.snapshot_path must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(retry) = &settings.retry {
        validate_retry("settings.retry", retry, errors);
    }

    // a margin at or above the token lifetime would expire every token on arrival
    if let Some(s) = settings.safety_margin_seconds {
        if s >= DEFAULT_TOKEN_LIFETIME_SECS {
            errors.push(format!(
                "settings.safety_margin_seconds ({}) must be below {}",
                s, DEFAULT_TOKEN_LIFETIME_SECS
            ));
        }
    }

    if settings.server.host.is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be a valid port number",
            settings.server.port
        ));
    }

    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if let Some(attempts) = retry.attempts {
        if attempts == 0 {
            errors.push(format!("{}.attempts must be > 0", path));
        }
    }
    if let (Some(base), Some(max)) = (retry.base_delay_ms, retry.max_delay_ms) {
        if max < base {
            errors.push(format!(
                "{}.max_delay_ms ({}) must be >= base_delay_ms ({})",
                path, max, base
            ));
        }
    }
}

/// VENDOR VALIDATION
fn validate_vendor(vendor: &VendorConfig, errors: &mut Vec<String>) {
    if !(vendor.base_url.starts_with("http://") || vendor.base_url.starts_with("https://")) {
        errors.push(format!(
            "vendor.base_url '{}' must start with http:// or https://",
            vendor.base_url
        ));
    }
    if vendor.client_id.trim().is_empty() {
        errors.push("vendor.client_id must not be empty".to_string());
    }
    if vendor.client_secret.trim().is_empty() {
        errors.push("vendor.client_secret must not be empty".to_string());
    }
    if vendor.timeout_seconds == 0 {
        errors.push("vendor.timeout_seconds must be > 0".to_string());
    }

    if let Some(path) = &vendor.paths.device_list {
        if !path.starts_with('/') {
            errors.push(format!("vendor.paths.device_list '{}' must start with '/'", path));
        }
    }
    let per_device = [
        ("device_info", &vendor.paths.device_info),
        ("realtime", &vendor.paths.realtime),
        ("trips", &vendor.paths.trips),
        ("alarms", &vendor.paths.alarms),
    ];
    for (name, path) in per_device {
        if let Some(path) = path {
            if !path.starts_with('/') || !path.contains(DEVICE_ID_PLACEHOLDER) {
                errors.push(format!(
                    "vendor.paths.{} '{}' must start with '/' and contain '{}'",
                    name, path, DEVICE_ID_PLACEHOLDER
                ));
            }
        }
    }
}

fn validate_api(api: &ApiConfig, errors: &mut Vec<String>) {
    if api.api_key.trim().is_empty() {
        errors.push("api.api_key must not be empty".to_string());
    }
}

fn validate_jobs(jobs: &JobsConfig, errors: &mut Vec<String>) {
    if jobs.realtime_interval_seconds == 0 {
        errors.push("jobs.realtime_interval_seconds must be > 0".to_string());
    }
    if parse_daily_time(&jobs.historical_daily_at).is_none() {
        errors.push(format!(
            "jobs.historical_daily_at '{}' must be a UTC time formatted HH:MM",
            jobs.historical_daily_at
        ));
    }
}
