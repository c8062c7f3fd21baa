use anyhow::{anyhow, Result};
use axum::Router;
use tracing::info;

use crate::config::settings::{MetricsConfig, SettingsConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::api::ApiState;
use crate::store::TelemetryStore;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub api_state: ApiState,
}

impl AppState {
    pub fn new(metrics: &Metrics, store: TelemetryStore, api_key: &str) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            api_state: ApiState::new(store, api_key),
        }
    }
}

pub fn router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    Router::new()
        .merge(state.metrics_state.router(metrics_config))
        .merge(state.api_state.router(state.clone()))
        .with_state(state)
}

/// Serve the read API (and metrics, when enabled) until the process stops.
pub async fn start(settings_config: &SettingsConfig, store: TelemetryStore, api_key: &str) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, store, api_key);
    let app = router(state, &settings_config.metrics);

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow!("failed to bind {}: {}", bind_addr, e))?;
    info!("listening on {}", bind_addr);

    metrics.up.set(1);
    let served = axum::serve(listener, app).await;
    metrics.up.set(0);
    served.map_err(|e| anyhow!("server error: {}", e))
}
