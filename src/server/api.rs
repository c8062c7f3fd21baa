use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::helpers::time::parse_timestamp;
use crate::server::server::AppState;
use crate::store::TelemetryStore;
use crate::utils::constants::API_KEY_HEADER;

static DEVICES_ROUTE: &str = "/api/v2.0/devices/matrack";

/// Store handle plus the key every `/api` request must present.
#[derive(Clone)]
pub struct ApiState {
    pub store: TelemetryStore,
    api_key: Arc<str>,
}

impl ApiState {
    pub fn new(store: TelemetryStore, api_key: &str) -> Self {
        Self {
            store,
            api_key: Arc::from(api_key),
        }
    }

    pub fn router(&self, state: AppState) -> Router<AppState> {
        Router::new()
            .route(DEVICES_ROUTE, get(list_devices))
            .route(&format!("{DEVICES_ROUTE}/{{device_id}}/location"), get(latest_location))
            .route(&format!("{DEVICES_ROUTE}/{{device_id}}/history"), get(location_history))
            .route(&format!("{DEVICES_ROUTE}/{{device_id}}/trips"), get(trips))
            .route(&format!("{DEVICES_ROUTE}/{{device_id}}/alarms"), get(alarms))
            .route_layer(middleware::from_fn_with_state(state, require_api_key))
    }
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if key == &*state.api_state.api_key => next.run(request).await,
        _ => {
            debug!("rejected {} without a valid api key", request.uri().path());
            (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid API Key" }))).into_response()
        }
    }
}

async fn list_devices(State(state): State<AppState>) -> Response {
    Json(state.api_state.store.devices().await).into_response()
}

async fn latest_location(State(state): State<AppState>, Path(device_id): Path<String>) -> Response {
    match state.api_state.store.latest_location(&device_id).await {
        Some(location) => Json(location).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No location found for this device" })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    start_time: Option<String>,
    end_time: Option<String>,
}

async fn location_history(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let start = parse_timestamp(params.start_time.as_deref());
    let end = parse_timestamp(params.end_time.as_deref());

    match (start, end) {
        (Some(start), Some(end)) => {
            Json(state.api_state.store.location_history(&device_id, start, end).await).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid date format. Use ISO format (YYYY-MM-DDTHH:MM:SS)" })),
        )
            .into_response(),
    }
}

async fn trips(State(state): State<AppState>, Path(device_id): Path<String>) -> Response {
    Json(state.api_state.store.trips_for(&device_id).await).into_response()
}

async fn alarms(State(state): State<AppState>, Path(device_id): Path<String>) -> Response {
    Json(state.api_state.store.alarms_for(&device_id).await).into_response()
}
