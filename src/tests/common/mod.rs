// tests/common/mod.rs
pub use axum::{body::Body, Router};
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Form, Json};
use http::StatusCode;
use reqwest::Client;
use serde_json::Value;

use crate::auth::{Credential, VendorTokenManager};
use crate::config::service::{ApiConfig, JobsConfig, ServiceConfig, StoreConfig};
use crate::config::settings::{LogFormat, LoggingConfig, MetricsConfig, ServerConfig, SettingsConfig};
use crate::config::vendor::{ApiSchema, PathOverrides, VendorConfig};
use crate::helpers::time::Clock;
use crate::utils::constants::TOKEN_PATH;

pub const TEST_API_KEY: &str = "test-api-key";
pub const T0: i64 = 1_700_000_000;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Minimal valid config pointing at `base_url`.
pub fn service_config(base_url: &str) -> ServiceConfig {
    ServiceConfig {
        settings: SettingsConfig {
            safety_margin_seconds: Some(60),
            retry: None,
            metrics: MetricsConfig::default(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: "8080".to_string(),
            },
            logging: Some(LoggingConfig::new("info".to_string(), LogFormat::Compact)),
        },
        vendor: VendorConfig {
            base_url: base_url.to_string(),
            client_id: "c1".to_string(),
            client_secret: "s1".to_string(),
            timeout_seconds: 10,
            schema: ApiSchema::V1,
            paths: PathOverrides::default(),
        },
        api: ApiConfig {
            api_key: TEST_API_KEY.to_string(),
        },
        jobs: JobsConfig::default(),
        store: StoreConfig::default(),
    }
}

/// Clock the test moves by hand.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn at(now: i64) -> Self {
        Self(Arc::new(AtomicI64::new(now)))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Scripted `/auth/token` endpoint: replies are served in order and every
/// posted form is recorded. Unscripted calls get a 500.
#[derive(Clone, Default)]
pub struct TokenEndpoint {
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    replies: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
    delay_ms: Arc<AtomicU64>,
}

impl TokenEndpoint {
    pub fn reply(&self, status: StatusCode, body: Value) -> &Self {
        self.replies.lock().unwrap().push_back((status, body));
        self
    }

    pub fn delay(&self, ms: u64) -> &Self {
        self.delay_ms.store(ms, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }

    /// `grant_type` of every request so far.
    pub fn grants(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|form| form.get("grant_type").cloned().unwrap_or_default())
            .collect()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(TOKEN_PATH, post(issue_token))
            .with_state(self.clone())
    }

    pub async fn spawn(&self) -> (JoinHandle<()>, SocketAddr) {
        spawn_axum(self.router()).await
    }
}

async fn issue_token(
    State(endpoint): State<TokenEndpoint>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    endpoint.requests.lock().unwrap().push(form);
    let delay = endpoint.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let reply = endpoint.replies.lock().unwrap().pop_front();
    let (status, body) =
        reply.unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "unscripted"})));
    (status, Json(body))
}

/// Token manager for `c1/s1` against a token endpoint at `addr`.
pub fn token_manager(addr: SocketAddr, clock: &ManualClock) -> VendorTokenManager {
    let credential = Credential::new("c1", "s1", format!("http://{}{}", addr, TOKEN_PATH));
    VendorTokenManager::new(credential, build_reqwest_client(), 60).with_clock(Arc::new(clock.clone()))
}
