use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::credential::Credential;
use crate::auth::token_response::TokenResponse;
use crate::auth::token_state::{TokenPhase, TokenState};
use crate::error::{VendorError, VendorResult};
use crate::helpers::time::{Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{GRANT_CLIENT_CREDENTIALS, GRANT_REFRESH_TOKEN};

/// Owns the vendor access/refresh tokens and hands out bearer headers.
///
/// State transitions:
/// - empty -> client credentials grant
/// - valid -> no network I/O
/// - expired -> refresh grant if a refresh token is held, otherwise client credentials;
///   a failed refresh clears the state and falls back to one client credentials attempt
///
/// The whole check-and-renew sequence runs under one async mutex, so concurrent
/// callers share a single in-flight token request.
#[derive(Debug)]
pub struct VendorTokenManager {
    credential: Credential,
    client: Client,
    clock: Arc<dyn Clock>,
    safety_margin_seconds: u64,
    state: Mutex<TokenState>,
}

impl VendorTokenManager {
    pub fn new(credential: Credential, client: Client, safety_margin_seconds: u64) -> Self {
        Self {
            credential,
            client,
            clock: Arc::new(SystemClock),
            safety_margin_seconds,
            state: Mutex::new(TokenState::empty()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// `Authorization: Bearer <token>` for the next vendor call.
    pub async fn get_auth_header(&self) -> VendorResult<HeaderMap> {
        let mut state = self.state.lock().await;

        match state.phase(self.clock.now_unix()) {
            TokenPhase::Valid(token) => return bearer_header(token),
            TokenPhase::Empty => {
                debug!("no vendor token held, acquiring");
                self.acquire(&mut state)
                    .await
                    .map_err(VendorError::AuthAcquireFailure)?;
            }
            TokenPhase::Expired => self.renew(&mut state).await?,
        }

        let token = state.access_token().ok_or_else(|| {
            VendorError::AuthAcquireFailure("token endpoint returned no access token".to_string())
        })?;
        bearer_header(token)
    }

    async fn renew(&self, state: &mut TokenState) -> VendorResult<()> {
        let Some(refresh_token) = state.refresh_token().map(str::to_owned) else {
            debug!("vendor token expired, no refresh token held");
            return self
                .acquire(state)
                .await
                .map_err(VendorError::AuthAcquireFailure);
        };

        let form = [
            ("grant_type", GRANT_REFRESH_TOKEN),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.credential.client_id()),
            ("client_secret", self.credential.client_secret()),
        ];
        match self.request_token(GRANT_REFRESH_TOKEN, &form).await {
            Ok(response) => {
                self.store(state, response);
                info!(expires_at = state.expires_at_unix_ts(), "vendor token refreshed");
                Ok(())
            }
            Err(refresh) => {
                warn!(error = %refresh, "vendor token refresh failed, re-acquiring with client credentials");
                state.clear();
                self.acquire(state)
                    .await
                    .map_err(|acquire| VendorError::AuthRefreshFailure { refresh, acquire })
            }
        }
    }

    async fn acquire(&self, state: &mut TokenState) -> Result<(), String> {
        let form = [
            ("client_id", self.credential.client_id()),
            ("client_secret", self.credential.client_secret()),
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
        ];
        let response = self.request_token(GRANT_CLIENT_CREDENTIALS, &form).await?;
        self.store(state, response);
        info!(expires_at = state.expires_at_unix_ts(), "vendor token acquired");
        Ok(())
    }

    fn store(&self, state: &mut TokenState, response: TokenResponse) {
        let lifetime = response.lifetime_seconds();
        if lifetime <= self.safety_margin_seconds {
            warn!(
                lifetime,
                safety_margin = self.safety_margin_seconds,
                "vendor token lifetime does not exceed the safety margin"
            );
        }
        state.apply(response, self.clock.now_unix(), self.safety_margin_seconds);
    }

    async fn request_token(&self, grant: &str, form: &[(&str, &str)]) -> Result<TokenResponse, String> {
        let metrics = get_metrics().await;
        metrics.token_requests.with_label_values(&[grant]).inc();

        let result = async {
            let response = self
                .client
                .post(self.credential.token_url())
                .form(form)
                .send()
                .await
                .map_err(|e| format!("token endpoint unreachable: {}", e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("token endpoint returned {}", status));
            }
            response
                .json::<TokenResponse>()
                .await
                .map_err(|e| format!("invalid token response: {}", e))
        }
        .await;

        if result.is_err() {
            metrics.token_failures.with_label_values(&[grant]).inc();
        }
        result
    }
}

fn bearer_header(token: &str) -> VendorResult<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
        VendorError::AuthAcquireFailure(format!("access token is not a valid header value: {}", e))
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
