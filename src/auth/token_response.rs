use std::fmt;

use serde::Deserialize;

use crate::utils::constants::DEFAULT_TOKEN_LIFETIME_SECS;

/// Body of a successful token or refresh response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// absent on refresh responses that keep the previous refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl TokenResponse {
    pub fn lifetime_seconds(&self) -> u64 {
        self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
    }
}
