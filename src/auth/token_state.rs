use std::fmt;

use crate::auth::token_response::TokenResponse;

/// Mutable token state, owned by the token manager.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    /// unix seconds, already reduced by the safety margin; 0 when empty
    expires_at_unix_ts: i64,
}

/// Token values are masked.
impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_at_unix_ts", &self.expires_at_unix_ts)
            .finish()
    }
}

/// Where the state sits relative to `now`.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenPhase<'a> {
    Empty,
    Valid(&'a str),
    Expired,
}

impl TokenState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn phase(&self, now_unix: i64) -> TokenPhase<'_> {
        match &self.access_token {
            None => TokenPhase::Empty,
            // the final margin seconds before true expiry already count as expired
            Some(_) if now_unix >= self.expires_at_unix_ts => TokenPhase::Expired,
            Some(token) => TokenPhase::Valid(token),
        }
    }

    /// Store a successful token/refresh response.
    /// A response without a refresh token keeps the one already held.
    pub fn apply(&mut self, response: TokenResponse, now_unix: i64, safety_margin_seconds: u64) {
        self.expires_at_unix_ts =
            now_unix + response.lifetime_seconds() as i64 - safety_margin_seconds as i64;
        self.access_token = Some(response.access_token);
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
    }

    /// Drop both tokens and reset expiry to the epoch.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn expires_at_unix_ts(&self) -> i64 {
        self.expires_at_unix_ts
    }
}
