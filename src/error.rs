use thiserror::Error;

/// Failures talking to the vendor API.
#[derive(Debug, Error)]
pub enum VendorError {
    /// Credentials rejected or the token endpoint could not be reached.
    #[error("token acquisition failed: {0}")]
    AuthAcquireFailure(String),

    /// Refresh token rejected and the forced re-acquisition failed as well.
    #[error("token refresh failed: {refresh}; re-acquisition failed: {acquire}")]
    AuthRefreshFailure { refresh: String, acquire: String },

    /// Non-2xx, transport failure or `status: false` from a resource endpoint.
    #[error("upstream request to '{path}' failed: {reason}")]
    UpstreamRequestFailure {
        path: String,
        status: Option<u16>,
        reason: String,
    },

    /// 2xx body that does not match the configured schema.
    #[error("invalid payload from '{path}': {reason}")]
    InvalidPayload { path: String, reason: String },
}

impl VendorError {
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            VendorError::AuthAcquireFailure(_) | VendorError::AuthRefreshFailure { .. }
        )
    }

    /// Short label used for metrics.
    pub fn reason_label(&self) -> &'static str {
        match self {
            VendorError::AuthAcquireFailure(_) => "auth_acquire",
            VendorError::AuthRefreshFailure { .. } => "auth_refresh",
            VendorError::UpstreamRequestFailure { .. } => "upstream",
            VendorError::InvalidPayload { .. } => "payload",
        }
    }
}

pub type VendorResult<T> = Result<T, VendorError>;
