use std::fmt;

use crate::config::vendor::VendorConfig;

/// Client credentials for the vendor token endpoint. Immutable once built.
#[derive(Clone)]
pub struct Credential {
    client_id: String,
    client_secret: String,
    token_url: String,
}

impl Credential {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
        }
    }

    pub fn from_config(vendor: &VendorConfig) -> Self {
        Self::new(&vendor.client_id, &vendor.client_secret, vendor.token_url())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

// keeps the secret out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("token_url", &self.token_url)
            .finish()
    }
}
