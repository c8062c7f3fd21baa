//! Vendor token lifecycle: client credentials, refresh and expiry tracking.

pub mod credential;
pub mod manager;
pub mod token_response;
pub mod token_state;

pub use credential::Credential;
pub use manager::VendorTokenManager;
