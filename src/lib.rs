//! # Telemetry Agent Library
//!
//! Polls a fleet-telemetry vendor API with a managed OAuth2 token,
//! normalises devices, locations, trips and alarms into a store,
//! and serves them back over an authenticated HTTP API.
//!
//! Modules:
//! - `auth`: vendor token lifecycle (acquire, refresh, expiry)
//! - `vendor`: REST client over the `v1` and `legacy` API variants
//! - `transform`: vendor payloads to store records
//! - `store`: in-memory tables with an optional JSON snapshot
//! - `ingest`: realtime and daily historical polling jobs
//! - `server`: read API and metrics endpoint

pub mod auth;
pub mod config;
pub mod error;
pub mod helpers;
pub mod ingest;
pub mod observability;
pub mod resilience;
pub mod server;
pub mod store;
pub mod transform;
pub mod utils;
pub mod vendor;

#[cfg(test)]
pub mod tests;

pub use crate::config::service::ServiceConfig;
pub use crate::error::{VendorError, VendorResult};
