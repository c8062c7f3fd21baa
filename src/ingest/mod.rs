//! Scheduled vendor polling into the telemetry store.

pub mod jobs;
pub mod scheduler;

pub use jobs::{IngestJobs, IngestReport};
