pub mod records;
pub mod snapshot;
pub mod telemetry_store;

pub use records::{Alarm, Device, RealtimeLocation, Trip};
pub use telemetry_store::TelemetryStore;
