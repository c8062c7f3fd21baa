use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::store::records::{Alarm, Device, RealtimeLocation, Trip};

/// Rows of every table
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Tables {
    pub(crate) devices: BTreeMap<String, Device>,
    pub(crate) realtime_locations: Vec<RealtimeLocation>,
    pub(crate) trips: BTreeMap<String, Trip>,
    pub(crate) alarms: BTreeMap<String, Alarm>,
    pub(crate) next_location_id: u64,
    /// `(device_id, timestamp)` of every timestamped location
    #[serde(skip)]
    pub(crate) location_keys: HashSet<(String, DateTime<Utc>)>,
}

impl Tables {
    fn index_locations(&mut self) {
        self.location_keys = self
            .realtime_locations
            .iter()
            .filter_map(|location| Some((location.device_id.clone(), location.timestamp?)))
            .collect();
    }
}

/// Shared telemetry store: devices, realtime locations, trips, alarms.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    pub(crate) inner: Arc<RwLock<Tables>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(mut tables: Tables) -> Self {
        tables.index_locations();
        Self {
            inner: Arc::new(RwLock::new(tables)),
        }
    }

    /// Insert or replace devices by `device_id`.
    pub async fn upsert_devices(&self, devices: Vec<Device>) -> usize {
        let mut tables = self.inner.write().await;
        let count = devices.len();
        for device in devices {
            tables.devices.insert(device.device_id.clone(), device);
        }
        count
    }

    /// Append a location and return its id.
    /// A row with the same device and timestamp as an existing one is skipped.
    pub async fn insert_location(&self, mut location: RealtimeLocation) -> Option<u64> {
        let mut tables = self.inner.write().await;
        if let Some(timestamp) = location.timestamp {
            if !tables.location_keys.insert((location.device_id.clone(), timestamp)) {
                return None;
            }
        }
        tables.next_location_id += 1;
        location.id = tables.next_location_id;
        tables.realtime_locations.push(location);
        Some(tables.next_location_id)
    }

    /// Insert or replace trips by `trip_id`.
    pub async fn upsert_trips(&self, trips: Vec<Trip>) -> usize {
        let mut tables = self.inner.write().await;
        let count = trips.len();
        for trip in trips {
            tables.trips.insert(trip.trip_id.clone(), trip);
        }
        count
    }

    /// Insert or replace alarms by `alarm_id`.
    pub async fn upsert_alarms(&self, alarms: Vec<Alarm>) -> usize {
        let mut tables = self.inner.write().await;
        let count = alarms.len();
        for alarm in alarms {
            tables.alarms.insert(alarm.alarm_id.clone(), alarm);
        }
        count
    }

    pub async fn devices(&self) -> Vec<Device> {
        self.inner.read().await.devices.values().cloned().collect()
    }

    /// Most recent location of a device by timestamp; the later insert wins a tie.
    pub async fn latest_location(&self, device_id: &str) -> Option<RealtimeLocation> {
        self.inner
            .read()
            .await
            .realtime_locations
            .iter()
            .filter(|location| location.device_id == device_id)
            .max_by_key(|location| (location.timestamp, location.id))
            .cloned()
    }

    /// Locations of a device with `start <= timestamp <= end`, oldest first.
    pub async fn location_history(
        &self,
        device_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<RealtimeLocation> {
        let mut locations: Vec<RealtimeLocation> = self
            .inner
            .read()
            .await
            .realtime_locations
            .iter()
            .filter(|location| location.device_id == device_id)
            .filter(|location| {
                location
                    .timestamp
                    .map(|timestamp| start <= timestamp && timestamp <= end)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        locations.sort_by_key(|location| (location.timestamp, location.id));
        locations
    }

    /// Trips of a device ordered by start time.
    pub async fn trips_for(&self, device_id: &str) -> Vec<Trip> {
        let mut trips: Vec<Trip> = self
            .inner
            .read()
            .await
            .trips
            .values()
            .filter(|trip| trip.device_id == device_id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| (a.start_time, &a.trip_id).cmp(&(b.start_time, &b.trip_id)));
        trips
    }

    /// Alarms of a device ordered by timestamp.
    pub async fn alarms_for(&self, device_id: &str) -> Vec<Alarm> {
        let mut alarms: Vec<Alarm> = self
            .inner
            .read()
            .await
            .alarms
            .values()
            .filter(|alarm| alarm.device_id == device_id)
            .cloned()
            .collect();
        alarms.sort_by(|a, b| (a.timestamp, &a.alarm_id).cmp(&(b.timestamp, &b.alarm_id)));
        alarms
    }
}
