use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `devices` table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub name: Option<String>,
    pub license_plate: Option<String>,
    pub imei: Option<String>,
}

/// `realtime_locations` table row. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeLocation {
    #[serde(default)]
    pub id: u64,
    pub device_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// m/s
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub ignition_status: Option<i32>,
}

/// `trips` table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: String,
    pub device_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lng: Option<f64>,
    pub distance: Option<f64>,
}

/// `alarms` table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub alarm_id: String,
    pub device_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub alarm_type: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub media_url: Option<String>,
}
