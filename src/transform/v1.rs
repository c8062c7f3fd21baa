use crate::helpers::time::parse_timestamp;
use crate::store::records::{Alarm, Device, RealtimeLocation, Trip};
use crate::transform::kmh_to_ms;
use crate::vendor::schema::v1::{AlarmData, DeviceData, RealtimeLocationData, TripData};

pub fn device(data: DeviceData) -> Device {
    Device {
        device_id: data.device_id,
        name: data.name,
        license_plate: data.license_plate,
        imei: data.imei,
    }
}

/// The row keeps the id the location was requested for.
pub fn realtime_location(data: RealtimeLocationData, device_id: &str) -> RealtimeLocation {
    RealtimeLocation {
        id: 0,
        device_id: device_id.to_string(),
        timestamp: parse_timestamp(Some(&data.timestamp)),
        lat: Some(data.latitude),
        lng: Some(data.longitude),
        speed: kmh_to_ms(data.speed),
        heading: data.heading,
        ignition_status: data.ignition_status,
    }
}

pub fn trip(data: TripData, device_id: &str) -> Trip {
    Trip {
        trip_id: data.trip_id,
        device_id: device_id.to_string(),
        start_time: parse_timestamp(Some(&data.start_time)),
        end_time: parse_timestamp(Some(&data.end_time)),
        start_lat: Some(data.start_lat),
        start_lng: Some(data.start_lng),
        end_lat: Some(data.end_lat),
        end_lng: Some(data.end_lng),
        distance: Some(data.distance),
    }
}

pub fn alarm(data: AlarmData, device_id: &str) -> Alarm {
    Alarm {
        alarm_id: data.alarm_id,
        device_id: device_id.to_string(),
        timestamp: parse_timestamp(Some(&data.timestamp)),
        alarm_type: Some(data.alarm_type),
        lat: Some(data.latitude),
        lng: Some(data.longitude),
        media_url: data.media_url,
    }
}
