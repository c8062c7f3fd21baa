use crate::helpers::time::parse_timestamp;
use crate::store::records::{Alarm, Device, RealtimeLocation, Trip};
use crate::transform::kmh_to_ms;
use crate::vendor::schema::legacy::{AlarmData, DeviceData, DeviceInfoData, RealtimeLocationData, TripData};

/// Device list entries carry no name or plate.
pub fn device(data: DeviceData) -> Device {
    Device {
        device_id: data.device,
        name: None,
        license_plate: None,
        imei: None,
    }
}

pub fn device_info(data: DeviceInfoData) -> Device {
    Device {
        device_id: data.id,
        name: data.model,
        license_plate: None,
        imei: Some(data.imei),
    }
}

/// `None` when the vendor has no fix for the device.
pub fn realtime_location(data: RealtimeLocationData, device_id: &str) -> Option<RealtimeLocation> {
    if data.status == Some(false) || (data.lat.is_none() && data.lng.is_none()) {
        return None;
    }
    Some(RealtimeLocation {
        id: 0,
        device_id: device_id.to_string(),
        timestamp: parse_timestamp(data.time.as_deref()),
        lat: data.lat,
        lng: data.lng,
        speed: kmh_to_ms(data.speed),
        heading: None,
        ignition_status: None,
    })
}

/// Trip events are single points: start and end coincide.
pub fn trip(data: TripData, device_id: &str) -> Trip {
    let timestamp = event_time(&data.date, &data.time);
    Trip {
        trip_id: format!("{}:{}T{}:{}", device_id, data.date, data.time, data.event_code),
        device_id: device_id.to_string(),
        start_time: timestamp,
        end_time: timestamp,
        start_lat: Some(data.lat),
        start_lng: Some(data.lng),
        end_lat: Some(data.lat),
        end_lng: Some(data.lng),
        distance: Some(data.mileage),
    }
}

pub fn alarm(data: AlarmData, device_id: &str) -> Alarm {
    Alarm {
        alarm_id: format!("{}:{}:{}", device_id, data.utc_date_time, data.event_name),
        device_id: device_id.to_string(),
        timestamp: parse_timestamp(Some(&data.utc_date_time)),
        alarm_type: Some(data.event_name),
        lat: Some(data.lat),
        lng: Some(data.lng),
        media_url: data.file_path,
    }
}

fn event_time(date: &str, time: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    parse_timestamp(Some(&format!("{} {}", date, time)))
}
