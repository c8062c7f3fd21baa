//! Vendor payload -> store record conversion, per API variant.

pub mod legacy;
pub mod v1;

pub fn kmh_to_ms(speed_kmh: Option<f64>) -> Option<f64> {
    speed_kmh.map(|speed| speed * 1000.0 / 3600.0)
}
