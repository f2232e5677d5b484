//! Acceleration feature extraction
//!
//! Pulls the accelerometer triplet out of the opaque IMU blob a stick
//! uploads. Two layouts exist in the field:
//!
//! ```text
//! plain:           {"accelerometer": {"x": 0.1, "y": "0.2", "z": 9.8}}
//! attribute-typed: {"accelerometer": {"M": {"x": {"S": "0.1"}, "y": {"N": "0.2"}, ...}}}
//! ```
//!
//! Extraction is all-or-nothing: if any axis fails to parse, the whole
//! reading is treated as unreliable and every axis comes back missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{Acceleration, Sample};

const ACCELEROMETER_KEY: &str = "accelerometer";
const MAP_TAG: &str = "M";
const SCALAR_TAGS: [&str; 2] = ["S", "N"];

/// A reading as retrieved from the store, before extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub device_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub imu: Value,
}

impl RawSample {
    pub fn new(device_id: impl Into<String>, timestamp: i64, imu: Value) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            imu,
        }
    }

    /// Convert into a detection sample, degrading malformed IMU data to missing
    pub fn extract(self) -> Sample {
        let acceleration = extract_acceleration(&self.imu);
        Sample {
            device_id: self.device_id,
            timestamp: self.timestamp,
            acceleration,
        }
    }
}

/// Extract the acceleration triplet from an IMU blob.
///
/// Never fails: any structural or numeric problem yields [`Acceleration::MISSING`].
pub fn extract_acceleration(imu: &Value) -> Acceleration {
    try_extract(imu).unwrap_or(Acceleration::MISSING)
}

fn try_extract(imu: &Value) -> Option<Acceleration> {
    let accel = imu.get(ACCELEROMETER_KEY)?;
    let axes = match accel.get(MAP_TAG) {
        Some(inner) => inner,
        None => accel,
    };

    let x = parse_axis(axes.get("x")?)?;
    let y = parse_axis(axes.get("y")?)?;
    let z = parse_axis(axes.get("z")?)?;

    Some(Acceleration::new(x, y, z))
}

fn parse_axis(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Object(map) => {
            let tagged = SCALAR_TAGS.iter().find_map(|tag| map.get(*tag))?;
            return match tagged {
                Value::Object(_) => None,
                other => parse_axis(other),
            };
        }
        _ => return None,
    };

    parsed.is_finite().then_some(parsed)
}
