//! Detection value types

use serde::Serialize;

/// Tri-axial acceleration reading.
///
/// An axis that could not be read is `None`. Missing is never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Acceleration {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl Acceleration {
    /// Reading with every axis missing
    pub const MISSING: Self = Self { x: None, y: None, z: None };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn axes(&self) -> [Option<f64>; 3] {
        [self.x, self.y, self.z]
    }

    /// True when all three axes are present
    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }

    /// Euclidean norm, missing if any axis is missing
    pub fn magnitude(&self) -> Option<f64> {
        let (x, y, z) = (self.x?, self.y?, self.z?);
        Some((x * x + y * y + z * z).sqrt())
    }
}

/// One sensor reading from one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub device_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub acceleration: Acceleration,
}

impl Sample {
    pub fn new(device_id: impl Into<String>, timestamp: i64, acceleration: Acceleration) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            acceleration,
        }
    }
}

/// Per-axis absolute change against the previous reading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisDelta {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl AxisDelta {
    pub const MISSING: Self = Self { x: None, y: None, z: None };

    pub fn axes(&self) -> [Option<f64>; 3] {
        [self.x, self.y, self.z]
    }
}

/// A sample with every derived detection field attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSample {
    pub timestamp: i64,
    pub acceleration: Acceleration,
    pub magnitude: Option<f64>,
    pub variance: Option<f64>,
    pub delta: AxisDelta,
    pub is_anomalous: bool,
    /// Consecutive anomalous samples ending here, 0 when not anomalous
    pub run_length: u32,
}

/// Outcome of one pass over a device stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EpisodeVerdict {
    /// A run reached the duration threshold
    pub confirmed: bool,
    /// Index of the sample where the run first reached the threshold
    pub confirmed_at: Option<usize>,
    /// Longest run observed anywhere in the stream
    pub longest_run: u32,
    pub anomalous_samples: usize,
    pub total_samples: usize,
}
