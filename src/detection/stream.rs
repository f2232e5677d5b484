//! Per-device ordered streams

use std::collections::BTreeMap;

use super::types::Sample;
use super::DetectionError;

/// Samples of a single device, ordered by timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStream {
    device_id: String,
    samples: Vec<Sample>,
}

impl DeviceStream {
    /// Build a stream, sorting by timestamp.
    ///
    /// The sort is stable, so samples sharing a timestamp keep their
    /// retrieval order.
    pub fn new(device_id: impl Into<String>, mut samples: Vec<Sample>) -> Result<Self, DetectionError> {
        let device_id = device_id.into();

        if let Some(stray) = samples.iter().find(|s| s.device_id != device_id) {
            return Err(DetectionError::MixedDevices {
                expected: device_id,
                found: stray.device_id.clone(),
            });
        }

        samples.sort_by_key(|s| s.timestamp);
        Ok(Self { device_id, samples })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamp covered by the stream
    pub fn span(&self) -> Option<(i64, i64)> {
        Some((self.samples.first()?.timestamp, self.samples.last()?.timestamp))
    }
}

/// Group an unordered batch by device, one sorted stream per device.
///
/// Streams come back in device id order so a cycle is deterministic
/// regardless of retrieval order.
pub fn partition_by_device(samples: impl IntoIterator<Item = Sample>) -> Vec<DeviceStream> {
    let mut groups: BTreeMap<String, Vec<Sample>> = BTreeMap::new();
    for sample in samples {
        groups.entry(sample.device_id.clone()).or_default().push(sample);
    }

    groups
        .into_iter()
        .map(|(device_id, mut samples)| {
            samples.sort_by_key(|s| s.timestamp);
            DeviceStream { device_id, samples }
        })
        .collect()
}
