//! Collaborator seams of the detection cycle

use async_trait::async_trait;

use crate::detection::RawSample;
use crate::error::{NotifyError, SourceError};

/// Time-windowed retrieval of raw readings
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Readings with `start_ms <= timestamp < end_ms`, unordered
    async fn fetch_window(&self, start_ms: i64, end_ms: i64) -> Result<Vec<RawSample>, SourceError>;
}

/// Resolves a stick to the addresses of its responsible parties
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn resolve(&self, device_id: &str) -> Result<Vec<String>, SourceError>;
}

/// Delivers one alert to one recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, device_id: &str) -> Result<(), NotifyError>;
}
