//! Detection cycle orchestration
//!
//! One cycle: fetch the trailing window, group by stick, evaluate every
//! stick on its own task, notify supervisors of confirmed episodes.
//!
//! Only a failed fetch aborts the cycle. Everything downstream is isolated
//! per stick and per recipient.

pub mod notifier;
pub mod postgres;
pub mod scheduler;
pub mod traits;

pub use notifier::{LogNotifier, MailRelayNotifier, RecordingNotifier};
pub use postgres::{PgRecipientDirectory, PgSampleSource};
pub use traits::{Notifier, RecipientDirectory, SampleSource};

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::detection::{self, partition_by_device, DetectionParams, DeviceStream, EpisodeVerdict, RawSample};
use crate::error::MonitorError;

/// Runs detection cycles against the configured collaborators
#[derive(Clone)]
pub struct Monitor {
    source: Arc<dyn SampleSource>,
    directory: Arc<dyn RecipientDirectory>,
    notifier: Arc<dyn Notifier>,
    params: DetectionParams,
    lookback_ms: i64,
}

/// Result of one cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub window_start: i64,
    pub window_end: i64,
    pub sample_count: usize,
    pub devices: Vec<DeviceOutcome>,
}

impl CycleReport {
    pub fn confirmed_devices(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.devices.iter().filter(|d| d.episode_confirmed())
    }

    pub fn failed_devices(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.devices.iter().filter(|d| d.error.is_some())
    }
}

/// What happened to one stick during a cycle
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceOutcome {
    pub device_id: String,
    pub sample_count: usize,
    /// Samples whose acceleration could not be extracted
    pub malformed_count: usize,
    /// `None` when evaluation itself failed
    pub verdict: Option<EpisodeVerdict>,
    pub recipients: usize,
    pub notified: usize,
    pub failed_notifications: usize,
    pub error: Option<String>,
}

impl DeviceOutcome {
    pub fn episode_confirmed(&self) -> bool {
        self.verdict.is_some_and(|v| v.confirmed)
    }
}

impl Monitor {
    pub fn new(
        source: Arc<dyn SampleSource>,
        directory: Arc<dyn RecipientDirectory>,
        notifier: Arc<dyn Notifier>,
        params: DetectionParams,
        lookback_ms: i64,
    ) -> Self {
        Self {
            source,
            directory,
            notifier,
            params,
            lookback_ms,
        }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Run one cycle over the window ending now
    pub async fn run_cycle(&self) -> Result<CycleReport, MonitorError> {
        self.run_cycle_at(Utc::now().timestamp_millis()).await
    }

    /// Run one cycle over `[now_ms - lookback, now_ms)`
    pub async fn run_cycle_at(&self, now_ms: i64) -> Result<CycleReport, MonitorError> {
        let window_start = now_ms - self.lookback_ms;
        tracing::info!("Detection cycle started for window [{}, {})", window_start, now_ms);

        let batch = self
            .source
            .fetch_window(window_start, now_ms)
            .await
            .map_err(MonitorError::Retrieval)?;
        tracing::info!("Retrieved {} readings", batch.len());

        let mut report = self.evaluate_batch(batch).await;
        report.window_start = window_start;
        report.window_end = now_ms;

        tracing::info!(
            "Detection cycle finished: {} sticks, {} episodes, {} failures",
            report.devices.len(),
            report.confirmed_devices().count(),
            report.failed_devices().count()
        );
        Ok(report)
    }

    /// Evaluate an already retrieved batch and dispatch alerts
    pub async fn evaluate_batch(&self, batch: Vec<RawSample>) -> CycleReport {
        let sample_count = batch.len();
        let streams = partition_by_device(batch.into_iter().map(RawSample::extract));

        let handles: Vec<_> = streams
            .into_iter()
            .map(|stream| {
                let device_id = stream.device_id().to_string();
                let monitor = self.clone();
                (device_id, tokio::spawn(async move { monitor.process_device(stream).await }))
            })
            .collect();

        let mut devices = Vec::with_capacity(handles.len());
        for (device_id, handle) in handles {
            match handle.await {
                Ok(outcome) => devices.push(outcome),
                Err(e) => {
                    tracing::error!("Processing failed for stick {}: {}", device_id, e);
                    devices.push(DeviceOutcome {
                        device_id,
                        error: Some(e.to_string()),
                        ..Default::default()
                    });
                }
            }
        }

        CycleReport {
            window_start: 0,
            window_end: 0,
            sample_count,
            devices,
        }
    }

    async fn process_device(&self, stream: DeviceStream) -> DeviceOutcome {
        let device_id = stream.device_id().to_string();
        let malformed_count = stream
            .samples()
            .iter()
            .filter(|s| !s.acceleration.is_complete())
            .count();

        let verdict = detection::detect(&stream, &self.params);
        let mut outcome = DeviceOutcome {
            device_id,
            sample_count: stream.len(),
            malformed_count,
            verdict: Some(verdict),
            ..Default::default()
        };

        if !verdict.confirmed {
            tracing::debug!(
                "No fall detected for stick {} ({} samples, longest run {})",
                outcome.device_id,
                outcome.sample_count,
                verdict.longest_run
            );
            return outcome;
        }

        tracing::info!(
            "Possible fall detected for stick {} (run of {} samples)",
            outcome.device_id,
            verdict.longest_run
        );
        self.dispatch(&mut outcome).await;
        outcome
    }

    async fn dispatch(&self, outcome: &mut DeviceOutcome) {
        let recipients = match self.directory.resolve(&outcome.device_id).await {
            Ok(recipients) => recipients,
            Err(e) => {
                tracing::error!("Error resolving recipients for stick {}: {}", outcome.device_id, e);
                outcome.error = Some(format!("recipient resolution failed: {}", e));
                Vec::new()
            }
        };

        outcome.recipients = recipients.len();
        if recipients.is_empty() {
            tracing::warn!("No supervisor email found for stick {}", outcome.device_id);
            return;
        }

        for recipient in &recipients {
            match self.notifier.notify(recipient, &outcome.device_id).await {
                Ok(()) => outcome.notified += 1,
                Err(e) => {
                    outcome.failed_notifications += 1;
                    tracing::error!(
                        "Error sending alert to {} for stick {}: {}",
                        recipient,
                        outcome.device_id,
                        e
                    );
                }
            }
        }
    }
}
