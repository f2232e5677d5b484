//! Background detection job

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::Monitor;

/// Run a detection cycle every `period` until the task is aborted.
///
/// Cycles never overlap: a slow cycle pushes the next tick back.
pub fn spawn(monitor: Monitor, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Detection scheduler started (every {}s)", period.as_secs());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match monitor.run_cycle().await {
                Ok(report) => {
                    for device in report.confirmed_devices() {
                        tracing::info!(
                            "Episode on stick {}: {} of {} recipients notified",
                            device.device_id,
                            device.notified,
                            device.recipients
                        );
                    }
                }
                Err(e) => tracing::error!("Detection cycle failed: {}", e),
            }
        }
    })
}
