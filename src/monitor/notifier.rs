//! Alert delivery
//!
//! - `MailRelayNotifier`: POSTs the message to an HTTP mail relay
//! - `LogNotifier`: logs only, used when no relay is configured
//! - `RecordingNotifier`: wraps another notifier and stores every attempt

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::MailConfig;
use crate::error::NotifyError;
use crate::models::Alert;

use super::traits::Notifier;

pub const ALERT_SUBJECT: &str = "Fall Detected Alert";

const RELAY_TIMEOUT_SECS: u64 = 10;

/// Human-readable alert body for a stick
pub fn alert_body(device_id: &str) -> String {
    format!(
        "A potential fall has been detected for your stick with code {}. Please check on the user.",
        device_id
    )
}

// ============================================================================
// MAIL RELAY
// ============================================================================

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

pub struct MailRelayNotifier {
    config: MailConfig,
    http_client: reqwest::Client,
}

impl MailRelayNotifier {
    pub fn new(config: MailConfig) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .build()?;

        Ok(Self { config, http_client })
    }
}

#[async_trait]
impl Notifier for MailRelayNotifier {
    async fn notify(&self, recipient: &str, device_id: &str) -> Result<(), NotifyError> {
        let message = RelayMessage {
            from: &self.config.sender,
            to: recipient,
            subject: ALERT_SUBJECT,
            text: alert_body(device_id),
        };

        let mut request = self.http_client.post(&self.config.relay_url).json(&message);
        if let Some(token) = &self.config.relay_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status: status.as_u16(), body });
        }

        tracing::info!("Email sent successfully to {} for stick {}", recipient, device_id);
        Ok(())
    }
}

// ============================================================================
// LOG ONLY
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: &str, device_id: &str) -> Result<(), NotifyError> {
        tracing::warn!(
            recipient = %recipient,
            stick_code = %device_id,
            "[ALERT] {} (no mail relay configured): {}",
            ALERT_SUBJECT,
            alert_body(device_id)
        );
        Ok(())
    }
}

// ============================================================================
// ALERT HISTORY
// ============================================================================

/// Records each attempt in the `alerts` table, then passes the result through.
///
/// A failure to record is logged and never changes the delivery result.
pub struct RecordingNotifier {
    inner: Arc<dyn Notifier>,
    pool: PgPool,
}

impl RecordingNotifier {
    pub fn new(inner: Arc<dyn Notifier>, pool: PgPool) -> Self {
        Self { inner, pool }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: &str, device_id: &str) -> Result<(), NotifyError> {
        let result = self.inner.notify(recipient, device_id).await;
        let error = result.as_ref().err().map(|e| e.to_string());

        if let Err(e) = Alert::record(&self.pool, device_id, recipient, error).await {
            tracing::warn!("Failed to record alert for {}: {}", device_id, e);
        }

        result
    }
}
