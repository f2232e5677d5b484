//! PostgreSQL-backed sample source and recipient directory

use async_trait::async_trait;
use sqlx::PgPool;

use crate::detection::RawSample;
use crate::error::SourceError;
use crate::models::{SensorReading, Supervisor};

use super::traits::{RecipientDirectory, SampleSource};

#[derive(Clone)]
pub struct PgSampleSource {
    pool: PgPool,
}

impl PgSampleSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SampleSource for PgSampleSource {
    async fn fetch_window(&self, start_ms: i64, end_ms: i64) -> Result<Vec<RawSample>, SourceError> {
        let samples = SensorReading::fetch_window(&self.pool, start_ms, end_ms).await?;
        tracing::debug!("Fetched {} readings in [{}, {})", samples.len(), start_ms, end_ms);
        Ok(samples)
    }
}

#[derive(Clone)]
pub struct PgRecipientDirectory {
    pool: PgPool,
}

impl PgRecipientDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientDirectory for PgRecipientDirectory {
    async fn resolve(&self, device_id: &str) -> Result<Vec<String>, SourceError> {
        Ok(Supervisor::alert_emails(&self.pool, device_id).await?)
    }
}
