//! Telemetry ingest handler

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::Value;

use crate::{AppState, AppResult};
use crate::models::{CreateReading, CreateReadingResponse, SensorReading};

/// Store one reading uploaded by a stick. The server stamps the time.
pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<CreateReadingResponse>> {
    let data = CreateReading::from_payload(payload)?;
    let recorded_at = Utc::now().timestamp_millis();

    let reading = SensorReading::create(&state.pool, data, recorded_at).await?;

    tracing::debug!("Reading stored for stick {} at {}", reading.stick_code, reading.recorded_at);

    Ok(Json(CreateReadingResponse {
        id: reading.id,
        recorded_at: reading.recorded_at,
    }))
}
