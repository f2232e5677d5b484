//! Detection handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppState, AppResult};
use crate::detection::{evaluate, partition_by_device, DetectionParams, RawSample, StreamReport};
use crate::monitor::CycleReport;

/// Run a detection cycle now, outside the schedule
pub async fn run(State(state): State<AppState>) -> AppResult<Json<CycleReport>> {
    let report = state.monitor.run_cycle().await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub samples: Vec<RawSample>,
    /// Overrides the configured parameters for this request only
    pub params: Option<DetectionParams>,
}

/// Dry run: score a posted batch and return every per-sample field.
/// Nothing is stored and nobody is notified.
pub async fn evaluate_batch(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> AppResult<Json<Vec<StreamReport>>> {
    let params = req.params.unwrap_or(*state.monitor.params());
    params.validate()?;

    let streams = partition_by_device(req.samples.into_iter().map(RawSample::extract));
    let reports = streams.iter().map(|s| evaluate(s, &params)).collect();

    Ok(Json(reports))
}
