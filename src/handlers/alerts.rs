//! Alert history handlers

use axum::{extract::{State, Query}, Json};

use crate::{AppState, AppResult};
use crate::models::{Alert, AlertFilter};

/// List recent notification attempts
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> AppResult<Json<Vec<Alert>>> {
    let alerts = Alert::list(&state.pool, filter).await?;
    Ok(Json(alerts))
}
