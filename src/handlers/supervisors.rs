//! Supervisor handlers

use axum::{extract::{State, Path}, Json};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::models::{CreateSupervisor, Supervisor};

/// List responsible parties of a stick
pub async fn list(
    State(state): State<AppState>,
    Path(stick_code): Path<String>,
) -> AppResult<Json<Vec<Supervisor>>> {
    let supervisors = Supervisor::list_by_stick(&state.pool, &stick_code).await?;
    Ok(Json(supervisors))
}

/// Register (or update) a responsible party for a stick
pub async fn create(
    State(state): State<AppState>,
    Path(stick_code): Path<String>,
    Json(req): Json<CreateSupervisor>,
) -> AppResult<Json<Supervisor>> {
    req.validate()?;

    let supervisor = Supervisor::create(&state.pool, &stick_code, req).await?;
    tracing::info!("Supervisor {} registered for stick {}", supervisor.email, stick_code);

    Ok(Json(supervisor))
}
