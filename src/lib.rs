//! StickWatch Cloud Backend
//!
//! Collects telemetry from smart walking sticks and watches it for fall or
//! unstable-gait episodes, emailing the stick's supervisors when one is
//! confirmed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    STICKWATCH CLOUD                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │  API      │  │  Monitor         │  │  Notifier       │  │
//! │  │  (Axum)   │  │  (scheduled job) │──▶  (mail relay)   │  │
//! │  └─────┬─────┘  └────────┬─────────┘  └─────────────────┘  │
//! │        │                 │ detection core (pure)            │
//! │        └────────┬────────┘                                  │
//! │                 ▼                                           │
//! │          ┌─────────────┐                                    │
//! │          │ PostgreSQL  │                                    │
//! │          └─────────────┘                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod detection;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod monitor;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
    pub monitor: monitor::Monitor,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        // Stick uploads
        .route("/api/v1/telemetry", post(handlers::telemetry::ingest));

    // Management routes (admin API key)
    let management_routes = Router::new()
        // Detection
        .route("/api/v1/detection/run", post(handlers::detection::run))
        .route("/api/v1/detection/evaluate", post(handlers::detection::evaluate_batch))

        // Alerts
        .route("/api/v1/alerts", get(handlers::alerts::list))

        // Supervisors
        .route(
            "/api/v1/devices/:stick_code/supervisors",
            get(handlers::supervisors::list).post(handlers::supervisors::create),
        )

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(management_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
