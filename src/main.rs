//! StickWatch Cloud Server
//!
//! Entry point: logging, configuration, database, detection scheduler and
//! HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stickwatch_cloud::{config, create_router, db, monitor, AppState};
use stickwatch_cloud::monitor::{
    LogNotifier, MailRelayNotifier, Monitor, Notifier, PgRecipientDirectory, PgSampleSource,
    RecordingNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    let config = config::Config::from_env();
    config.validate().context("Invalid configuration")?;

    tracing::info!("StickWatch Cloud Server starting...");
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));
    tracing::info!("Detection parameters: {:?}", config.detection);

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Build detection monitor
    let delivery: Arc<dyn Notifier> = match &config.mail {
        Some(mail) => {
            tracing::info!("Alerts delivered through mail relay {}", mail.relay_url);
            Arc::new(MailRelayNotifier::new(mail.clone()).context("Failed to build mail client")?)
        }
        None => {
            tracing::warn!("MAIL_RELAY_URL not set, alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };
    let monitor = Monitor::new(
        Arc::new(PgSampleSource::new(pool.clone())),
        Arc::new(PgRecipientDirectory::new(pool.clone())),
        Arc::new(RecordingNotifier::new(delivery, pool.clone())),
        config.detection,
        config.lookback_ms(),
    );

    let scheduler = match config.detection_interval() {
        Some(period) => Some(monitor::scheduler::spawn(monitor.clone(), period)),
        None => {
            tracing::info!("Detection scheduler disabled, use POST /api/v1/detection/run");
            None
        }
    };

    // Build application state
    let state = AppState {
        pool,
        config: config.clone(),
        monitor,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    tracing::info!("StickWatch Cloud Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stickwatch_cloud=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
