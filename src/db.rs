//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Raw stick telemetry (recorded_at is epoch milliseconds, server assigned)
CREATE TABLE IF NOT EXISTS sensor_readings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    stick_code VARCHAR(64) NOT NULL,
    user_ref JSONB,
    gps JSONB,
    imu JSONB NOT NULL,
    pressure JSONB,
    battery JSONB,
    recorded_at BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Responsible parties per stick
CREATE TABLE IF NOT EXISTS supervisors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    stick_code VARCHAR(64) NOT NULL,
    email VARCHAR(255) NOT NULL,
    name VARCHAR(255),
    role VARCHAR(50) NOT NULL DEFAULT 'supervisor',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (stick_code, email)
);

-- Notification attempts
CREATE TABLE IF NOT EXISTS alerts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    stick_code VARCHAR(64) NOT NULL,
    recipient VARCHAR(255) NOT NULL,
    delivered BOOLEAN NOT NULL,
    error TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_readings_recorded ON sensor_readings(recorded_at);
CREATE INDEX IF NOT EXISTS idx_readings_stick ON sensor_readings(stick_code, recorded_at);
CREATE INDEX IF NOT EXISTS idx_supervisors_stick ON supervisors(stick_code);
CREATE INDEX IF NOT EXISTS idx_alerts_stick ON alerts(stick_code, created_at);
"#;
