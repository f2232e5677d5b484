//! Alert model - one row per notification attempt

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub stick_code: String,
    pub recipient: String,
    pub delivered: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AlertFilter {
    pub stick_code: Option<String>,
    pub limit: Option<i64>,
}

impl Alert {
    pub async fn record(
        pool: &PgPool,
        stick_code: &str,
        recipient: &str,
        error: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (stick_code, recipient, delivered, error)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(stick_code)
        .bind(recipient)
        .bind(error.is_none())
        .bind(&error)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, filter: AlertFilter) -> Result<Vec<Self>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(50).clamp(1, 500);

        sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE ($1::VARCHAR IS NULL OR stick_code = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#
        )
        .bind(&filter.stick_code)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
