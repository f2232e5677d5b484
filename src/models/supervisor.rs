//! Supervisor model - responsible parties for a stick

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;

/// Role that receives fall alerts
pub const SUPERVISOR_ROLE: &str = "supervisor";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supervisor {
    pub id: Uuid,
    pub stick_code: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupervisor {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,
}

impl Supervisor {
    pub async fn create(
        pool: &PgPool,
        stick_code: &str,
        data: CreateSupervisor,
    ) -> Result<Self, sqlx::Error> {
        let role = data.role.unwrap_or_else(|| SUPERVISOR_ROLE.to_string());

        sqlx::query_as::<_, Supervisor>(
            r#"
            INSERT INTO supervisors (stick_code, email, name, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (stick_code, email) DO UPDATE SET
                name = EXCLUDED.name,
                role = EXCLUDED.role
            RETURNING *
            "#
        )
        .bind(stick_code)
        .bind(&data.email)
        .bind(&data.name)
        .bind(&role)
        .fetch_one(pool)
        .await
    }

    pub async fn list_by_stick(pool: &PgPool, stick_code: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Supervisor>(
            "SELECT * FROM supervisors WHERE stick_code = $1 ORDER BY created_at ASC"
        )
        .bind(stick_code)
        .fetch_all(pool)
        .await
    }

    /// Alert addresses for a stick: supervisors only, other roles are skipped
    pub async fn alert_emails(pool: &PgPool, stick_code: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT email FROM supervisors WHERE stick_code = $1 AND role = $2 ORDER BY email"
        )
        .bind(stick_code)
        .bind(SUPERVISOR_ROLE)
        .fetch_all(pool)
        .await
    }
}
