//! Sensor reading model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::detection::RawSample;
use crate::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SensorReading {
    pub id: Uuid,
    pub stick_code: String,
    pub user_ref: Option<Value>,
    pub gps: Option<Value>,
    pub imu: Value,
    pub pressure: Option<Value>,
    pub battery: Option<Value>,
    /// Epoch milliseconds
    pub recorded_at: i64,
    pub created_at: DateTime<Utc>,
}

/// Upload payload as sent by the stick firmware
#[derive(Debug, Clone, Validate)]
pub struct CreateReading {
    #[validate(length(min = 1, max = 64))]
    pub stick_code: String,
    pub user: Value,
    pub gps_device: Value,
    pub imu: Value,
    pub pressure: Value,
    pub battery: Value,
}

#[derive(Debug, Serialize)]
pub struct CreateReadingResponse {
    pub id: Uuid,
    pub recorded_at: i64,
}

impl CreateReading {
    /// Parse an upload body.
    ///
    /// Accepts the payload at the root or wrapped by a gateway as
    /// `{"body": "<json string>"}`. Every field must be present, in
    /// the order checked below; `null` values are accepted and stored.
    pub fn from_payload(payload: Value) -> Result<Self, AppError> {
        let mut body = match payload {
            Value::Object(map) if map.contains_key("stick_code") => map,
            Value::Object(map) => match map.get("body") {
                Some(Value::String(raw)) if !raw.is_empty() => {
                    match serde_json::from_str::<Value>(raw) {
                        Ok(Value::Object(inner)) => inner,
                        _ => return Err(AppError::ValidationError("Invalid request format.".to_string())),
                    }
                }
                _ => return Err(AppError::ValidationError("Invalid request format.".to_string())),
            },
            _ => return Err(AppError::ValidationError("Invalid request format.".to_string())),
        };

        let stick_code = match body.remove("stick_code") {
            Some(Value::String(code)) => code,
            Some(_) => return Err(AppError::ValidationError("stick_code must be a string".to_string())),
            None => return Err(AppError::MissingKey("stick_code".to_string())),
        };
        let mut take = |key: &str| {
            body.remove(key)
                .ok_or_else(|| AppError::MissingKey(key.to_string()))
        };

        let reading = Self {
            stick_code,
            user: take("user")?,
            gps_device: take("GPS_device")?,
            imu: take("IMU")?,
            pressure: take("pressure")?,
            battery: take("battery")?,
        };
        reading.validate()?;
        Ok(reading)
    }
}

impl SensorReading {
    pub async fn create(
        pool: &PgPool,
        data: CreateReading,
        recorded_at: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensor_readings (stick_code, user_ref, gps, imu, pressure, battery, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#
        )
        .bind(&data.stick_code)
        .bind(&data.user)
        .bind(&data.gps_device)
        .bind(&data.imu)
        .bind(&data.pressure)
        .bind(&data.battery)
        .bind(recorded_at)
        .fetch_one(pool)
        .await
    }

    /// Readings with `start <= recorded_at < end`, in no particular order
    pub async fn fetch_window(
        pool: &PgPool,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<RawSample>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64, Value)>(
            r#"
            SELECT stick_code, recorded_at, imu
            FROM sensor_readings
            WHERE recorded_at >= $1 AND recorded_at < $2
            "#
        )
        .bind(start_ms)
        .bind(end_ms)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(stick_code, recorded_at, imu)| RawSample::new(stick_code, recorded_at, imu))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_at_root() {
        let payload = json!({
            "stick_code": "STICK-42",
            "user": "maria",
            "GPS_device": {"latitude": 40.4, "longitude": -3.7},
            "IMU": {"accelerometer": {"x": "0.01", "y": "0.02", "z": "9.8"}},
            "pressure": 3,
            "battery": 87
        });
        let reading = CreateReading::from_payload(payload).unwrap();
        assert_eq!(reading.stick_code, "STICK-42");
        assert_eq!(reading.user, json!("maria"));
        assert_eq!(reading.battery, json!(87));
        assert!(reading.imu.get("accelerometer").is_some());
    }

    #[test]
    fn test_payload_wrapped_in_body() {
        let inner = json!({
            "stick_code": "S1",
            "user": null,
            "GPS_device": null,
            "IMU": {},
            "pressure": null,
            "battery": 50
        })
        .to_string();
        let reading = CreateReading::from_payload(json!({ "body": inner })).unwrap();
        assert_eq!(reading.stick_code, "S1");
        assert_eq!(reading.gps_device, Value::Null);
    }

    #[test]
    fn test_missing_keys() {
        let err = CreateReading::from_payload(json!({"stick_code": "S1"})).unwrap_err();
        assert_eq!(err.to_string(), "Missing key: user");

        let err = CreateReading::from_payload(json!({
            "stick_code": "S1", "user": "u", "GPS_device": {}, "pressure": 1, "battery": 2
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing key: IMU");

        let err = CreateReading::from_payload(json!({
            "stick_code": "S1", "user": "u", "GPS_device": {}, "IMU": {}, "pressure": 1
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing key: battery");

        let err = CreateReading::from_payload(json!({"body": "{\"IMU\": {}}"})).unwrap_err();
        assert_eq!(err.to_string(), "Missing key: stick_code");
    }

    #[test]
    fn test_invalid_format() {
        assert!(matches!(
            CreateReading::from_payload(json!({"foo": 1})),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            CreateReading::from_payload(json!([1, 2])),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            CreateReading::from_payload(json!({
                "stick_code": "",
                "user": null,
                "GPS_device": null,
                "IMU": {},
                "pressure": null,
                "battery": null
            })),
            Err(AppError::ValidationError(_))
        ));
    }
}
