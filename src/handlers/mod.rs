//! HTTP handlers

pub mod health;
pub mod telemetry;
pub mod detection;
pub mod alerts;
pub mod supervisors;
