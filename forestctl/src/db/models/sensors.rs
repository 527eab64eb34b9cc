//! Database models for sensors and their readings.

use crate::types::{RegionId, SensorId};
use chrono::{DateTime, Utc};

/// Database response for a sensor
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SensorDBResponse {
    pub id: SensorId,
    pub region_id: RegionId,
    pub model: String,
    pub monitor_type: String,
    pub install_time: DateTime<Utc>,
    pub protocol: String,
    pub status: String,
}

/// Database request for creating a sensor
#[derive(Debug, Clone)]
pub struct SensorCreateDBRequest {
    pub region_id: RegionId,
    pub model: String,
    pub monitor_type: String,
    pub install_time: Option<DateTime<Utc>>,
    pub protocol: String,
    pub status: Option<String>,
}

/// Database request for updating a sensor
#[derive(Debug, Clone)]
pub struct SensorUpdateDBRequest {
    pub region_id: Option<RegionId>,
    pub model: Option<String>,
    pub monitor_type: Option<String>,
    pub protocol: Option<String>,
    pub status: Option<String>,
}

/// Database response for a sensor reading
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SensorReadingDBResponse {
    pub id: i64,
    pub sensor_id: SensorId,
    pub collected_at: DateTime<Utc>,
    pub reading_type: String,
    pub numeric_value: Option<f64>,
    pub value_unit: Option<String>,
    pub media_path: Option<String>,
    pub data_status: String,
}

/// Database request for recording a sensor reading
#[derive(Debug, Clone)]
pub struct SensorReadingCreateDBRequest {
    pub sensor_id: SensorId,
    pub collected_at: Option<DateTime<Utc>>,
    pub reading_type: String,
    pub numeric_value: Option<f64>,
    pub value_unit: Option<String>,
    pub media_path: Option<String>,
    pub data_status: Option<String>,
}
