//! API request/response models for sensors and readings.

use crate::db::models::sensors::{
    SensorCreateDBRequest, SensorDBResponse, SensorReadingCreateDBRequest,
    SensorReadingDBResponse, SensorUpdateDBRequest,
};
use crate::types::{RegionId, SensorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SensorResponse {
    pub id: SensorId,
    pub region_id: RegionId,
    pub model: String,
    pub monitor_type: String,
    pub install_time: DateTime<Utc>,
    pub protocol: String,
    pub status: String,
}

impl From<SensorDBResponse> for SensorResponse {
    fn from(sensor: SensorDBResponse) -> Self {
        Self {
            id: sensor.id,
            region_id: sensor.region_id,
            model: sensor.model,
            monitor_type: sensor.monitor_type,
            install_time: sensor.install_time,
            protocol: sensor.protocol,
            status: sensor.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorCreate {
    pub region_id: RegionId,
    pub model: String,
    pub monitor_type: String,
    pub install_time: Option<DateTime<Utc>>,
    pub protocol: String,
    pub status: Option<String>,
}

impl From<SensorCreate> for SensorCreateDBRequest {
    fn from(request: SensorCreate) -> Self {
        Self {
            region_id: request.region_id,
            model: request.model,
            monitor_type: request.monitor_type,
            install_time: request.install_time,
            protocol: request.protocol,
            status: request.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorUpdate {
    pub region_id: Option<RegionId>,
    pub model: Option<String>,
    pub monitor_type: Option<String>,
    pub protocol: Option<String>,
    pub status: Option<String>,
}

impl From<SensorUpdate> for SensorUpdateDBRequest {
    fn from(request: SensorUpdate) -> Self {
        Self {
            region_id: request.region_id,
            model: request.model,
            monitor_type: request.monitor_type,
            protocol: request.protocol,
            status: request.status,
        }
    }
}

/// Body for the status-only patch
#[derive(Debug, Clone, Deserialize)]
pub struct SensorStatusUpdate {
    pub status: String,
}

/// Query parameters for listing sensors
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorListParams {
    pub region_id: Option<RegionId>,
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorReadingResponse {
    pub id: i64,
    pub sensor_id: SensorId,
    pub collected_at: DateTime<Utc>,
    pub reading_type: String,
    pub numeric_value: Option<f64>,
    pub value_unit: Option<String>,
    pub media_path: Option<String>,
    pub data_status: String,
}

impl From<SensorReadingDBResponse> for SensorReadingResponse {
    fn from(reading: SensorReadingDBResponse) -> Self {
        Self {
            id: reading.id,
            sensor_id: reading.sensor_id,
            collected_at: reading.collected_at,
            reading_type: reading.reading_type,
            numeric_value: reading.numeric_value,
            value_unit: reading.value_unit,
            media_path: reading.media_path,
            data_status: reading.data_status,
        }
    }
}

/// Body for recording a reading; the sensor id comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct SensorReadingCreate {
    pub collected_at: Option<DateTime<Utc>>,
    pub reading_type: String,
    pub numeric_value: Option<f64>,
    pub value_unit: Option<String>,
    pub media_path: Option<String>,
    pub data_status: Option<String>,
}

impl SensorReadingCreate {
    pub fn into_db_request(self, sensor_id: SensorId) -> SensorReadingCreateDBRequest {
        SensorReadingCreateDBRequest {
            sensor_id,
            collected_at: self.collected_at,
            reading_type: self.reading_type,
            numeric_value: self.numeric_value,
            value_unit: self.value_unit,
            media_path: self.media_path,
            data_status: self.data_status,
        }
    }
}

/// One row in a batch ingest; unlike [`SensorReadingCreate`] the sensor id
/// travels in the body, since a batch can span sensors
#[derive(Debug, Clone, Deserialize)]
pub struct SensorReadingBatchItem {
    pub sensor_id: SensorId,
    pub collected_at: Option<DateTime<Utc>>,
    pub reading_type: String,
    pub numeric_value: Option<f64>,
    pub value_unit: Option<String>,
    pub media_path: Option<String>,
    pub data_status: Option<String>,
}

impl From<SensorReadingBatchItem> for SensorReadingCreateDBRequest {
    fn from(item: SensorReadingBatchItem) -> Self {
        Self {
            sensor_id: item.sensor_id,
            collected_at: item.collected_at,
            reading_type: item.reading_type,
            numeric_value: item.numeric_value,
            value_unit: item.value_unit,
            media_path: item.media_path,
            data_status: item.data_status,
        }
    }
}

/// Query parameters for listing readings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingListParams {
    pub limit: Option<i64>,
}
