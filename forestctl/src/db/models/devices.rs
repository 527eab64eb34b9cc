//! Database models for field devices, status logs and maintenance records.

use crate::types::{DeviceId, RegionId, UserId};
use chrono::{DateTime, Utc};

/// Database response for a device
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceDBResponse {
    pub id: DeviceId,
    pub name: String,
    pub r#type: String,
    pub model_spec: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub install_region_id: Option<RegionId>,
    pub installer_id: Option<UserId>,
    pub warranty_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating a device
#[derive(Debug, Clone)]
pub struct DeviceCreateDBRequest {
    pub name: String,
    pub r#type: String,
    pub model_spec: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub install_region_id: Option<RegionId>,
    pub installer_id: Option<UserId>,
    pub warranty_until: Option<DateTime<Utc>>,
}

/// Database request for updating a device
#[derive(Debug, Clone)]
pub struct DeviceUpdateDBRequest {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub model_spec: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub install_region_id: Option<RegionId>,
    pub installer_id: Option<UserId>,
    pub warranty_until: Option<DateTime<Utc>>,
}

/// Database response for a device status log entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceStatusLogDBResponse {
    pub id: i64,
    pub device_id: DeviceId,
    pub collected_at: DateTime<Utc>,
    pub run_status: String,
    pub battery_percent: Option<i32>,
    pub signal_strength: Option<i32>,
}

/// Database request for recording a device status log entry
#[derive(Debug, Clone)]
pub struct DeviceStatusLogCreateDBRequest {
    pub device_id: DeviceId,
    pub collected_at: Option<DateTime<Utc>>,
    pub run_status: String,
    pub battery_percent: Option<i32>,
    pub signal_strength: Option<i32>,
}

/// Database response for a maintenance record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MaintenanceRecordDBResponse {
    pub id: i64,
    pub device_id: DeviceId,
    pub maintenance_type: String,
    pub maintenance_time: DateTime<Utc>,
    pub maintainer_id: Option<UserId>,
    pub content: Option<String>,
    pub result: Option<String>,
}

/// Database request for recording a maintenance record
#[derive(Debug, Clone)]
pub struct MaintenanceRecordCreateDBRequest {
    pub device_id: DeviceId,
    pub maintenance_type: String,
    pub maintenance_time: Option<DateTime<Utc>>,
    pub maintainer_id: Option<UserId>,
    pub content: Option<String>,
    pub result: Option<String>,
}
