//! API request/response models for devices, status logs and maintenance.

use crate::db::models::devices::{
    DeviceCreateDBRequest, DeviceDBResponse, DeviceStatusLogCreateDBRequest,
    DeviceStatusLogDBResponse, DeviceUpdateDBRequest, MaintenanceRecordCreateDBRequest,
    MaintenanceRecordDBResponse,
};
use crate::types::{DeviceId, RegionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct DeviceResponse {
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

impl From<DeviceDBResponse> for DeviceResponse {
    fn from(device: DeviceDBResponse) -> Self {
        Self {
            id: device.id,
            name: device.name,
            r#type: device.r#type,
            model_spec: device.model_spec,
            purchased_at: device.purchased_at,
            install_region_id: device.install_region_id,
            installer_id: device.installer_id,
            warranty_until: device.warranty_until,
            created_at: device.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCreate {
    pub name: String,
    pub r#type: String,
    pub model_spec: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub install_region_id: Option<RegionId>,
    pub installer_id: Option<UserId>,
    pub warranty_until: Option<DateTime<Utc>>,
}

impl From<DeviceCreate> for DeviceCreateDBRequest {
    fn from(request: DeviceCreate) -> Self {
        Self {
            name: request.name,
            r#type: request.r#type,
            model_spec: request.model_spec,
            purchased_at: request.purchased_at,
            install_region_id: request.install_region_id,
            installer_id: request.installer_id,
            warranty_until: request.warranty_until,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub model_spec: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub install_region_id: Option<RegionId>,
    pub installer_id: Option<UserId>,
    pub warranty_until: Option<DateTime<Utc>>,
}

impl From<DeviceUpdate> for DeviceUpdateDBRequest {
    fn from(request: DeviceUpdate) -> Self {
        Self {
            name: request.name,
            r#type: request.r#type,
            model_spec: request.model_spec,
            purchased_at: request.purchased_at,
            install_region_id: request.install_region_id,
            installer_id: request.installer_id,
            warranty_until: request.warranty_until,
        }
    }
}

/// Query parameters for listing devices
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceListParams {
    pub r#type: Option<String>,
    pub install_region_id: Option<RegionId>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatusLogResponse {
    pub id: i64,
    pub device_id: DeviceId,
    pub collected_at: DateTime<Utc>,
    pub run_status: String,
    pub battery_percent: Option<i32>,
    pub signal_strength: Option<i32>,
}

impl From<DeviceStatusLogDBResponse> for DeviceStatusLogResponse {
    fn from(log: DeviceStatusLogDBResponse) -> Self {
        Self {
            id: log.id,
            device_id: log.device_id,
            collected_at: log.collected_at,
            run_status: log.run_status,
            battery_percent: log.battery_percent,
            signal_strength: log.signal_strength,
        }
    }
}

/// Body for recording a status report; the device id comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatusLogCreate {
    pub collected_at: Option<DateTime<Utc>>,
    pub run_status: String,
    pub battery_percent: Option<i32>,
    pub signal_strength: Option<i32>,
}

impl DeviceStatusLogCreate {
    pub fn into_db_request(self, device_id: DeviceId) -> DeviceStatusLogCreateDBRequest {
        DeviceStatusLogCreateDBRequest {
            device_id,
            collected_at: self.collected_at,
            run_status: self.run_status,
            battery_percent: self.battery_percent,
            signal_strength: self.signal_strength,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceRecordResponse {
    pub id: i64,
    pub device_id: DeviceId,
    pub maintenance_type: String,
    pub maintenance_time: DateTime<Utc>,
    pub maintainer_id: Option<UserId>,
    pub content: Option<String>,
    pub result: Option<String>,
}

impl From<MaintenanceRecordDBResponse> for MaintenanceRecordResponse {
    fn from(record: MaintenanceRecordDBResponse) -> Self {
        Self {
            id: record.id,
            device_id: record.device_id,
            maintenance_type: record.maintenance_type,
            maintenance_time: record.maintenance_time,
            maintainer_id: record.maintainer_id,
            content: record.content,
            result: record.result,
        }
    }
}

/// Body for recording maintenance; the device id comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceRecordCreate {
    pub maintenance_type: String,
    pub maintenance_time: Option<DateTime<Utc>>,
    pub maintainer_id: Option<UserId>,
    pub content: Option<String>,
    pub result: Option<String>,
}

impl MaintenanceRecordCreate {
    pub fn into_db_request(self, device_id: DeviceId) -> MaintenanceRecordCreateDBRequest {
        MaintenanceRecordCreateDBRequest {
            device_id,
            maintenance_type: self.maintenance_type,
            maintenance_time: self.maintenance_time,
            maintainer_id: self.maintainer_id,
            content: self.content,
            result: self.result,
        }
    }
}
