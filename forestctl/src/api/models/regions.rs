//! API request/response models for regions.

use crate::db::models::regions::{
    RegionCreateDBRequest, RegionDBResponse, RegionUpdateDBRequest,
};
use crate::types::{RegionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct RegionResponse {
    pub id: RegionId,
    pub name: String,
    pub r#type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<RegionDBResponse> for RegionResponse {
    fn from(region: RegionDBResponse) -> Self {
        Self {
            id: region.id,
            name: region.name,
            r#type: region.r#type,
            latitude: region.latitude,
            longitude: region.longitude,
            manager_id: region.manager_id,
            created_at: region.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionCreate {
    pub name: String,
    pub r#type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_id: Option<UserId>,
}

impl From<RegionCreate> for RegionCreateDBRequest {
    fn from(request: RegionCreate) -> Self {
        Self {
            name: request.name,
            r#type: request.r#type,
            latitude: request.latitude,
            longitude: request.longitude,
            manager_id: request.manager_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionUpdate {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_id: Option<UserId>,
}

impl From<RegionUpdate> for RegionUpdateDBRequest {
    fn from(request: RegionUpdate) -> Self {
        Self {
            name: request.name,
            r#type: request.r#type,
            latitude: request.latitude,
            longitude: request.longitude,
            manager_id: request.manager_id,
        }
    }
}

/// Query parameters for listing regions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionListParams {
    pub r#type: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
