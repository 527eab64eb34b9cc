//! API request/response models for forest resources and change records.

use crate::db::models::resources::{
    ForestResourceCreateDBRequest, ForestResourceDBResponse, ForestResourceUpdateDBRequest,
    ResourceChangeCreateDBRequest, ResourceChangeDBResponse,
};
use crate::types::{RegionId, ResourceId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ForestResourceResponse {
    pub id: ResourceId,
    pub resource_type: String,
    pub region_id: RegionId,
    pub species_name: String,
    pub quantity: Option<i64>,
    pub area: Option<f64>,
    pub growth_stage: String,
    pub planted_at: Option<DateTime<Utc>>,
}

impl From<ForestResourceDBResponse> for ForestResourceResponse {
    fn from(resource: ForestResourceDBResponse) -> Self {
        Self {
            id: resource.id,
            resource_type: resource.resource_type,
            region_id: resource.region_id,
            species_name: resource.species_name,
            quantity: resource.quantity,
            area: resource.area,
            growth_stage: resource.growth_stage,
            planted_at: resource.planted_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestResourceCreate {
    pub resource_type: String,
    pub region_id: RegionId,
    pub species_name: String,
    pub quantity: Option<i64>,
    pub area: Option<f64>,
    pub growth_stage: String,
    pub planted_at: Option<DateTime<Utc>>,
}

impl From<ForestResourceCreate> for ForestResourceCreateDBRequest {
    fn from(request: ForestResourceCreate) -> Self {
        Self {
            resource_type: request.resource_type,
            region_id: request.region_id,
            species_name: request.species_name,
            quantity: request.quantity,
            area: request.area,
            growth_stage: request.growth_stage,
            planted_at: request.planted_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestResourceUpdate {
    pub resource_type: Option<String>,
    pub region_id: Option<RegionId>,
    pub species_name: Option<String>,
    pub quantity: Option<i64>,
    pub area: Option<f64>,
    pub growth_stage: Option<String>,
    pub planted_at: Option<DateTime<Utc>>,
}

/// Body for the growth-stage-only patch
#[derive(Debug, Clone, Deserialize)]
pub struct GrowthStageUpdate {
    pub growth_stage: String,
}

impl From<ForestResourceUpdate> for ForestResourceUpdateDBRequest {
    fn from(request: ForestResourceUpdate) -> Self {
        Self {
            resource_type: request.resource_type,
            region_id: request.region_id,
            species_name: request.species_name,
            quantity: request.quantity,
            area: request.area,
            growth_stage: request.growth_stage,
            planted_at: request.planted_at,
        }
    }
}

/// Query parameters for listing resources
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForestResourceListParams {
    pub region_id: Option<RegionId>,
    pub resource_type: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceChangeResponse {
    pub id: i64,
    pub resource_id: ResourceId,
    pub change_type: String,
    pub change_reason: Option<String>,
    pub change_amount: Option<i32>,
    pub change_area: Option<f64>,
    pub changed_at: DateTime<Utc>,
    pub operator_id: Option<UserId>,
}

impl From<ResourceChangeDBResponse> for ResourceChangeResponse {
    fn from(change: ResourceChangeDBResponse) -> Self {
        Self {
            id: change.id,
            resource_id: change.resource_id,
            change_type: change.change_type,
            change_reason: change.change_reason,
            change_amount: change.change_amount,
            change_area: change.change_area,
            changed_at: change.changed_at,
            operator_id: change.operator_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceChangeCreate {
    pub resource_id: ResourceId,
    pub change_type: String,
    pub change_reason: Option<String>,
    pub change_amount: Option<i32>,
    pub change_area: Option<f64>,
    pub operator_id: Option<UserId>,
}

impl From<ResourceChangeCreate> for ResourceChangeCreateDBRequest {
    fn from(request: ResourceChangeCreate) -> Self {
        Self {
            resource_id: request.resource_id,
            change_type: request.change_type,
            change_reason: request.change_reason,
            change_amount: request.change_amount,
            change_area: request.change_area,
            operator_id: request.operator_id,
        }
    }
}
