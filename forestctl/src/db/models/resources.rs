//! Database models for forest resources and their change history.

use crate::types::{RegionId, ResourceId, UserId};
use chrono::{DateTime, Utc};

/// Database response for a forest resource
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ForestResourceDBResponse {
    pub id: ResourceId,
    pub resource_type: String,
    pub region_id: RegionId,
    pub species_name: String,
    pub quantity: Option<i64>,
    pub area: Option<f64>,
    pub growth_stage: String,
    pub planted_at: Option<DateTime<Utc>>,
}

/// Database request for creating a forest resource
#[derive(Debug, Clone)]
pub struct ForestResourceCreateDBRequest {
    pub resource_type: String,
    pub region_id: RegionId,
    pub species_name: String,
    pub quantity: Option<i64>,
    pub area: Option<f64>,
    pub growth_stage: String,
    pub planted_at: Option<DateTime<Utc>>,
}

/// Database request for updating a forest resource
#[derive(Debug, Clone)]
pub struct ForestResourceUpdateDBRequest {
    pub resource_type: Option<String>,
    pub region_id: Option<RegionId>,
    pub species_name: Option<String>,
    pub quantity: Option<i64>,
    pub area: Option<f64>,
    pub growth_stage: Option<String>,
    pub planted_at: Option<DateTime<Utc>>,
}

/// Database response for a resource change record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResourceChangeDBResponse {
    pub id: i64,
    pub resource_id: ResourceId,
    pub change_type: String,
    pub change_reason: Option<String>,
    pub change_amount: Option<i32>,
    pub change_area: Option<f64>,
    pub changed_at: DateTime<Utc>,
    pub operator_id: Option<UserId>,
}

/// Database request for recording a resource change
#[derive(Debug, Clone)]
pub struct ResourceChangeCreateDBRequest {
    pub resource_id: ResourceId,
    pub change_type: String,
    pub change_reason: Option<String>,
    pub change_amount: Option<i32>,
    pub change_area: Option<f64>,
    pub operator_id: Option<UserId>,
}
