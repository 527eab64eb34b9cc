//! Database models for monitoring regions.

use crate::types::{RegionId, UserId};
use chrono::{DateTime, Utc};

/// Database response for a region
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegionDBResponse {
    pub id: RegionId,
    pub name: String,
    pub r#type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating a region
#[derive(Debug, Clone)]
pub struct RegionCreateDBRequest {
    pub name: String,
    pub r#type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_id: Option<UserId>,
}

/// Database request for updating a region
#[derive(Debug, Clone)]
pub struct RegionUpdateDBRequest {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_id: Option<UserId>,
}
