//! Database models for roles and permissions.

use crate::types::{PermissionId, RoleId};
use chrono::{DateTime, Utc};

/// Database response for a role
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoleDBResponse {
    pub id: RoleId,
    pub role_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a role
#[derive(Debug, Clone)]
pub struct RoleCreateDBRequest {
    pub role_name: String,
    pub description: Option<String>,
}

/// Database request for updating a role
#[derive(Debug, Clone)]
pub struct RoleUpdateDBRequest {
    pub role_name: Option<String>,
    pub description: Option<String>,
}

/// Database response for a permission
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PermissionDBResponse {
    pub id: PermissionId,
    pub permission_name: String,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a permission
#[derive(Debug, Clone)]
pub struct PermissionCreateDBRequest {
    pub permission_name: String,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
}

/// Database request for updating a permission
#[derive(Debug, Clone)]
pub struct PermissionUpdateDBRequest {
    pub permission_name: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    pub description: Option<String>,
}
