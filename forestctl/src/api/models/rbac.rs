//! API request/response models for roles and permissions.

use crate::db::models::rbac::{
    PermissionCreateDBRequest, PermissionDBResponse, PermissionUpdateDBRequest,
    RoleCreateDBRequest, RoleDBResponse, RoleUpdateDBRequest,
};
use crate::types::{PermissionId, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub id: RoleId,
    pub role_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleDBResponse> for RoleResponse {
    fn from(role: RoleDBResponse) -> Self {
        Self {
            id: role.id,
            role_name: role.role_name,
            description: role.description,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleCreate {
    pub role_name: String,
    pub description: Option<String>,
}

impl From<RoleCreate> for RoleCreateDBRequest {
    fn from(request: RoleCreate) -> Self {
        Self {
            role_name: request.role_name,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdate {
    pub role_name: Option<String>,
    pub description: Option<String>,
}

impl From<RoleUpdate> for RoleUpdateDBRequest {
    fn from(request: RoleUpdate) -> Self {
        Self {
            role_name: request.role_name,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionResponse {
    pub id: PermissionId,
    pub permission_name: String,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PermissionDBResponse> for PermissionResponse {
    fn from(permission: PermissionDBResponse) -> Self {
        Self {
            id: permission.id,
            permission_name: permission.permission_name,
            resource: permission.resource,
            action: permission.action,
            description: permission.description,
            created_at: permission.created_at,
            updated_at: permission.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PermissionCreate {
    pub permission_name: String,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
}

impl From<PermissionCreate> for PermissionCreateDBRequest {
    fn from(request: PermissionCreate) -> Self {
        Self {
            permission_name: request.permission_name,
            resource: request.resource,
            action: request.action,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PermissionUpdate {
    pub permission_name: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    pub description: Option<String>,
}

impl From<PermissionUpdate> for PermissionUpdateDBRequest {
    fn from(request: PermissionUpdate) -> Self {
        Self {
            permission_name: request.permission_name,
            resource: request.resource,
            action: request.action,
            description: request.description,
        }
    }
}

/// Body for assigning a role to a user
#[derive(Debug, Clone, Deserialize)]
pub struct RoleAssignment {
    pub role_id: RoleId,
}

/// Body for granting a permission to a role
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionGrant {
    pub permission_id: PermissionId,
}

/// Query parameters for the permission probe endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionCheckParams {
    pub resource: String,
    pub action: String,
}

/// Result of a permission probe
#[derive(Debug, Clone, Serialize)]
pub struct PermissionCheckResponse {
    pub has_permission: bool,
}
