//! HTTP handlers for role and permission administration.
//!
//! Everything here is gated on `roles`, `permissions` or `users`
//! permissions; the public role listing for registration lives in
//! [`super::auth`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::rbac::{
        PermissionCheckParams, PermissionCheckResponse, PermissionCreate, PermissionGrant,
        PermissionResponse, PermissionUpdate, RoleAssignment, RoleCreate, RoleResponse,
        RoleUpdate,
    },
    auth::permissions::{action, resource, RequiresPermission},
    db::handlers::{Permissions, Repository, Roles},
    errors::{Error, Result},
    types::{PermissionId, RoleId, UserId},
    AppState,
};

// Roles

#[tracing::instrument(skip_all)]
pub async fn create_role(
    _perm: RequiresPermission<resource::Roles, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<RoleCreate>,
) -> Result<(StatusCode, Json<RoleResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let role = Roles::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

#[tracing::instrument(skip_all)]
pub async fn get_role(
    _perm: RequiresPermission<resource::Roles, action::View>,
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
) -> Result<Json<RoleResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let role = Roles::new(&mut conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: "role".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(role.into()))
}

#[tracing::instrument(skip_all)]
pub async fn update_role(
    _perm: RequiresPermission<resource::Roles, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    Json(request): Json<RoleUpdate>,
) -> Result<Json<RoleResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let role = Roles::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(role.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_role(
    _perm: RequiresPermission<resource::Roles, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Roles::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "role".to_string(),
            id: id.to_string(),
        })
    }
}

// User-role assignments

#[tracing::instrument(skip_all)]
pub async fn assign_role_to_user(
    _perm: RequiresPermission<resource::Users, action::Manage>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<RoleAssignment>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    // Granting a role the user already holds is a success, not a conflict
    Roles::new(&mut conn).assign_to_user(user_id, request.role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip_all)]
pub async fn remove_role_from_user(
    _perm: RequiresPermission<resource::Users, action::Manage>,
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(UserId, RoleId)>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Roles::new(&mut conn).remove_from_user(user_id, role_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "role assignment".to_string(),
            id: format!("{user_id}/{role_id}"),
        })
    }
}

#[tracing::instrument(skip_all)]
pub async fn get_user_roles(
    _perm: RequiresPermission<resource::Users, action::View>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<RoleResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let roles = Roles::new(&mut conn).roles_for_user(user_id).await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

// Permissions

#[tracing::instrument(skip_all)]
pub async fn create_permission(
    _perm: RequiresPermission<resource::Permissions, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<PermissionCreate>,
) -> Result<(StatusCode, Json<PermissionResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let permission = Permissions::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(permission.into())))
}

#[tracing::instrument(skip_all)]
pub async fn get_permission(
    _perm: RequiresPermission<resource::Permissions, action::View>,
    State(state): State<AppState>,
    Path(id): Path<PermissionId>,
) -> Result<Json<PermissionResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let permission = Permissions::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound {
            resource: "permission".to_string(),
            id: id.to_string(),
        })?;
    Ok(Json(permission.into()))
}

#[tracing::instrument(skip_all)]
pub async fn update_permission(
    _perm: RequiresPermission<resource::Permissions, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<PermissionId>,
    Json(request): Json<PermissionUpdate>,
) -> Result<Json<PermissionResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let permission = Permissions::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(permission.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_permission(
    _perm: RequiresPermission<resource::Permissions, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<PermissionId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Permissions::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "permission".to_string(),
            id: id.to_string(),
        })
    }
}

// Role-permission grants

#[tracing::instrument(skip_all)]
pub async fn grant_permission_to_role(
    _perm: RequiresPermission<resource::Permissions, action::Manage>,
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
    Json(request): Json<PermissionGrant>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    Permissions::new(&mut conn).assign_to_role(role_id, request.permission_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip_all)]
pub async fn revoke_permission_from_role(
    _perm: RequiresPermission<resource::Permissions, action::Manage>,
    State(state): State<AppState>,
    Path((role_id, permission_id)): Path<(RoleId, PermissionId)>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Permissions::new(&mut conn).remove_from_role(role_id, permission_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "permission grant".to_string(),
            id: format!("{role_id}/{permission_id}"),
        })
    }
}

#[tracing::instrument(skip_all)]
pub async fn get_role_permissions(
    _perm: RequiresPermission<resource::Permissions, action::View>,
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> Result<Json<Vec<PermissionResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let permissions = Permissions::new(&mut conn).permissions_for_role(role_id).await?;
    Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
}

// User-level views

#[tracing::instrument(skip_all)]
pub async fn get_user_permissions(
    _perm: RequiresPermission<resource::Users, action::View>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<PermissionResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let permissions = Permissions::new(&mut conn).permissions_for_user(user_id).await?;
    Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
}

/// Probe whether a user holds a permission without attempting the operation
#[tracing::instrument(skip_all)]
pub async fn check_user_permission(
    _perm: RequiresPermission<resource::Users, action::View>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PermissionCheckParams>,
) -> Result<Json<PermissionCheckResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let has_permission = Permissions::new(&mut conn)
        .user_has_permission(user_id, &params.resource, &params.action)
        .await?;
    Ok(Json(PermissionCheckResponse { has_permission }))
}
