//! HTTP handlers for forest resources and their change history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::resources::{
        ForestResourceCreate, ForestResourceListParams, ForestResourceResponse,
        ForestResourceUpdate, GrowthStageUpdate, ResourceChangeCreate, ResourceChangeResponse,
    },
    auth::{
        current_user::CurrentUser,
        permissions::{action, resource, RequiresPermission},
    },
    db::handlers::{resources::ForestResourceFilter, ForestResources, Repository},
    errors::{Error, Result},
    types::ResourceId,
    AppState,
};

#[tracing::instrument(skip_all)]
pub async fn list_resources(
    _perm: RequiresPermission<resource::Resources, action::View>,
    State(state): State<AppState>,
    Query(params): Query<ForestResourceListParams>,
) -> Result<Json<Vec<ForestResourceResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let resources = ForestResources::new(&mut conn)
        .list(&ForestResourceFilter {
            region_id: params.region_id,
            resource_type: params.resource_type,
            skip: params.skip,
            limit: params.limit,
        })
        .await?;
    Ok(Json(resources.into_iter().map(ForestResourceResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn get_resource(
    _perm: RequiresPermission<resource::Resources, action::View>,
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
) -> Result<Json<ForestResourceResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let found = ForestResources::new(&mut conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: "resource".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(found.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_resource(
    _perm: RequiresPermission<resource::Resources, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<ForestResourceCreate>,
) -> Result<(StatusCode, Json<ForestResourceResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let created = ForestResources::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[tracing::instrument(skip_all)]
pub async fn update_resource(
    _perm: RequiresPermission<resource::Resources, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
    Json(request): Json<ForestResourceUpdate>,
) -> Result<Json<ForestResourceResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let updated = ForestResources::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(updated.into()))
}

/// Growth-stage-only patch used by survey workflows that reclassify stands
/// (SEEDLING, SAPLING, MATURE, ...) without editing the rest of the record.
#[tracing::instrument(skip_all)]
pub async fn update_growth_stage(
    _perm: RequiresPermission<resource::Resources, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
    Json(request): Json<GrowthStageUpdate>,
) -> Result<Json<ForestResourceResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let updated = ForestResources::new(&mut conn)
        .update(
            id,
            &crate::db::models::resources::ForestResourceUpdateDBRequest {
                resource_type: None,
                region_id: None,
                species_name: None,
                quantity: None,
                area: None,
                growth_stage: Some(request.growth_stage),
                planted_at: None,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_resource(
    _perm: RequiresPermission<resource::Resources, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if ForestResources::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "resource".to_string(),
            id: id.to_string(),
        })
    }
}

// Change history: any authenticated user

#[tracing::instrument(skip_all)]
pub async fn list_changes(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(resource_id): Path<ResourceId>,
) -> Result<Json<Vec<ResourceChangeResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let changes = ForestResources::new(&mut conn).list_changes(resource_id).await?;
    Ok(Json(changes.into_iter().map(ResourceChangeResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn create_change(
    _user: CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<ResourceChangeCreate>,
) -> Result<(StatusCode, Json<ResourceChangeResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let change = ForestResources::new(&mut conn).add_change(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(change.into())))
}
