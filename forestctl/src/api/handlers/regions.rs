//! HTTP handlers for monitoring regions.
//!
//! Reads need only a valid token; writes require the `regions`/`manage`
//! permission. Deleting a region removes everything monitored inside it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::regions::{RegionCreate, RegionListParams, RegionResponse, RegionUpdate},
    auth::permissions::{action, resource, RequiresPermission},
    db::handlers::{regions::RegionFilter, Regions, Repository},
    errors::{Error, Result},
    types::RegionId,
    AppState,
};

#[tracing::instrument(skip_all)]
pub async fn list_regions(
    _user: crate::auth::current_user::CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<RegionListParams>,
) -> Result<Json<Vec<RegionResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let regions = Regions::new(&mut conn)
        .list(&RegionFilter {
            r#type: params.r#type,
            skip: params.skip,
            limit: params.limit,
        })
        .await?;
    Ok(Json(regions.into_iter().map(RegionResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn get_region(
    _user: crate::auth::current_user::CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<RegionId>,
) -> Result<Json<RegionResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let region = Regions::new(&mut conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: "region".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(region.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_region(
    _perm: RequiresPermission<resource::Regions, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<RegionCreate>,
) -> Result<(StatusCode, Json<RegionResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let region = Regions::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(region.into())))
}

#[tracing::instrument(skip_all)]
pub async fn update_region(
    _perm: RequiresPermission<resource::Regions, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<RegionId>,
    Json(request): Json<RegionUpdate>,
) -> Result<Json<RegionResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let region = Regions::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(region.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_region(
    _perm: RequiresPermission<resource::Regions, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<RegionId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Regions::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "region".to_string(),
            id: id.to_string(),
        })
    }
}
