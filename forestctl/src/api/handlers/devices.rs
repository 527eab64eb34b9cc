//! HTTP handlers for field devices, status reports and maintenance.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::devices::{
        DeviceCreate, DeviceListParams, DeviceResponse, DeviceStatusLogCreate,
        DeviceStatusLogResponse, DeviceUpdate, MaintenanceRecordCreate,
        MaintenanceRecordResponse,
    },
    auth::{
        current_user::CurrentUser,
        permissions::{action, resource, RequiresPermission},
    },
    db::handlers::{devices::DeviceFilter, Devices, Repository},
    errors::{Error, Result},
    types::DeviceId,
    AppState,
};

#[tracing::instrument(skip_all)]
pub async fn list_devices(
    _perm: RequiresPermission<resource::Devices, action::View>,
    State(state): State<AppState>,
    Query(params): Query<DeviceListParams>,
) -> Result<Json<Vec<DeviceResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let devices = Devices::new(&mut conn)
        .list(&DeviceFilter {
            r#type: params.r#type,
            install_region_id: params.install_region_id,
            skip: params.skip,
            limit: params.limit,
        })
        .await?;
    Ok(Json(devices.into_iter().map(DeviceResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn get_device(
    _perm: RequiresPermission<resource::Devices, action::View>,
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
) -> Result<Json<DeviceResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let device = Devices::new(&mut conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: "device".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(device.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_device(
    _perm: RequiresPermission<resource::Devices, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<DeviceCreate>,
) -> Result<(StatusCode, Json<DeviceResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let device = Devices::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

#[tracing::instrument(skip_all)]
pub async fn update_device(
    _perm: RequiresPermission<resource::Devices, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
    Json(request): Json<DeviceUpdate>,
) -> Result<Json<DeviceResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let device = Devices::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(device.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_device(
    _perm: RequiresPermission<resource::Devices, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Devices::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "device".to_string(),
            id: id.to_string(),
        })
    }
}

// Status reports and maintenance: any authenticated user

#[tracing::instrument(skip_all)]
pub async fn add_status_log(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Json(request): Json<DeviceStatusLogCreate>,
) -> Result<(StatusCode, Json<DeviceStatusLogResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let log = Devices::new(&mut conn)
        .add_status_log(&request.into_db_request(device_id))
        .await?;
    Ok((StatusCode::CREATED, Json(log.into())))
}

#[tracing::instrument(skip_all)]
pub async fn get_latest_status(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Option<DeviceStatusLogResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let log = Devices::new(&mut conn).latest_status(device_id).await?;
    Ok(Json(log.map(DeviceStatusLogResponse::from)))
}

#[tracing::instrument(skip_all)]
pub async fn list_status_logs(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Vec<DeviceStatusLogResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let logs = Devices::new(&mut conn).list_status_logs(device_id, 100).await?;
    Ok(Json(logs.into_iter().map(DeviceStatusLogResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn add_maintenance(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Json(request): Json<MaintenanceRecordCreate>,
) -> Result<(StatusCode, Json<MaintenanceRecordResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let record = Devices::new(&mut conn)
        .add_maintenance(&request.into_db_request(device_id))
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[tracing::instrument(skip_all)]
pub async fn list_maintenance(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Vec<MaintenanceRecordResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let records = Devices::new(&mut conn).list_maintenance(device_id).await?;
    Ok(Json(records.into_iter().map(MaintenanceRecordResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_maintenance(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(record_id): Path<i64>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Devices::new(&mut conn).delete_maintenance(record_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "maintenance record".to_string(),
            id: record_id.to_string(),
        })
    }
}
