//! HTTP handlers for sensors and their readings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::sensors::{
        ReadingListParams, SensorCreate, SensorListParams, SensorReadingBatchItem,
        SensorReadingCreate, SensorReadingResponse, SensorResponse, SensorStatusUpdate,
        SensorUpdate,
    },
    auth::{
        current_user::CurrentUser,
        permissions::{action, resource, RequiresPermission},
    },
    db::handlers::{sensors::SensorFilter, Repository, Sensors},
    errors::{Error, Result},
    types::SensorId,
    AppState,
};

#[tracing::instrument(skip_all)]
pub async fn list_sensors(
    _perm: RequiresPermission<resource::Sensors, action::View>,
    State(state): State<AppState>,
    Query(params): Query<SensorListParams>,
) -> Result<Json<Vec<SensorResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let sensors = Sensors::new(&mut conn)
        .list(&SensorFilter {
            region_id: params.region_id,
            status: params.status,
            skip: params.skip,
            limit: params.limit,
        })
        .await?;
    Ok(Json(sensors.into_iter().map(SensorResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn get_sensor(
    _perm: RequiresPermission<resource::Sensors, action::View>,
    State(state): State<AppState>,
    Path(id): Path<SensorId>,
) -> Result<Json<SensorResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let sensor = Sensors::new(&mut conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: "sensor".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(sensor.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_sensor(
    _perm: RequiresPermission<resource::Sensors, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<SensorCreate>,
) -> Result<(StatusCode, Json<SensorResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let sensor = Sensors::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(sensor.into())))
}

#[tracing::instrument(skip_all)]
pub async fn update_sensor(
    _perm: RequiresPermission<resource::Sensors, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<SensorId>,
    Json(request): Json<SensorUpdate>,
) -> Result<Json<SensorResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let sensor = Sensors::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(sensor.into()))
}

/// Status-only patch for field tooling that flips sensors between
/// ONLINE/OFFLINE/FAULT without touching the rest of the record.
#[tracing::instrument(skip_all)]
pub async fn update_sensor_status(
    _perm: RequiresPermission<resource::Sensors, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<SensorId>,
    Json(request): Json<SensorStatusUpdate>,
) -> Result<Json<SensorResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let sensor = Sensors::new(&mut conn)
        .update(
            id,
            &crate::db::models::sensors::SensorUpdateDBRequest {
                region_id: None,
                model: None,
                monitor_type: None,
                protocol: None,
                status: Some(request.status),
            },
        )
        .await?;
    Ok(Json(sensor.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_sensor(
    _perm: RequiresPermission<resource::Sensors, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<SensorId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Sensors::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "sensor".to_string(),
            id: id.to_string(),
        })
    }
}

// Readings: any authenticated user (field devices post with a device account)

#[tracing::instrument(skip_all)]
pub async fn add_reading(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(sensor_id): Path<SensorId>,
    Json(request): Json<SensorReadingCreate>,
) -> Result<(StatusCode, Json<SensorReadingResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let reading = Sensors::new(&mut conn)
        .add_reading(&request.into_db_request(sensor_id))
        .await?;
    Ok((StatusCode::CREATED, Json(reading.into())))
}

/// Batch ingest: gateways flush buffered readings for many sensors at once.
/// The whole batch commits or none of it does.
#[tracing::instrument(skip_all)]
pub async fn add_readings_batch(
    _user: CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<Vec<SensorReadingBatchItem>>,
) -> Result<(StatusCode, Json<Vec<SensorReadingResponse>>)> {
    let requests: Vec<_> = request.into_iter().map(Into::into).collect();
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let readings = Sensors::new(&mut conn).add_readings(&requests).await?;
    Ok((
        StatusCode::CREATED,
        Json(readings.into_iter().map(SensorReadingResponse::from).collect()),
    ))
}

#[tracing::instrument(skip_all)]
pub async fn list_readings(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(sensor_id): Path<SensorId>,
    Query(params): Query<ReadingListParams>,
) -> Result<Json<Vec<SensorReadingResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let readings = Sensors::new(&mut conn)
        .list_readings(sensor_id, params.limit.unwrap_or(100))
        .await?;
    Ok(Json(readings.into_iter().map(SensorReadingResponse::from).collect()))
}
