//! HTTP handlers for alert rules, alerts and notifications.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::alerts::{
        AlertCreate, AlertListParams, AlertResponse, AlertRuleCreate, AlertRuleResponse,
        AlertRuleUpdate, AlertUpdate, NotificationCreate, NotificationResponse,
    },
    auth::{
        current_user::CurrentUser,
        permissions::{action, resource, RequiresPermission},
    },
    db::handlers::{alerts::AlertFilter, Alerts, Repository},
    errors::{Error, Result},
    types::{AlertId, AlertRuleId},
    AppState,
};

// Alert rules

#[tracing::instrument(skip_all)]
pub async fn list_alert_rules(
    _perm: RequiresPermission<resource::Alerts, action::View>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertRuleResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let rules = Alerts::new(&mut conn).list_rules().await?;
    Ok(Json(rules.into_iter().map(AlertRuleResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn get_alert_rule(
    _perm: RequiresPermission<resource::Alerts, action::View>,
    State(state): State<AppState>,
    Path(id): Path<AlertRuleId>,
) -> Result<Json<AlertRuleResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let rule = Alerts::new(&mut conn).get_rule_by_id(id).await?.ok_or(Error::NotFound {
        resource: "alert rule".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(rule.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_alert_rule(
    _perm: RequiresPermission<resource::Alerts, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<AlertRuleCreate>,
) -> Result<(StatusCode, Json<AlertRuleResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let rule = Alerts::new(&mut conn).create_rule(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(rule.into())))
}

#[tracing::instrument(skip_all)]
pub async fn update_alert_rule(
    _perm: RequiresPermission<resource::Alerts, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<AlertRuleId>,
    Json(request): Json<AlertRuleUpdate>,
) -> Result<Json<AlertRuleResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let rule = Alerts::new(&mut conn).update_rule(id, &request.into()).await?;
    Ok(Json(rule.into()))
}

/// Removing a rule also removes the alerts it triggered and their
/// notifications
#[tracing::instrument(skip_all)]
pub async fn delete_alert_rule(
    _perm: RequiresPermission<resource::Alerts, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<AlertRuleId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Alerts::new(&mut conn).delete_rule(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "alert rule".to_string(),
            id: id.to_string(),
        })
    }
}

// Alerts

#[tracing::instrument(skip_all)]
pub async fn list_alerts(
    _perm: RequiresPermission<resource::Alerts, action::View>,
    State(state): State<AppState>,
    Query(params): Query<AlertListParams>,
) -> Result<Json<Vec<AlertResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let alerts = Alerts::new(&mut conn)
        .list(&AlertFilter {
            region_id: params.region_id,
            status: params.status,
            skip: params.skip,
            limit: params.limit,
        })
        .await?;
    Ok(Json(alerts.into_iter().map(AlertResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn get_alert(
    _perm: RequiresPermission<resource::Alerts, action::View>,
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
) -> Result<Json<AlertResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let alert = Alerts::new(&mut conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: "alert".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(alert.into()))
}

#[tracing::instrument(skip_all)]
pub async fn create_alert(
    _perm: RequiresPermission<resource::Alerts, action::Manage>,
    State(state): State<AppState>,
    Json(request): Json<AlertCreate>,
) -> Result<(StatusCode, Json<AlertResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let alert = Alerts::new(&mut conn).create(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(alert.into())))
}

#[tracing::instrument(skip_all)]
pub async fn update_alert(
    _perm: RequiresPermission<resource::Alerts, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
    Json(request): Json<AlertUpdate>,
) -> Result<Json<AlertResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let alert = Alerts::new(&mut conn).update(id, &request.into()).await?;
    Ok(Json(alert.into()))
}

#[tracing::instrument(skip_all)]
pub async fn delete_alert(
    _perm: RequiresPermission<resource::Alerts, action::Manage>,
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    if Alerts::new(&mut conn).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "alert".to_string(),
            id: id.to_string(),
        })
    }
}

// Notifications: any authenticated user

#[tracing::instrument(skip_all)]
pub async fn list_notifications(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(alert_id): Path<AlertId>,
) -> Result<Json<Vec<NotificationResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let notifications = Alerts::new(&mut conn).list_notifications(alert_id).await?;
    Ok(Json(notifications.into_iter().map(NotificationResponse::from).collect()))
}

#[tracing::instrument(skip_all)]
pub async fn create_notification(
    _user: CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<NotificationCreate>,
) -> Result<(StatusCode, Json<NotificationResponse>)> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let notification = Alerts::new(&mut conn).add_notification(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(notification.into())))
}
