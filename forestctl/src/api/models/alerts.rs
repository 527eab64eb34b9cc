//! API request/response models for alert rules, alerts and notifications.

use crate::db::models::alerts::{
    AlertCreateDBRequest, AlertDBResponse, AlertRuleCreateDBRequest, AlertRuleDBResponse,
    AlertRuleUpdateDBRequest, AlertUpdateDBRequest, NotificationCreateDBRequest,
    NotificationDBResponse,
};
use crate::types::{AlertId, AlertRuleId, RegionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct AlertRuleResponse {
    pub id: AlertRuleId,
    pub alert_type: String,
    pub condition_expr: String,
    pub severity_level: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AlertRuleDBResponse> for AlertRuleResponse {
    fn from(rule: AlertRuleDBResponse) -> Self {
        Self {
            id: rule.id,
            alert_type: rule.alert_type,
            condition_expr: rule.condition_expr,
            severity_level: rule.severity_level,
            is_active: rule.is_active,
            created_at: rule.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertRuleCreate {
    pub alert_type: String,
    pub condition_expr: String,
    pub severity_level: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl From<AlertRuleCreate> for AlertRuleCreateDBRequest {
    fn from(request: AlertRuleCreate) -> Self {
        Self {
            alert_type: request.alert_type,
            condition_expr: request.condition_expr,
            severity_level: request.severity_level,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertRuleUpdate {
    pub alert_type: Option<String>,
    pub condition_expr: Option<String>,
    pub severity_level: Option<String>,
    pub is_active: Option<bool>,
}

impl From<AlertRuleUpdate> for AlertRuleUpdateDBRequest {
    fn from(request: AlertRuleUpdate) -> Self {
        Self {
            alert_type: request.alert_type,
            condition_expr: request.condition_expr,
            severity_level: request.severity_level,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertResponse {
    pub id: AlertId,
    pub rule_id: AlertRuleId,
    pub region_id: RegionId,
    pub triggered_at: DateTime<Utc>,
    pub content: String,
    pub status: String,
    pub handler_id: Option<UserId>,
    pub handle_result: Option<String>,
    pub alert_type: String,
    pub severity: String,
}

impl From<AlertDBResponse> for AlertResponse {
    fn from(alert: AlertDBResponse) -> Self {
        Self {
            id: alert.id,
            rule_id: alert.rule_id,
            region_id: alert.region_id,
            triggered_at: alert.triggered_at,
            content: alert.content,
            status: alert.status,
            handler_id: alert.handler_id,
            handle_result: alert.handle_result,
            alert_type: alert.alert_type,
            severity: alert.severity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertCreate {
    pub rule_id: AlertRuleId,
    pub region_id: RegionId,
    pub content: String,
    pub alert_type: String,
    pub severity: String,
}

impl From<AlertCreate> for AlertCreateDBRequest {
    fn from(request: AlertCreate) -> Self {
        Self {
            rule_id: request.rule_id,
            region_id: request.region_id,
            content: request.content,
            alert_type: request.alert_type,
            severity: request.severity,
        }
    }
}

/// Body for the alert handling workflow
#[derive(Debug, Clone, Deserialize)]
pub struct AlertUpdate {
    pub status: Option<String>,
    pub handler_id: Option<UserId>,
    pub handle_result: Option<String>,
}

impl From<AlertUpdate> for AlertUpdateDBRequest {
    fn from(request: AlertUpdate) -> Self {
        Self {
            status: request.status,
            handler_id: request.handler_id,
            handle_result: request.handle_result,
        }
    }
}

/// Query parameters for listing alerts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertListParams {
    pub region_id: Option<RegionId>,
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub alert_id: AlertId,
    pub receiver_id: UserId,
    pub notification_type: String,
    pub sent_at: DateTime<Utc>,
    pub receive_status: String,
}

impl From<NotificationDBResponse> for NotificationResponse {
    fn from(notification: NotificationDBResponse) -> Self {
        Self {
            id: notification.id,
            alert_id: notification.alert_id,
            receiver_id: notification.receiver_id,
            notification_type: notification.notification_type,
            sent_at: notification.sent_at,
            receive_status: notification.receive_status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationCreate {
    pub alert_id: AlertId,
    pub receiver_id: UserId,
    pub notification_type: String,
    pub receive_status: Option<String>,
}

impl From<NotificationCreate> for NotificationCreateDBRequest {
    fn from(request: NotificationCreate) -> Self {
        Self {
            alert_id: request.alert_id,
            receiver_id: request.receiver_id,
            notification_type: request.notification_type,
            receive_status: request.receive_status,
        }
    }
}
