//! Database models for alert rules, alerts and notifications.

use crate::types::{AlertId, AlertRuleId, RegionId, UserId};
use chrono::{DateTime, Utc};

/// Database response for an alert rule
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRuleDBResponse {
    pub id: AlertRuleId,
    pub alert_type: String,
    pub condition_expr: String,
    pub severity_level: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating an alert rule
#[derive(Debug, Clone)]
pub struct AlertRuleCreateDBRequest {
    pub alert_type: String,
    pub condition_expr: String,
    pub severity_level: String,
    pub is_active: bool,
}

/// Database request for updating an alert rule
#[derive(Debug, Clone)]
pub struct AlertRuleUpdateDBRequest {
    pub alert_type: Option<String>,
    pub condition_expr: Option<String>,
    pub severity_level: Option<String>,
    pub is_active: Option<bool>,
}

/// Database response for an alert
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertDBResponse {
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

/// Database request for creating an alert
#[derive(Debug, Clone)]
pub struct AlertCreateDBRequest {
    pub rule_id: AlertRuleId,
    pub region_id: RegionId,
    pub content: String,
    pub alert_type: String,
    pub severity: String,
}

/// Database request for updating an alert (handling workflow)
#[derive(Debug, Clone)]
pub struct AlertUpdateDBRequest {
    pub status: Option<String>,
    pub handler_id: Option<UserId>,
    pub handle_result: Option<String>,
}

/// Database response for a notification
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationDBResponse {
    pub id: i64,
    pub alert_id: AlertId,
    pub receiver_id: UserId,
    pub notification_type: String,
    pub sent_at: DateTime<Utc>,
    pub receive_status: String,
}

/// Database request for recording a notification
#[derive(Debug, Clone)]
pub struct NotificationCreateDBRequest {
    pub alert_id: AlertId,
    pub receiver_id: UserId,
    pub notification_type: String,
    pub receive_status: Option<String>,
}
