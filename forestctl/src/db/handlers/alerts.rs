//! Database repository for alert rules, triggered alerts and the
//! notifications fanned out for them.
//!
//! The [`Repository`] impl covers alerts; rules and notifications hang off
//! the same handler since they share a lifecycle (deleting a rule takes its
//! alerts and their notifications with it).

use crate::db::{
    cascade,
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::alerts::{
        AlertCreateDBRequest, AlertDBResponse, AlertRuleCreateDBRequest, AlertRuleDBResponse,
        AlertRuleUpdateDBRequest, AlertUpdateDBRequest, NotificationCreateDBRequest,
        NotificationDBResponse,
    },
};
use crate::types::{AlertId, AlertRuleId};
use sqlx::{Connection, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub region_id: Option<i64>,
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub struct Alerts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Alerts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(alert_type = %request.alert_type), err)]
    pub async fn create_rule(
        &mut self,
        request: &AlertRuleCreateDBRequest,
    ) -> Result<AlertRuleDBResponse> {
        let rule = sqlx::query_as::<_, AlertRuleDBResponse>(
            r#"
            INSERT INTO alert_rules (alert_type, condition_expr, severity_level, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.alert_type)
        .bind(&request.condition_expr)
        .bind(&request.severity_level)
        .bind(request.is_active)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(rule)
    }

    #[instrument(skip(self), err)]
    pub async fn get_rule_by_id(
        &mut self,
        id: AlertRuleId,
    ) -> Result<Option<AlertRuleDBResponse>> {
        let rule =
            sqlx::query_as::<_, AlertRuleDBResponse>("SELECT * FROM alert_rules WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(rule)
    }

    #[instrument(skip(self), err)]
    pub async fn list_rules(&mut self) -> Result<Vec<AlertRuleDBResponse>> {
        let rules =
            sqlx::query_as::<_, AlertRuleDBResponse>("SELECT * FROM alert_rules ORDER BY id")
                .fetch_all(&mut *self.db)
                .await?;

        Ok(rules)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update_rule(
        &mut self,
        id: AlertRuleId,
        request: &AlertRuleUpdateDBRequest,
    ) -> Result<AlertRuleDBResponse> {
        let rule = sqlx::query_as::<_, AlertRuleDBResponse>(
            r#"
            UPDATE alert_rules
            SET alert_type = COALESCE($2, alert_type),
                condition_expr = COALESCE($3, condition_expr),
                severity_level = COALESCE($4, severity_level),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.alert_type)
        .bind(&request.condition_expr)
        .bind(&request.severity_level)
        .bind(request.is_active)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(rule)
    }

    /// Deletes the rule plus every alert it triggered and their
    /// notifications, in one transaction
    #[instrument(skip(self), err)]
    pub async fn delete_rule(&mut self, id: AlertRuleId) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        match cascade::ALERT_RULE.execute(&mut tx, id).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(true)
            }
            Err(DbError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, request), fields(alert_id = request.alert_id), err)]
    pub async fn add_notification(
        &mut self,
        request: &NotificationCreateDBRequest,
    ) -> Result<NotificationDBResponse> {
        let notification = sqlx::query_as::<_, NotificationDBResponse>(
            r#"
            INSERT INTO notifications (alert_id, receiver_id, notification_type, receive_status)
            VALUES ($1, $2, $3, COALESCE($4, 'PENDING'))
            RETURNING *
            "#,
        )
        .bind(request.alert_id)
        .bind(request.receiver_id)
        .bind(&request.notification_type)
        .bind(&request.receive_status)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(notification)
    }

    #[instrument(skip(self), err)]
    pub async fn list_notifications(
        &mut self,
        alert_id: AlertId,
    ) -> Result<Vec<NotificationDBResponse>> {
        let notifications = sqlx::query_as::<_, NotificationDBResponse>(
            "SELECT * FROM notifications WHERE alert_id = $1 ORDER BY sent_at DESC",
        )
        .bind(alert_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(notifications)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Alerts<'c> {
    type CreateRequest = AlertCreateDBRequest;
    type UpdateRequest = AlertUpdateDBRequest;
    type Response = AlertDBResponse;
    type Id = AlertId;
    type Filter = AlertFilter;

    #[instrument(skip(self, request), fields(rule_id = request.rule_id, region_id = request.region_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let alert = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            INSERT INTO alerts (rule_id, region_id, content, alert_type, severity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.rule_id)
        .bind(request.region_id)
        .bind(&request.content)
        .bind(&request.alert_type)
        .bind(&request.severity)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(alert)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let alert = sqlx::query_as::<_, AlertDBResponse>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(alert)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let alerts = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            SELECT * FROM alerts
            WHERE ($1::bigint IS NULL OR region_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY triggered_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.region_id)
        .bind(&filter.status)
        .bind(filter.limit.unwrap_or(100))
        .bind(filter.skip.unwrap_or(0))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(alerts)
    }

    /// Notifications go first, then the alert row
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        match cascade::ALERT.execute(&mut tx, id).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(true)
            }
            Err(DbError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let alert = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            UPDATE alerts
            SET status = COALESCE($2, status),
                handler_id = COALESCE($3, handler_id),
                handle_result = COALESCE($4, handle_result)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.status)
        .bind(request.handler_id)
        .bind(&request.handle_result)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Regions, Users};
    use crate::test_utils::{create_region_request, create_user_request};
    use sqlx::PgPool;

    async fn make_alert(conn: &mut PgConnection) -> (AlertRuleDBResponse, AlertDBResponse) {
        let region = Regions::new(conn).create(&create_region_request("North Ridge")).await.unwrap();
        let mut alerts = Alerts::new(conn);
        let rule = alerts
            .create_rule(&AlertRuleCreateDBRequest {
                alert_type: "FIRE".to_string(),
                condition_expr: "temperature > 45".to_string(),
                severity_level: "HIGH".to_string(),
                is_active: true,
            })
            .await
            .unwrap();
        let alert = alerts
            .create(&AlertCreateDBRequest {
                rule_id: rule.id,
                region_id: region.id,
                content: "High temperature in North Ridge".to_string(),
                alert_type: "FIRE".to_string(),
                severity: "HIGH".to_string(),
            })
            .await
            .unwrap();
        (rule, alert)
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_alert_handling_workflow(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let (_, alert) = make_alert(&mut conn).await;
        let handler = Users::new(&mut conn).create(&create_user_request("ranger1")).await.unwrap();

        let handled = Alerts::new(&mut conn)
            .update(
                alert.id,
                &AlertUpdateDBRequest {
                    status: Some("HANDLED".to_string()),
                    handler_id: Some(handler.id),
                    handle_result: Some("Dispatched crew".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(handled.status, "HANDLED");
        assert_eq!(handled.handler_id, Some(handler.id));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_rule_cascades_to_alerts_and_notifications(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let (rule, alert) = make_alert(&mut conn).await;
        let receiver = Users::new(&mut conn).create(&create_user_request("watcher1")).await.unwrap();

        Alerts::new(&mut conn)
            .add_notification(&NotificationCreateDBRequest {
                alert_id: alert.id,
                receiver_id: receiver.id,
                notification_type: "SYSTEM".to_string(),
                receive_status: None,
            })
            .await
            .unwrap();

        let mut alerts = Alerts::new(&mut conn);
        assert!(alerts.delete_rule(rule.id).await.unwrap());
        assert!(alerts.get_by_id(alert.id).await.unwrap().is_none());
        assert!(alerts.list_notifications(alert.id).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_alert_keeps_the_rule(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let (rule, alert) = make_alert(&mut conn).await;

        let mut alerts = Alerts::new(&mut conn);
        assert!(alerts.delete(alert.id).await.unwrap());
        assert!(alerts.get_rule_by_id(rule.id).await.unwrap().is_some());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_missing_rule_reports_false(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        assert!(!Alerts::new(&mut conn).delete_rule(999_999).await.unwrap());
    }
}
