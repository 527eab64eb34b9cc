//! Database repository for field devices, their status logs and maintenance
//! history.

use crate::db::{
    cascade,
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::devices::{
        DeviceCreateDBRequest, DeviceDBResponse, DeviceStatusLogCreateDBRequest,
        DeviceStatusLogDBResponse, DeviceUpdateDBRequest, MaintenanceRecordCreateDBRequest,
        MaintenanceRecordDBResponse,
    },
};
use crate::types::DeviceId;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub r#type: Option<String>,
    pub install_region_id: Option<i64>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub struct Devices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Devices<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(device_id = request.device_id), err)]
    pub async fn add_status_log(
        &mut self,
        request: &DeviceStatusLogCreateDBRequest,
    ) -> Result<DeviceStatusLogDBResponse> {
        let log = sqlx::query_as::<_, DeviceStatusLogDBResponse>(
            r#"
            INSERT INTO device_status_logs
                (device_id, collected_at, run_status, battery_percent, signal_strength)
            VALUES ($1, COALESCE($2, NOW()), $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.device_id)
        .bind(request.collected_at)
        .bind(&request.run_status)
        .bind(request.battery_percent)
        .bind(request.signal_strength)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(log)
    }

    #[instrument(skip(self), err)]
    pub async fn list_status_logs(
        &mut self,
        device_id: DeviceId,
        limit: i64,
    ) -> Result<Vec<DeviceStatusLogDBResponse>> {
        let logs = sqlx::query_as::<_, DeviceStatusLogDBResponse>(
            "SELECT * FROM device_status_logs WHERE device_id = $1 ORDER BY collected_at DESC LIMIT $2",
        )
        .bind(device_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(logs)
    }

    /// The most recent status report, if the device has ever reported
    #[instrument(skip(self), err)]
    pub async fn latest_status(
        &mut self,
        device_id: DeviceId,
    ) -> Result<Option<DeviceStatusLogDBResponse>> {
        let log = sqlx::query_as::<_, DeviceStatusLogDBResponse>(
            "SELECT * FROM device_status_logs WHERE device_id = $1 ORDER BY collected_at DESC LIMIT 1",
        )
        .bind(device_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(log)
    }

    #[instrument(skip(self, request), fields(device_id = request.device_id), err)]
    pub async fn add_maintenance(
        &mut self,
        request: &MaintenanceRecordCreateDBRequest,
    ) -> Result<MaintenanceRecordDBResponse> {
        let record = sqlx::query_as::<_, MaintenanceRecordDBResponse>(
            r#"
            INSERT INTO maintenance_records
                (device_id, maintenance_type, maintenance_time, maintainer_id, content, result)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.device_id)
        .bind(&request.maintenance_type)
        .bind(request.maintenance_time)
        .bind(request.maintainer_id)
        .bind(&request.content)
        .bind(&request.result)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(record)
    }

    #[instrument(skip(self), err)]
    pub async fn list_maintenance(
        &mut self,
        device_id: DeviceId,
    ) -> Result<Vec<MaintenanceRecordDBResponse>> {
        let records = sqlx::query_as::<_, MaintenanceRecordDBResponse>(
            "SELECT * FROM maintenance_records WHERE device_id = $1 ORDER BY maintenance_time DESC",
        )
        .bind(device_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(records)
    }

    /// Remove a single maintenance record, returning whether it existed
    #[instrument(skip(self), err)]
    pub async fn delete_maintenance(&mut self, record_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(record_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Devices<'c> {
    type CreateRequest = DeviceCreateDBRequest;
    type UpdateRequest = DeviceUpdateDBRequest;
    type Response = DeviceDBResponse;
    type Id = DeviceId;
    type Filter = DeviceFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let device = sqlx::query_as::<_, DeviceDBResponse>(
            r#"
            INSERT INTO devices
                (name, type, model_spec, purchased_at, install_region_id, installer_id, warranty_until)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.r#type)
        .bind(&request.model_spec)
        .bind(request.purchased_at)
        .bind(request.install_region_id)
        .bind(request.installer_id)
        .bind(request.warranty_until)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(device)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let device = sqlx::query_as::<_, DeviceDBResponse>("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(device)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let devices = sqlx::query_as::<_, DeviceDBResponse>(
            r#"
            SELECT * FROM devices
            WHERE ($1::varchar IS NULL OR type = $1)
              AND ($2::bigint IS NULL OR install_region_id = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&filter.r#type)
        .bind(filter.install_region_id)
        .bind(filter.limit.unwrap_or(100))
        .bind(filter.skip.unwrap_or(0))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(devices)
    }

    /// Maintenance records and status logs go first, then the device row
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        match cascade::DEVICE.execute(&mut tx, id).await {
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
        let device = sqlx::query_as::<_, DeviceDBResponse>(
            r#"
            UPDATE devices
            SET name = COALESCE($2, name),
                type = COALESCE($3, type),
                model_spec = COALESCE($4, model_spec),
                purchased_at = COALESCE($5, purchased_at),
                install_region_id = COALESCE($6, install_region_id),
                installer_id = COALESCE($7, installer_id),
                warranty_until = COALESCE($8, warranty_until)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.r#type)
        .bind(&request.model_spec)
        .bind(request.purchased_at)
        .bind(request.install_region_id)
        .bind(request.installer_id)
        .bind(request.warranty_until)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_device_request;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_latest_status_tracks_most_recent_report(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut devices = Devices::new(&mut conn);
        let device = devices.create(&create_device_request("cam-01")).await.unwrap();

        assert!(devices.latest_status(device.id).await.unwrap().is_none());

        for status in ["NORMAL", "FAULT"] {
            devices
                .add_status_log(&DeviceStatusLogCreateDBRequest {
                    device_id: device.id,
                    collected_at: None,
                    run_status: status.to_string(),
                    battery_percent: Some(80),
                    signal_strength: Some(-70),
                })
                .await
                .unwrap();
        }

        let latest = devices.latest_status(device.id).await.unwrap().unwrap();
        assert_eq!(latest.run_status, "FAULT");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_removes_logs_and_maintenance(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut devices = Devices::new(&mut conn);
        let device = devices.create(&create_device_request("cam-01")).await.unwrap();

        devices
            .add_status_log(&DeviceStatusLogCreateDBRequest {
                device_id: device.id,
                collected_at: None,
                run_status: "NORMAL".to_string(),
                battery_percent: None,
                signal_strength: None,
            })
            .await
            .unwrap();
        devices
            .add_maintenance(&MaintenanceRecordCreateDBRequest {
                device_id: device.id,
                maintenance_type: "INSPECTION".to_string(),
                maintenance_time: None,
                maintainer_id: None,
                content: Some("Annual check".to_string()),
                result: Some("OK".to_string()),
            })
            .await
            .unwrap();

        assert!(devices.delete(device.id).await.unwrap());

        for table in ["device_status_logs", "maintenance_records"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&mut *conn)
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} should be empty after cascade");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_maintenance_record(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut devices = Devices::new(&mut conn);
        let device = devices.create(&create_device_request("cam-01")).await.unwrap();

        let record = devices
            .add_maintenance(&MaintenanceRecordCreateDBRequest {
                device_id: device.id,
                maintenance_type: "REPAIR".to_string(),
                maintenance_time: None,
                maintainer_id: None,
                content: None,
                result: None,
            })
            .await
            .unwrap();

        assert!(devices.delete_maintenance(record.id).await.unwrap());
        assert!(!devices.delete_maintenance(record.id).await.unwrap());
    }
}
