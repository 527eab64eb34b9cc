//! Database repository for sensors and the readings they collect.

use crate::db::{
    cascade,
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::sensors::{
        SensorCreateDBRequest, SensorDBResponse, SensorReadingCreateDBRequest,
        SensorReadingDBResponse, SensorUpdateDBRequest,
    },
};
use crate::types::SensorId;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct SensorFilter {
    pub region_id: Option<i64>,
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub struct Sensors<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Sensors<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Record a reading against a sensor. `collected_at` defaults to now for
    /// live ingestion; backfills pass an explicit timestamp.
    #[instrument(skip(self, request), fields(sensor_id = request.sensor_id), err)]
    pub async fn add_reading(
        &mut self,
        request: &SensorReadingCreateDBRequest,
    ) -> Result<SensorReadingDBResponse> {
        let reading = sqlx::query_as::<_, SensorReadingDBResponse>(
            r#"
            INSERT INTO sensor_readings
                (sensor_id, collected_at, reading_type, numeric_value, value_unit, media_path, data_status)
            VALUES ($1, COALESCE($2, NOW()), $3, $4, $5, $6, COALESCE($7, 'NORMAL'))
            RETURNING *
            "#,
        )
        .bind(request.sensor_id)
        .bind(request.collected_at)
        .bind(&request.reading_type)
        .bind(request.numeric_value)
        .bind(&request.value_unit)
        .bind(&request.media_path)
        .bind(&request.data_status)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(reading)
    }

    /// Insert a batch of readings, possibly spanning sensors, in one
    /// transaction. A single bad row (unknown sensor) aborts the whole batch.
    #[instrument(skip(self, requests), fields(count = requests.len()), err)]
    pub async fn add_readings(
        &mut self,
        requests: &[SensorReadingCreateDBRequest],
    ) -> Result<Vec<SensorReadingDBResponse>> {
        let mut tx = self.db.begin().await?;
        let mut readings = Vec::with_capacity(requests.len());

        for request in requests {
            let reading = sqlx::query_as::<_, SensorReadingDBResponse>(
                r#"
                INSERT INTO sensor_readings
                    (sensor_id, collected_at, reading_type, numeric_value, value_unit, media_path, data_status)
                VALUES ($1, COALESCE($2, NOW()), $3, $4, $5, $6, COALESCE($7, 'NORMAL'))
                RETURNING *
                "#,
            )
            .bind(request.sensor_id)
            .bind(request.collected_at)
            .bind(&request.reading_type)
            .bind(request.numeric_value)
            .bind(&request.value_unit)
            .bind(&request.media_path)
            .bind(&request.data_status)
            .fetch_one(&mut *tx)
            .await?;
            readings.push(reading);
        }

        tx.commit().await?;
        Ok(readings)
    }

    /// Most recent readings for one sensor
    #[instrument(skip(self), err)]
    pub async fn list_readings(
        &mut self,
        sensor_id: SensorId,
        limit: i64,
    ) -> Result<Vec<SensorReadingDBResponse>> {
        let readings = sqlx::query_as::<_, SensorReadingDBResponse>(
            "SELECT * FROM sensor_readings WHERE sensor_id = $1 ORDER BY collected_at DESC LIMIT $2",
        )
        .bind(sensor_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(readings)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Sensors<'c> {
    type CreateRequest = SensorCreateDBRequest;
    type UpdateRequest = SensorUpdateDBRequest;
    type Response = SensorDBResponse;
    type Id = SensorId;
    type Filter = SensorFilter;

    #[instrument(skip(self, request), fields(region_id = request.region_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let sensor = sqlx::query_as::<_, SensorDBResponse>(
            r#"
            INSERT INTO sensors (region_id, model, monitor_type, install_time, protocol, status)
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, COALESCE($6, 'ONLINE'))
            RETURNING *
            "#,
        )
        .bind(request.region_id)
        .bind(&request.model)
        .bind(&request.monitor_type)
        .bind(request.install_time)
        .bind(&request.protocol)
        .bind(&request.status)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(sensor)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let sensor = sqlx::query_as::<_, SensorDBResponse>("SELECT * FROM sensors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(sensor)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let sensors = sqlx::query_as::<_, SensorDBResponse>(
            r#"
            SELECT * FROM sensors
            WHERE ($1::bigint IS NULL OR region_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.region_id)
        .bind(&filter.status)
        .bind(filter.limit.unwrap_or(100))
        .bind(filter.skip.unwrap_or(0))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(sensors)
    }

    /// Readings go first, then the sensor row, in one transaction
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        match cascade::SENSOR.execute(&mut tx, id).await {
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
        let sensor = sqlx::query_as::<_, SensorDBResponse>(
            r#"
            UPDATE sensors
            SET region_id = COALESCE($2, region_id),
                model = COALESCE($3, model),
                monitor_type = COALESCE($4, monitor_type),
                protocol = COALESCE($5, protocol),
                status = COALESCE($6, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.region_id)
        .bind(&request.model)
        .bind(&request.monitor_type)
        .bind(&request.protocol)
        .bind(&request.status)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(sensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Regions;
    use crate::test_utils::create_region_request;
    use sqlx::PgPool;

    async fn make_sensor(conn: &mut PgConnection) -> SensorDBResponse {
        let region = Regions::new(conn).create(&create_region_request("North Ridge")).await.unwrap();
        Sensors::new(conn)
            .create(&SensorCreateDBRequest {
                region_id: region.id,
                model: "TH-200".to_string(),
                monitor_type: "TEMPERATURE".to_string(),
                install_time: None,
                protocol: "LORA".to_string(),
                status: None,
            })
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_sensor_defaults_applied_on_create(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let sensor = make_sensor(&mut conn).await;
        assert_eq!(sensor.status, "ONLINE");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_removes_readings_with_the_sensor(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let sensor = make_sensor(&mut conn).await;

        let mut sensors = Sensors::new(&mut conn);
        for value in [20.0, 21.0, 22.0] {
            sensors
                .add_reading(&SensorReadingCreateDBRequest {
                    sensor_id: sensor.id,
                    collected_at: None,
                    reading_type: "TEMPERATURE".to_string(),
                    numeric_value: Some(value),
                    value_unit: Some("C".to_string()),
                    media_path: None,
                    data_status: None,
                })
                .await
                .unwrap();
        }
        assert_eq!(sensors.list_readings(sensor.id, 10).await.unwrap().len(), 3);

        assert!(sensors.delete(sensor.id).await.unwrap());
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sensor_readings")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_batch_insert_is_all_or_nothing(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let sensor = make_sensor(&mut conn).await;

        let reading = |sensor_id, value| SensorReadingCreateDBRequest {
            sensor_id,
            collected_at: None,
            reading_type: "TEMPERATURE".to_string(),
            numeric_value: Some(value),
            value_unit: Some("C".to_string()),
            media_path: None,
            data_status: None,
        };

        let mut sensors = Sensors::new(&mut conn);
        let inserted = sensors
            .add_readings(&[reading(sensor.id, 20.0), reading(sensor.id, 21.0)])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);

        // One unknown sensor aborts the whole batch
        sensors
            .add_readings(&[reading(sensor.id, 22.0), reading(sensor.id + 1, 23.0)])
            .await
            .unwrap_err();
        assert_eq!(sensors.list_readings(sensor.id, 10).await.unwrap().len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_filters_by_region(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let sensor = make_sensor(&mut conn).await;

        let mut sensors = Sensors::new(&mut conn);
        let in_region = sensors
            .list(&SensorFilter {
                region_id: Some(sensor.region_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_region.len(), 1);

        let elsewhere = sensors
            .list(&SensorFilter {
                region_id: Some(sensor.region_id + 1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(elsewhere.is_empty());
    }
}
