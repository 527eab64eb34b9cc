//! Database repository for monitoring regions.

use crate::db::{
    cascade,
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::regions::{RegionCreateDBRequest, RegionDBResponse, RegionUpdateDBRequest},
};
use crate::types::RegionId;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    pub r#type: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub struct Regions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Regions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Regions<'c> {
    type CreateRequest = RegionCreateDBRequest;
    type UpdateRequest = RegionUpdateDBRequest;
    type Response = RegionDBResponse;
    type Id = RegionId;
    type Filter = RegionFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let region = sqlx::query_as::<_, RegionDBResponse>(
            r#"
            INSERT INTO regions (name, type, latitude, longitude, manager_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.r#type)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.manager_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(region)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let region = sqlx::query_as::<_, RegionDBResponse>("SELECT * FROM regions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(region)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let regions = sqlx::query_as::<_, RegionDBResponse>(
            r#"
            SELECT * FROM regions
            WHERE ($1::varchar IS NULL OR type = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&filter.r#type)
        .bind(filter.limit.unwrap_or(100))
        .bind(filter.skip.unwrap_or(0))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(regions)
    }

    /// Deletes the region and everything monitored within it: sensors with
    /// their readings, alerts with their notifications, resources with their
    /// change history, and installed devices with their logs. All or nothing.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        match cascade::REGION.execute(&mut tx, id).await {
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
        let region = sqlx::query_as::<_, RegionDBResponse>(
            r#"
            UPDATE regions
            SET name = COALESCE($2, name),
                type = COALESCE($3, type),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                manager_id = COALESCE($6, manager_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.r#type)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.manager_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(region)
    }
}
