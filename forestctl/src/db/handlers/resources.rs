//! Database repository for forest resources and their change history.

use crate::db::{
    cascade,
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::resources::{
        ForestResourceCreateDBRequest, ForestResourceDBResponse, ForestResourceUpdateDBRequest,
        ResourceChangeCreateDBRequest, ResourceChangeDBResponse,
    },
};
use crate::types::ResourceId;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct ForestResourceFilter {
    pub region_id: Option<i64>,
    pub resource_type: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub struct ForestResources<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ForestResources<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Append a change record. History is append-only; corrections are new
    /// records, not edits.
    #[instrument(skip(self, request), fields(resource_id = request.resource_id), err)]
    pub async fn add_change(
        &mut self,
        request: &ResourceChangeCreateDBRequest,
    ) -> Result<ResourceChangeDBResponse> {
        let change = sqlx::query_as::<_, ResourceChangeDBResponse>(
            r#"
            INSERT INTO resource_changes
                (resource_id, change_type, change_reason, change_amount, change_area, operator_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.resource_id)
        .bind(&request.change_type)
        .bind(&request.change_reason)
        .bind(request.change_amount)
        .bind(request.change_area)
        .bind(request.operator_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(change)
    }

    #[instrument(skip(self), err)]
    pub async fn list_changes(
        &mut self,
        resource_id: ResourceId,
    ) -> Result<Vec<ResourceChangeDBResponse>> {
        let changes = sqlx::query_as::<_, ResourceChangeDBResponse>(
            "SELECT * FROM resource_changes WHERE resource_id = $1 ORDER BY changed_at DESC",
        )
        .bind(resource_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(changes)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for ForestResources<'c> {
    type CreateRequest = ForestResourceCreateDBRequest;
    type UpdateRequest = ForestResourceUpdateDBRequest;
    type Response = ForestResourceDBResponse;
    type Id = ResourceId;
    type Filter = ForestResourceFilter;

    #[instrument(skip(self, request), fields(species = %request.species_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let resource = sqlx::query_as::<_, ForestResourceDBResponse>(
            r#"
            INSERT INTO resources
                (resource_type, region_id, species_name, quantity, area, growth_stage, planted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.resource_type)
        .bind(request.region_id)
        .bind(&request.species_name)
        .bind(request.quantity)
        .bind(request.area)
        .bind(&request.growth_stage)
        .bind(request.planted_at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(resource)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let resource =
            sqlx::query_as::<_, ForestResourceDBResponse>("SELECT * FROM resources WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(resource)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let resources = sqlx::query_as::<_, ForestResourceDBResponse>(
            r#"
            SELECT * FROM resources
            WHERE ($1::bigint IS NULL OR region_id = $1)
              AND ($2::varchar IS NULL OR resource_type = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.region_id)
        .bind(&filter.resource_type)
        .bind(filter.limit.unwrap_or(100))
        .bind(filter.skip.unwrap_or(0))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(resources)
    }

    /// Change history goes first, then the resource row
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        match cascade::RESOURCE.execute(&mut tx, id).await {
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
        let resource = sqlx::query_as::<_, ForestResourceDBResponse>(
            r#"
            UPDATE resources
            SET resource_type = COALESCE($2, resource_type),
                region_id = COALESCE($3, region_id),
                species_name = COALESCE($4, species_name),
                quantity = COALESCE($5, quantity),
                area = COALESCE($6, area),
                growth_stage = COALESCE($7, growth_stage),
                planted_at = COALESCE($8, planted_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.resource_type)
        .bind(request.region_id)
        .bind(&request.species_name)
        .bind(request.quantity)
        .bind(request.area)
        .bind(&request.growth_stage)
        .bind(request.planted_at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Regions;
    use crate::test_utils::create_region_request;
    use sqlx::PgPool;

    async fn make_resource(conn: &mut PgConnection) -> ForestResourceDBResponse {
        let region = Regions::new(conn).create(&create_region_request("North Ridge")).await.unwrap();
        ForestResources::new(conn)
            .create(&ForestResourceCreateDBRequest {
                resource_type: "TREE".to_string(),
                region_id: region.id,
                species_name: "Pinus sylvestris".to_string(),
                quantity: Some(1200),
                area: Some(3.5),
                growth_stage: "MATURE".to_string(),
                planted_at: None,
            })
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_change_history_is_recorded(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let resource = make_resource(&mut conn).await;

        let mut resources = ForestResources::new(&mut conn);
        resources
            .add_change(&ResourceChangeCreateDBRequest {
                resource_id: resource.id,
                change_type: "REDUCE".to_string(),
                change_reason: Some("Storm damage".to_string()),
                change_amount: Some(-40),
                change_area: None,
                operator_id: None,
            })
            .await
            .unwrap();

        let changes = resources.list_changes(resource.id).await.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, "REDUCE");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_removes_change_history(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let resource = make_resource(&mut conn).await;

        let mut resources = ForestResources::new(&mut conn);
        resources
            .add_change(&ResourceChangeCreateDBRequest {
                resource_id: resource.id,
                change_type: "ADD".to_string(),
                change_reason: None,
                change_amount: Some(100),
                change_area: None,
                operator_id: None,
            })
            .await
            .unwrap();

        assert!(resources.delete(resource.id).await.unwrap());
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resource_changes")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
