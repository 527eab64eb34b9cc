//! Database repository for roles and user-role assignments.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::rbac::{RoleCreateDBRequest, RoleDBResponse, RoleUpdateDBRequest},
};
use crate::types::{RoleId, UserId};
use sqlx::{Connection, PgConnection};
use tracing::instrument;

/// Filter for listing roles (roles are few; no pagination)
#[derive(Debug, Clone, Default)]
pub struct RoleFilter;

pub struct Roles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Roles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Assign a role to a user. Idempotent: assigning an already-held role is
    /// a no-op, reported by the `false` return.
    #[instrument(skip(self), err)]
    pub async fn assign_to_user(&mut self, user_id: UserId, role_id: RoleId) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a role from a user, returning whether the assignment existed
    #[instrument(skip(self), err)]
    pub async fn remove_from_user(&mut self, user_id: UserId, role_id: RoleId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All roles held by a user, ordered by role id
    #[instrument(skip(self), err)]
    pub async fn roles_for_user(&mut self, user_id: UserId) -> Result<Vec<RoleDBResponse>> {
        let roles = sqlx::query_as::<_, RoleDBResponse>(
            r#"
            SELECT r.*
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(roles)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Roles<'c> {
    type CreateRequest = RoleCreateDBRequest;
    type UpdateRequest = RoleUpdateDBRequest;
    type Response = RoleDBResponse;
    type Id = RoleId;
    type Filter = RoleFilter;

    #[instrument(skip(self, request), fields(role_name = %request.role_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let role = sqlx::query_as::<_, RoleDBResponse>(
            "INSERT INTO roles (role_name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&request.role_name)
        .bind(&request.description)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(role)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let role = sqlx::query_as::<_, RoleDBResponse>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(role)
    }

    /// Stable id order so role listings (including the public registration
    /// list) are deterministic
    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let roles = sqlx::query_as::<_, RoleDBResponse>("SELECT * FROM roles ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(roles)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        // Join rows first: user assignments and permission grants both point
        // at the role
        sqlx::query("DELETE FROM user_roles WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let role = sqlx::query_as::<_, RoleDBResponse>(
            r#"
            UPDATE roles
            SET role_name = COALESCE($2, role_name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.role_name)
        .bind(&request.description)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::db::handlers::Users;
    use crate::test_utils::create_user_request;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_role_crud(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut roles = Roles::new(&mut conn);

        let role = roles
            .create(&RoleCreateDBRequest {
                role_name: "FIRE_WATCH".to_string(),
                description: Some("Watches for fires".to_string()),
            })
            .await
            .unwrap();

        let fetched = roles.get_by_id(role.id).await.unwrap().unwrap();
        assert_eq!(fetched.role_name, "FIRE_WATCH");

        let updated = roles
            .update(
                role.id,
                &RoleUpdateDBRequest {
                    role_name: None,
                    description: Some("Fire watch duty".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role_name, "FIRE_WATCH");
        assert_eq!(updated.description.as_deref(), Some("Fire watch duty"));

        assert!(roles.delete(role.id).await.unwrap());
        assert!(roles.get_by_id(role.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_role_name_conflicts(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut roles = Roles::new(&mut conn);

        let request = RoleCreateDBRequest {
            role_name: "FIRE_WATCH".to_string(),
            description: None,
        };
        roles.create(&request).await.unwrap();
        let err = roles.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_ordered_by_id(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut roles = Roles::new(&mut conn);

        let listed = roles.list(&RoleFilter).await.unwrap();
        // Four built-in roles are seeded by the migrations
        assert!(listed.len() >= 4);
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_assign_role_is_idempotent(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).create(&create_user_request("ranger1")).await.unwrap();

        let mut roles = Roles::new(&mut conn);
        let role = roles
            .create(&RoleCreateDBRequest {
                role_name: "FIRE_WATCH".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert!(roles.assign_to_user(user.id, role.id).await.unwrap());
        // Second grant is a no-op, not an error
        assert!(!roles.assign_to_user(user.id, role.id).await.unwrap());

        let held = roles.roles_for_user(user.id).await.unwrap();
        assert_eq!(held.iter().filter(|r| r.id == role.id).count(), 1);

        assert!(roles.remove_from_user(user.id, role.id).await.unwrap());
        assert!(!roles.remove_from_user(user.id, role.id).await.unwrap());
    }
}
