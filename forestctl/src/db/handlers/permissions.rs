//! Database repository for permissions, role-permission grants, and the
//! permission checks the request middleware runs.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::rbac::{PermissionCreateDBRequest, PermissionDBResponse, PermissionUpdateDBRequest},
};
use crate::types::{PermissionId, RoleId, UserId};
use sqlx::{Connection, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct PermissionFilter;

pub struct Permissions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Permissions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Grant a permission to a role. Idempotent; `false` means the role
    /// already held it.
    #[instrument(skip(self), err)]
    pub async fn assign_to_role(
        &mut self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke a permission from a role, returning whether the grant existed
    #[instrument(skip(self), err)]
    pub async fn remove_from_role(
        &mut self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All permissions granted to a role, ordered by permission id
    #[instrument(skip(self), err)]
    pub async fn permissions_for_role(
        &mut self,
        role_id: RoleId,
    ) -> Result<Vec<PermissionDBResponse>> {
        let permissions = sqlx::query_as::<_, PermissionDBResponse>(
            r#"
            SELECT p.*
            FROM permissions p
            INNER JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(role_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(permissions)
    }

    /// The union of permissions across all of a user's roles. A permission
    /// reachable through several roles appears once.
    #[instrument(skip(self), err)]
    pub async fn permissions_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Vec<PermissionDBResponse>> {
        let permissions = sqlx::query_as::<_, PermissionDBResponse>(
            r#"
            SELECT DISTINCT p.*
            FROM permissions p
            INNER JOIN role_permissions rp ON rp.permission_id = p.id
            INNER JOIN user_roles ur ON ur.role_id = rp.role_id
            WHERE ur.user_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(permissions)
    }

    /// Whether any of the user's roles grants a permission on this
    /// resource/action pair. Two hops: user -> roles -> permissions.
    #[instrument(skip(self), err)]
    pub async fn user_has_permission(
        &mut self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> Result<bool> {
        let has_permission = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles ur
                INNER JOIN role_permissions rp ON rp.role_id = ur.role_id
                INNER JOIN permissions p ON p.id = rp.permission_id
                WHERE ur.user_id = $1
                  AND p.resource = $2
                  AND p.action = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(resource)
        .bind(action)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(has_permission)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Permissions<'c> {
    type CreateRequest = PermissionCreateDBRequest;
    type UpdateRequest = PermissionUpdateDBRequest;
    type Response = PermissionDBResponse;
    type Id = PermissionId;
    type Filter = PermissionFilter;

    #[instrument(skip(self, request), fields(permission_name = %request.permission_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let permission = sqlx::query_as::<_, PermissionDBResponse>(
            r#"
            INSERT INTO permissions (permission_name, resource, action, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.permission_name)
        .bind(&request.resource)
        .bind(&request.action)
        .bind(&request.description)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(permission)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let permission =
            sqlx::query_as::<_, PermissionDBResponse>("SELECT * FROM permissions WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(permission)
    }

    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let permissions =
            sqlx::query_as::<_, PermissionDBResponse>("SELECT * FROM permissions ORDER BY id")
                .fetch_all(&mut *self.db)
                .await?;

        Ok(permissions)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        // Grants referencing the permission go first
        sqlx::query("DELETE FROM role_permissions WHERE permission_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let permission = sqlx::query_as::<_, PermissionDBResponse>(
            r#"
            UPDATE permissions
            SET permission_name = COALESCE($2, permission_name),
                resource = COALESCE($3, resource),
                action = COALESCE($4, action),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.permission_name)
        .bind(&request.resource)
        .bind(&request.action)
        .bind(&request.description)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Roles, Users};
    use crate::db::models::rbac::RoleCreateDBRequest;
    use crate::test_utils::create_user_request;
    use sqlx::PgPool;

    async fn make_role(conn: &mut PgConnection, name: &str) -> RoleId {
        Roles::new(conn)
            .create(&RoleCreateDBRequest {
                role_name: name.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn make_permission(conn: &mut PgConnection, name: &str, resource: &str, action: &str) -> PermissionId {
        Permissions::new(conn)
            .create(&PermissionCreateDBRequest {
                permission_name: name.to_string(),
                resource: resource.to_string(),
                action: action.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_permission_check_follows_both_hops(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).create(&create_user_request("ranger1")).await.unwrap();

        let role_id = make_role(&mut conn, "FIRE_WATCH").await;
        let perm_id = make_permission(&mut conn, "fires:manage", "fires", "manage").await;

        let mut permissions = Permissions::new(&mut conn);
        // No role holds it, no user holds the role: denied
        assert!(!permissions.user_has_permission(user.id, "fires", "manage").await.unwrap());

        permissions.assign_to_role(role_id, perm_id).await.unwrap();
        assert!(!permissions.user_has_permission(user.id, "fires", "manage").await.unwrap());

        Roles::new(&mut conn).assign_to_user(user.id, role_id).await.unwrap();
        let mut permissions = Permissions::new(&mut conn);
        assert!(permissions.user_has_permission(user.id, "fires", "manage").await.unwrap());
        // Different action on the same resource is still denied
        assert!(!permissions.user_has_permission(user.id, "fires", "view").await.unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_user_permissions_are_a_union_without_duplicates(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).create(&create_user_request("ranger1")).await.unwrap();

        let role_a = make_role(&mut conn, "FIRE_WATCH").await;
        let role_b = make_role(&mut conn, "TRAIL_CREW").await;
        let shared = make_permission(&mut conn, "fires:view", "fires", "view").await;
        let only_b = make_permission(&mut conn, "trails:manage", "trails", "manage").await;

        let mut permissions = Permissions::new(&mut conn);
        permissions.assign_to_role(role_a, shared).await.unwrap();
        permissions.assign_to_role(role_b, shared).await.unwrap();
        permissions.assign_to_role(role_b, only_b).await.unwrap();

        let mut roles = Roles::new(&mut conn);
        roles.assign_to_user(user.id, role_a).await.unwrap();
        roles.assign_to_user(user.id, role_b).await.unwrap();

        let held = Permissions::new(&mut conn).permissions_for_user(user.id).await.unwrap();
        let ids: Vec<_> = held.iter().map(|p| p.id).collect();
        assert!(ids.contains(&shared));
        assert!(ids.contains(&only_b));
        // The shared permission shows up once despite two granting roles
        assert_eq!(ids.iter().filter(|&&id| id == shared).count(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_grant_to_role_is_idempotent(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let role_id = make_role(&mut conn, "FIRE_WATCH").await;
        let perm_id = make_permission(&mut conn, "fires:view", "fires", "view").await;

        let mut permissions = Permissions::new(&mut conn);
        assert!(permissions.assign_to_role(role_id, perm_id).await.unwrap());
        assert!(!permissions.assign_to_role(role_id, perm_id).await.unwrap());

        let held = permissions.permissions_for_role(role_id).await.unwrap();
        assert_eq!(held.len(), 1);

        assert!(permissions.remove_from_role(role_id, perm_id).await.unwrap());
        assert!(!permissions.remove_from_role(role_id, perm_id).await.unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_removes_role_grants_first(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let role_id = make_role(&mut conn, "FIRE_WATCH").await;
        let perm_id = make_permission(&mut conn, "fires:view", "fires", "view").await;

        let mut permissions = Permissions::new(&mut conn);
        permissions.assign_to_role(role_id, perm_id).await.unwrap();
        assert!(permissions.delete(perm_id).await.unwrap());

        let remaining = permissions.permissions_for_role(role_id).await.unwrap();
        assert!(remaining.is_empty());
    }
}
