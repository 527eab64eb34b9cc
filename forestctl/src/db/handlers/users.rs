//! Database repository for users.

use crate::types::UserId;
use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, PgConnection};
use tracing::instrument;

/// Filter for listing users
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub skip: i64,
    pub limit: i64,
}

impl UserFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_username(&mut self, username: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    /// Record a failed login attempt, locking the account once the attempt
    /// counter reaches `max_attempts`. Returns the new attempt count.
    ///
    /// A single UPDATE so concurrent failures serialize on the row lock and
    /// the threshold comparison always sees the incremented count.
    #[instrument(skip(self), err)]
    pub async fn record_failed_login(
        &mut self,
        id: UserId,
        max_attempts: i32,
        locked_until: DateTime<Utc>,
    ) -> Result<i32> {
        let attempts = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET login_attempts = login_attempts + 1,
                status = CASE WHEN login_attempts + 1 >= $2 THEN 'LOCKED'::user_status ELSE status END,
                locked_until = CASE WHEN login_attempts + 1 >= $2 THEN $3 ELSE locked_until END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING login_attempts
            "#,
        )
        .bind(id)
        .bind(max_attempts)
        .bind(locked_until)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(attempts)
    }

    /// Reset the failure counter and stamp the login time after a successful login
    #[instrument(skip(self), err)]
    pub async fn record_successful_login(&mut self, id: UserId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET login_attempts = 0, locked_until = NULL, last_login_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(())
    }

    /// Clear an expired lock, restoring the account to active
    #[instrument(skip(self), err)]
    pub async fn unlock(&mut self, id: UserId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET status = 'ACTIVE'::user_status, login_attempts = 0, locked_until = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, password_hash), err)]
    pub async fn update_password(&mut self, id: UserId, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&mut *self.db)
            .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        // Insert user
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (username, password_hash, email, real_name, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.username)
        .bind(&request.password_hash)
        .bind(&request.email)
        .bind(&request.real_name)
        .bind(&request.phone)
        .fetch_one(&mut *tx)
        .await?;

        // Assign the chosen role in the same transaction, so a bad role_id
        // rolls back the user row as well
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user.id)
            .bind(request.role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        // Join rows first, then the user row
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                real_name = COALESCE($3, real_name),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.email)
        .bind(&request.real_name)
        .bind(&request.phone)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::test_utils::create_user_request;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_fetch_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let created = users.create(&create_user_request("ranger1")).await.unwrap();
        assert_eq!(created.username, "ranger1");
        assert_eq!(created.login_attempts, 0);

        let fetched = users.get_by_username("ranger1").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);

        let missing = users.get_by_username("nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_username_is_unique_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        users.create(&create_user_request("ranger1")).await.unwrap();
        let err = users.create(&create_user_request("ranger1")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_with_bad_role_rolls_back_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let mut request = create_user_request("ranger1");
        request.role_id = 999_999;
        let err = users.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // The user insert must not have survived the failed role assignment
        assert!(users.get_by_username("ranger1").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_failed_login_counter_locks_at_threshold(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let user = users.create(&create_user_request("ranger1")).await.unwrap();
        let until = chrono::Utc::now() + chrono::Duration::hours(1);

        for expected in 1..=2 {
            let attempts = users.record_failed_login(user.id, 3, until).await.unwrap();
            assert_eq!(attempts, expected);
            let row = users.get_by_id(user.id).await.unwrap().unwrap();
            assert_eq!(row.status, crate::db::models::users::UserStatus::Active);
        }

        let attempts = users.record_failed_login(user.id, 3, until).await.unwrap();
        assert_eq!(attempts, 3);
        let row = users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(row.status, crate::db::models::users::UserStatus::Locked);
        assert!(row.locked_until.is_some());

        // Successful login resets the counter and clears the lock timestamp
        users.record_successful_login(user.id).await.unwrap();
        let row = users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(row.login_attempts, 0);
        assert!(row.locked_until.is_none());
        assert!(row.last_login_at.is_some());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_removes_role_assignments(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let user = users.create(&create_user_request("ranger1")).await.unwrap();
        assert!(users.delete(user.id).await.unwrap());
        assert!(!users.delete(user.id).await.unwrap());

        let join_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(join_rows, 0);
    }
}
