//! Database models for users.

use crate::types::{RoleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account lifecycle state, stored as the `user_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Locked,
}

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    pub email: String,
    pub real_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role_id: RoleId,
}

/// Database request for updating a user's profile
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub email: Option<String>,
    pub real_name: Option<String>,
    pub phone: Option<String>,
}

/// Database response for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub real_name: String,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub login_attempts: i32,
    pub last_login_at: Option<DateTime<Utc>>,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
