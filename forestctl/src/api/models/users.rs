//! API request/response models for users.

use crate::db::models::users::{UserDBResponse, UserStatus};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Public view of a user account. The password hash and lockout bookkeeping
/// stay in the database model.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub real_name: String,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(user: UserDBResponse) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            real_name: user.real_name,
            phone: user.phone,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}
