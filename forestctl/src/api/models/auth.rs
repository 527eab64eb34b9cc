//! API models for registration, login and password changes.

use crate::errors::{Error, Result};
use crate::types::{RoleId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub real_name: String,
    pub phone: Option<String>,
    pub role_id: RoleId,
}

impl RegisterRequest {
    /// Field-level validation; password length bounds come from config and
    /// are checked by the handler.
    pub fn validate(&self) -> Result<()> {
        // Bounds count characters, not bytes; names are routinely multibyte
        let username_chars = self.username.chars().count();
        if username_chars < 3 || username_chars > 50 {
            return Err(Error::BadRequest {
                message: "Username must be between 3 and 50 characters".to_string(),
            });
        }
        if !self.email.contains('@') {
            return Err(Error::BadRequest {
                message: "Email address is not valid".to_string(),
            });
        }
        let real_name_chars = self.real_name.chars().count();
        if real_name_chars < 2 || real_name_chars > 50 {
            return Err(Error::BadRequest {
                message: "Real name must be between 2 and 50 characters".to_string(),
            });
        }
        if self.role_id < 1 {
            return Err(Error::BadRequest {
                message: "A role must be chosen at registration".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    pub real_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "ranger1".to_string(),
            password: "hunter22".to_string(),
            email: "ranger1@forest.example".to_string(),
            real_name: "Robin Asher".to_string(),
            phone: None,
            role_id: 4,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_short_username_rejected() {
        let mut request = valid_request();
        request.username = "ab".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_multibyte_name_counted_in_characters() {
        let mut request = valid_request();
        // Two characters, six bytes; must pass the 2-character minimum
        request.real_name = "林森".to_string();
        assert!(request.validate().is_ok());

        // 50 characters, 150 bytes; must pass the 50-character maximum
        request.username = "森".repeat(50);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_missing_role_rejected() {
        let mut request = valid_request();
        request.role_id = 0;
        assert!(request.validate().is_err());
    }
}
