use crate::db::errors::DbError;
use crate::types::{Action, Resource};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided, or a token that failed
    /// verification
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Username unknown or password mismatch. Deliberately a single variant
    /// so responses cannot be used to probe which usernames exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Too many consecutive failed logins
    #[error("Account locked until {until}")]
    AccountLocked { until: DateTime<Utc> },

    /// Account exists but has been deactivated
    #[error("Account disabled")]
    AccountDisabled,

    /// User lacks the required permission for the operation
    #[error("Insufficient permissions to {action} {resource}")]
    InsufficientPermissions { resource: Resource, action: Action },

    /// Permission check could not be completed. Authorization fails closed:
    /// the request is refused rather than allowed through.
    #[error("Authorization check unavailable")]
    AuthorizationUnavailable,

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// Conflict error, e.g., for unique constraint violations
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::AccountLocked { .. } => StatusCode::UNAUTHORIZED,
            Error::AccountDisabled => StatusCode::UNAUTHORIZED,
            Error::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            Error::AuthorizationUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CascadeFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message
                .clone()
                .unwrap_or_else(|| "Authentication required".to_string()),
            // Same message whether the username was unknown, the password
            // was wrong, or the account is disabled.
            Error::InvalidCredentials | Error::AccountDisabled => {
                "Invalid username or password".to_string()
            }
            Error::AccountLocked { until } => {
                format!("Account is locked until {}", until.format("%Y-%m-%d %H:%M:%S UTC"))
            }
            Error::InsufficientPermissions { action, resource } => {
                format!("Insufficient permissions to {action} {resource}")
            }
            Error::AuthorizationUnavailable => {
                "Authorization check is temporarily unavailable".to_string()
            }
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => {
                format!("{resource} with ID {id} not found")
            }
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => {
                    match (table.as_deref(), constraint.as_deref()) {
                        (Some("users"), Some(c)) if c.contains("email") => {
                            "An account with this email address already exists".to_string()
                        }
                        (Some("users"), Some(c)) if c.contains("username") => {
                            "This username is already taken".to_string()
                        }
                        (Some("roles"), _) => "A role with this name already exists".to_string(),
                        (Some("permissions"), _) => {
                            "A permission with this name already exists".to_string()
                        }
                        _ => "Resource already exists".to_string(),
                    }
                }
                DbError::ForeignKeyViolation { .. } => {
                    "Invalid reference to related resource".to_string()
                }
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::CascadeFailed { .. } => "Deletion failed".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
            Error::Conflict { message } => message.clone(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_) | DbError::CascadeFailed { .. })
            | Error::Internal { .. }
            | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::AuthorizationUnavailable => {
                tracing::error!("Authorization store unavailable: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. }
            | Error::InvalidCredentials
            | Error::AccountLocked { .. }
            | Error::AccountDisabled
            | Error::InsufficientPermissions { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
        }

        let status = self.status_code();
        let user_message = self.user_message();
        (status, user_message).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
