//! HTTP handlers for the current user's own account.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::models::{auth::UpdatePasswordRequest, users::UserResponse},
    auth::{current_user::CurrentUser, password},
    db::handlers::{Repository, Users},
    errors::{Error, Result},
    AppState,
};

/// Profile of the authenticated user
#[tracing::instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserResponse>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let stored = Users::new(&mut conn)
        .get_by_id(user.id)
        .await?
        .ok_or(Error::NotFound {
            resource: "user".to_string(),
            id: user.id.to_string(),
        })?;

    Ok(Json(stored.into()))
}

/// Change the authenticated user's password, verifying the old one first
#[tracing::instrument(skip_all)]
pub async fn update_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode> {
    let password_config = &state.config.auth.password;
    let new_password_chars = request.new_password.chars().count();
    if new_password_chars < password_config.min_length || new_password_chars > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!(
                "Password must be between {} and {} characters",
                password_config.min_length, password_config.max_length
            ),
        });
    }

    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let mut users = Users::new(&mut conn);
    let stored = users.get_by_id(user.id).await?.ok_or(Error::NotFound {
        resource: "user".to_string(),
        id: user.id.to_string(),
    })?;

    let old_hash = stored.password_hash;
    let old_password = request.old_password;
    let matches = tokio::task::spawn_blocking(move || password::verify_string(&old_password, &old_hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("password verification task failed: {e}"),
        })??;
    if !matches {
        return Err(Error::InvalidCredentials);
    }

    let params = password::Argon2Params::from(password_config);
    let new_password = request.new_password;
    let new_hash =
        tokio::task::spawn_blocking(move || password::hash_string_with_params(&new_password, Some(params)))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("password hashing task failed: {e}"),
            })??;

    users.update_password(user.id, &new_hash).await?;

    Ok(StatusCode::NO_CONTENT)
}
