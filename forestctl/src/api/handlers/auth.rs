//! Registration, login and the public role listing.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::models::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        rbac::RoleResponse,
        users::UserResponse,
    },
    auth::{credentials, password, token},
    db::{
        handlers::{Repository, Roles, Users},
        models::users::UserCreateDBRequest,
    },
    errors::{Error, Result},
    AppState,
};

/// Register a new user account
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "User registration is disabled".to_string(),
        });
    }

    request.validate()?;

    let password_config = &state.config.auth.password;
    let password_chars = request.password.chars().count();
    if password_chars < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!(
                "Password must be at least {} characters",
                password_config.min_length
            ),
        });
    }
    if password_chars > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!(
                "Password must be no more than {} characters",
                password_config.max_length
            ),
        });
    }

    let params = crate::auth::password::Argon2Params::from(password_config);
    let plaintext = request.password.clone();
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_string_with_params(&plaintext, Some(params)))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("password hashing task failed: {e}"),
            })??;

    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let user = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            username: request.username,
            email: request.email,
            real_name: request.real_name,
            phone: request.phone,
            password_hash,
            role_id: request.role_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Verify credentials and issue a bearer token
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user =
        credentials::verify_credentials(&state.db, &state.config, &request.username, &request.password)
            .await?;

    let token = token::issue_token(user.id, &user.username, &state.config)?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
        real_name: user.real_name,
    }))
}

/// Roles available at registration, in id order. Public so the registration
/// form can offer them before the user has a token.
#[tracing::instrument(skip_all)]
pub async fn get_available_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleResponse>>> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let roles = Roles::new(&mut conn)
        .list(&crate::db::handlers::roles::RoleFilter)
        .await?;

    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}
