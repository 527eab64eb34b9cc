//! Request extractor for the authenticated user.

use crate::{
    auth::token,
    errors::{Error, Result},
    types::UserId,
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// The user a request is acting as, established from its bearer token.
///
/// Handlers take this as an extractor argument; requests without a valid
/// token are rejected with 401 before the handler runs. Permissions are NOT
/// checked here; see [`crate::auth::permissions::RequiresPermission`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

/// Pull the token out of the `Authorization: Bearer <token>` header.
/// Returns:
/// - None: no Authorization header present
/// - Some(Ok(token)): well-formed bearer header
/// - Some(Err(error)): header present but not a bearer token
fn bearer_token(parts: &Parts) -> Option<Result<&str>> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let value = match header.to_str() {
        Ok(v) => v,
        Err(_) => {
            return Some(Err(Error::Unauthenticated {
                message: Some("Invalid authorization header".to_string()),
            }))
        }
    };

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Some(Ok(token)),
        _ => Some(Err(Error::Unauthenticated {
            message: Some("Authorization header must be a bearer token".to_string()),
        })),
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = match bearer_token(parts) {
            Some(Ok(token)) => token,
            Some(Err(e)) => {
                trace!("Malformed authorization header: {:?}", e);
                return Err(e);
            }
            None => {
                trace!("No authorization header present");
                return Err(Error::Unauthenticated { message: None });
            }
        };

        let claims = token::verify_token(token, &state.config)?;
        debug!(user_id = claims.user_id, "Authenticated bearer token");

        Ok(CurrentUser {
            id: claims.user_id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap().unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_none() {
        let parts = parts_with_auth(None);
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "token abc"] {
            let parts = parts_with_auth(Some(value));
            assert!(bearer_token(&parts).unwrap().is_err(), "{value}");
        }
    }
}
