//! JWT bearer token issuance and verification.
//!
//! Tokens are signed with HS256 using the configured `secret_key` and pinned
//! to a fixed issuer and subject. Verification rejects any other algorithm,
//! including `none`, because [`Validation::new`] only accepts the algorithm
//! it was constructed with. There is no revocation: a token stays valid until
//! its `exp`, but permissions are re-read from the database on every request,
//! so a revoked permission takes effect immediately.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::Error, types::UserId};

pub const ISSUER: &str = "smart-forest-system";
pub const SUBJECT: &str = "user-authentication";

/// JWT claims carried by every issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub username: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: String,
}

impl Claims {
    /// Create new claims for a user, valid from now until now + configured expiry
    pub fn new(user_id: UserId, username: &str, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.token.expiry;

        Self {
            user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
            iss: ISSUER.to_string(),
            sub: SUBJECT.to_string(),
        }
    }
}

/// Token verification failures that map to distinct client behaviour.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token was valid once but its `exp` has passed
    #[error("Token expired")]
    Expired,

    /// Bad signature, wrong algorithm, garbled payload, or wrong issuer
    #[error("Token invalid")]
    Malformed,

    /// Key or crypto failures on our side
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Error::Unauthenticated {
                message: Some("Token has expired".to_string()),
            },
            TokenError::Malformed => Error::Unauthenticated { message: None },
            TokenError::Internal(e) => Error::Other(e),
        }
    }
}

/// Issue a signed bearer token for a user
pub fn issue_token(user_id: UserId, username: &str, config: &Config) -> Result<String, Error> {
    let claims = Claims::new(user_id, username, config);
    let secret_key = config.secret_key.as_ref().ok_or_else(|| Error::Internal {
        operation: "JWT tokens: secret_key is required".to_string(),
    })?;

    let key = EncodingKey::from_secret(secret_key.as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a bearer token
pub fn verify_token(token: &str, config: &Config) -> Result<Claims, TokenError> {
    let secret_key = config
        .secret_key
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("JWT tokens: secret_key is required"))?;

    let key = DecodingKey::from_secret(secret_key.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,

        // Client errors - malformed tokens, bad signatures, invalid claims
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::Malformed,

        // Server errors - key issues, internal failures
        jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
        | jsonwebtoken::errors::ErrorKind::RsaFailedSigning
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName
        | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
        | jsonwebtoken::errors::ErrorKind::MissingAlgorithm
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::Crypto(_) => {
            TokenError::Internal(anyhow::anyhow!("JWT verification: {e}"))
        }

        // Catch-all for any future error variants (default to server error for safety)
        _ => TokenError::Internal(anyhow::anyhow!("JWT verification (unknown error): {e}")),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.secret_key = Some("test-secret-key-for-jwt".to_string());
        config.auth.token.expiry = Duration::from_secs(2 * 60 * 60);
        config
    }

    #[test]
    fn test_issue_and_verify_token() {
        let config = create_test_config();

        let token = issue_token(42, "ranger", &config).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "ranger");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sub, SUBJECT);
        // Expiry is exactly the configured window after issuance
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_verify_invalid_token() {
        let config = create_test_config();

        let result = verify_token("invalid.token.here", &config);
        assert!(matches!(result.unwrap_err(), TokenError::Malformed));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let mut config = create_test_config();

        let token = issue_token(1, "ranger", &config).unwrap();

        // Try to verify with different secret
        config.secret_key = Some("different-secret".to_string());
        let result = verify_token(&token, &config);
        assert!(matches!(result.unwrap_err(), TokenError::Malformed));
    }

    #[test]
    fn test_verify_expired_token() {
        let config = create_test_config();

        // Manually create an expired token by setting exp in the past
        let now = Utc::now();
        let claims = Claims {
            user_id: 1,
            username: "ranger".to_string(),
            iat: (now - chrono::Duration::seconds(7200)).timestamp(),
            nbf: (now - chrono::Duration::seconds(7200)).timestamp(),
            exp: (now - chrono::Duration::seconds(3600)).timestamp(), // 1 hour ago
            iss: ISSUER.to_string(),
            sub: SUBJECT.to_string(),
        };

        let secret_key = config.secret_key.as_ref().unwrap();
        let key = EncodingKey::from_secret(secret_key.as_bytes());
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        let result = verify_token(&token, &config);
        // Expired is distinguishable from malformed
        assert!(matches!(result.unwrap_err(), TokenError::Expired));
    }

    #[test]
    fn test_verify_wrong_issuer() {
        let config = create_test_config();

        let now = Utc::now();
        let claims = Claims {
            user_id: 1,
            username: "ranger".to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + chrono::Duration::seconds(3600)).timestamp(),
            iss: "someone-else".to_string(),
            sub: SUBJECT.to_string(),
        };

        let secret_key = config.secret_key.as_ref().unwrap();
        let key = EncodingKey::from_secret(secret_key.as_bytes());
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result.unwrap_err(), TokenError::Malformed));
    }

    #[test]
    fn test_verify_wrong_algorithm() {
        let config = create_test_config();
        let claims = Claims::new(1, "ranger", &config);

        // Sign with HS512; verification pins HS256
        let secret_key = config.secret_key.as_ref().unwrap();
        let key = EncodingKey::from_secret(secret_key.as_bytes());
        let token = encode(&Header::new(Algorithm::HS512), &claims, &key).unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result.unwrap_err(), TokenError::Malformed));
    }

    #[test]
    fn test_verify_malformed_token() {
        let config = create_test_config();

        let malformed_tokens = vec!["not.a.token", "invalid", "", "too.many.parts.in.this.token"];

        for token in malformed_tokens {
            let result = verify_token(token, &config);
            assert!(
                matches!(result.unwrap_err(), TokenError::Malformed),
                "Expected Malformed error for token: {}",
                token
            );
        }
    }
}
