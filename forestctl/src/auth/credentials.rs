//! Username/password verification with failed-attempt lockout.

use crate::auth::password;
use crate::config::Config;
use crate::db::handlers::Users;
use crate::db::models::users::{UserDBResponse, UserStatus};
use crate::errors::{Error, Result};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

/// Verify a username/password pair, enforcing account status and the
/// failed-attempt lockout.
///
/// Counter updates run as individual statements on their own connection, not
/// inside a surrounding transaction, so a failed login still persists the
/// incremented attempt count.
///
/// Unknown usernames and wrong passwords both come back as
/// [`Error::InvalidCredentials`]; the response never says which it was.
#[instrument(skip(db, config, supplied_password), err(level = "info"))]
pub async fn verify_credentials(
    db: &PgPool,
    config: &Config,
    username: &str,
    supplied_password: &str,
) -> Result<UserDBResponse> {
    let mut conn = db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let mut users = Users::new(&mut conn);

    let Some(user) = users.get_by_username(username).await? else {
        debug!("Login attempt for unknown username");
        return Err(Error::InvalidCredentials);
    };

    match user.status {
        UserStatus::Inactive => {
            info!(user_id = user.id, "Login attempt on disabled account");
            return Err(Error::AccountDisabled);
        }
        UserStatus::Locked => {
            match user.locked_until {
                Some(until) if until > Utc::now() => {
                    info!(user_id = user.id, "Login attempt on locked account");
                    return Err(Error::AccountLocked { until });
                }
                // Lock window has passed (or was never recorded): unlock and
                // continue with verification
                _ => {
                    info!(user_id = user.id, "Lock expired, unlocking account");
                    users.unlock(user.id).await?;
                }
            }
        }
        UserStatus::Active => {}
    }

    // Argon2 verification is CPU-bound; keep it off the async executor
    let password_hash = user.password_hash.clone();
    let supplied = supplied_password.to_string();
    let matches =
        tokio::task::spawn_blocking(move || password::verify_string(&supplied, &password_hash))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("password verification task failed: {e}"),
            })??;

    if !matches {
        let locked_until = Utc::now() + config.auth.lockout.lock_duration;
        let attempts = users
            .record_failed_login(user.id, config.auth.lockout.max_attempts, locked_until)
            .await?;
        if attempts >= config.auth.lockout.max_attempts {
            warn!(user_id = user.id, attempts, "Account locked after repeated failed logins");
        } else {
            debug!(user_id = user.id, attempts, "Failed login attempt recorded");
        }
        return Err(Error::InvalidCredentials);
    }

    users.record_successful_login(user.id).await?;
    debug!(user_id = user.id, "Credentials verified");

    Ok(user)
}
