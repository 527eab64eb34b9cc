//! Authentication and authorization system.
//!
//! This module provides the full auth stack:
//! - Credential verification with failed-attempt lockout
//! - Password hashing and verification using Argon2
//! - Stateless bearer tokens (HS256 JWTs)
//! - Role-based permission checks on every request
//!
//! # Authentication
//!
//! Clients log in via `POST /auth/login` with username/password and receive
//! a signed JWT. The token is passed on subsequent requests in the
//! `Authorization: Bearer <token>` header and verified by the
//! [`current_user::CurrentUser`] extractor. Tokens expire; there is no
//! server-side session to revoke.
//!
//! Five consecutive failed logins lock the account for the configured
//! window; the lock clears itself on the next login attempt after it
//! expires. See [`credentials`].
//!
//! # Authorization
//!
//! Access control is role-based: users hold roles, roles hold permissions,
//! and a permission names a resource and an action (for example
//! `regions`/`manage`). Handlers declare the pair they need with the
//! [`permissions::RequiresPermission`] extractor; the permission graph is
//! re-read per request, so role changes apply to tokens already in flight.
//!
//! # Modules
//!
//! - [`credentials`]: Username/password verification and lockout
//! - [`current_user`]: Extractor for the authenticated user
//! - [`password`]: Password hashing and verification using Argon2
//! - [`permissions`]: Permission-gated request extraction
//! - [`token`]: JWT issuing and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use forestctl::auth::current_user::CurrentUser;
//! use forestctl::auth::permissions::{action, resource, RequiresPermission};
//!
//! // Any valid token
//! async fn me(user: CurrentUser) -> Result<String> {
//!     Ok(format!("Hello, {}!", user.username))
//! }
//!
//! // Token plus the regions/manage permission
//! async fn delete_region(
//!     perm: RequiresPermission<resource::Regions, action::Manage>,
//! ) -> Result<()> {
//!     ...
//! }
//! ```

pub mod credentials;
pub mod current_user;
pub mod password;
pub mod permissions;
pub mod token;
