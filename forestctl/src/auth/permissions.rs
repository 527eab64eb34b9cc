//! Permission-gated request extraction.
//!
//! [`RequiresPermission`] composes on top of
//! [`CurrentUser`](crate::auth::current_user::CurrentUser): it authenticates
//! the bearer token, then checks that some role of the user grants the
//! (resource, action) pair named in the type. Handlers declare what they
//! need in their signature:
//!
//! ```ignore
//! async fn delete_region(
//!     _perm: RequiresPermission<resource::Regions, action::Manage>,
//!     State(state): State<AppState>,
//!     Path(id): Path<RegionId>,
//! ) -> Result<StatusCode> { ... }
//! ```
//!
//! The check re-reads the permission graph on every request, so revoking a
//! role takes effect immediately even for tokens issued earlier. If the
//! check itself cannot run, the request is denied (503), never allowed
//! through.

use crate::{
    auth::current_user::CurrentUser,
    db::handlers::Permissions,
    errors::{Error, Result},
    types::{Action, Resource},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use tracing::{debug, error, instrument};

/// Type-level name for the resource a handler operates on
pub trait ResourceMarker: Send + Sync {
    const RESOURCE: Resource;
}

/// Type-level name for the action a handler performs
pub trait ActionMarker: Send + Sync {
    const ACTION: Action;
}

macro_rules! resource_markers {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub struct $name;
            impl ResourceMarker for $name {
                const RESOURCE: Resource = Resource::$variant;
            }
        )*
    };
}

/// Marker types for [`Resource`] variants
pub mod resource {
    use super::ResourceMarker;
    use crate::types::Resource;

    resource_markers! {
        Regions => Regions,
        Sensors => Sensors,
        Alerts => Alerts,
        Resources => Resources,
        Devices => Devices,
        Roles => Roles,
        Users => Users,
        Permissions => Permissions,
    }
}

/// Marker types for [`Action`] variants
pub mod action {
    use super::ActionMarker;
    use crate::types::Action;

    pub struct View;
    impl ActionMarker for View {
        const ACTION: Action = Action::View;
    }

    pub struct Manage;
    impl ActionMarker for Manage {
        const ACTION: Action = Action::Manage;
    }
}

/// Extractor that rejects the request unless the authenticated user holds
/// the permission named by the type parameters
pub struct RequiresPermission<R: ResourceMarker, A: ActionMarker> {
    pub user: CurrentUser,
    _marker: PhantomData<(R, A)>,
}

impl<R: ResourceMarker, A: ActionMarker> FromRequestParts<AppState> for RequiresPermission<R, A> {
    type Rejection = Error;

    #[instrument(skip(parts, state), fields(resource = %R::RESOURCE, action = %A::ACTION))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        let mut conn = match state.db.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Could not acquire connection for permission check: {e}");
                return Err(Error::AuthorizationUnavailable);
            }
        };

        let allowed = Permissions::new(&mut conn)
            .user_has_permission(user.id, R::RESOURCE.as_str(), A::ACTION.as_str())
            .await
            .map_err(|e| {
                error!("Permission check failed: {e}");
                Error::AuthorizationUnavailable
            })?;

        if !allowed {
            debug!(user_id = user.id, "Permission denied");
            return Err(Error::InsufficientPermissions {
                resource: R::RESOURCE,
                action: A::ACTION,
            });
        }

        Ok(RequiresPermission {
            user,
            _marker: PhantomData,
        })
    }
}
