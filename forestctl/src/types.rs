//! Shared identifier aliases and the permission vocabulary.
//!
//! Every table keyed by a `BIGSERIAL` gets an alias here so signatures say
//! what they take rather than `i64`. The [`Resource`]/[`Action`] pair is the
//! unit of authorization: routes declare the pair they require and the
//! permission graph is queried for it on each request.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = i64;
pub type RoleId = i64;
pub type PermissionId = i64;
pub type RegionId = i64;
pub type SensorId = i64;
pub type DeviceId = i64;
pub type AlertRuleId = i64;
pub type AlertId = i64;
pub type ResourceId = i64;

/// Protected resource classes. Stored in the `permissions.resource` column
/// as the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Regions,
    Sensors,
    Alerts,
    Resources,
    Devices,
    Roles,
    Users,
    Permissions,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Regions => "regions",
            Resource::Sensors => "sensors",
            Resource::Alerts => "alerts",
            Resource::Resources => "resources",
            Resource::Devices => "devices",
            Resource::Roles => "roles",
            Resource::Users => "users",
            Resource::Permissions => "permissions",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a permission allows on its resource. `view` covers reads, `manage`
/// covers create/update/delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Manage,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Manage => "manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
