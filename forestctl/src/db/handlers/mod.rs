//! Repository implementations for database access.
//!
//! This module provides repository structs for each major entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//! - Opens its own transaction for multi-table writes (join rows, cascades)
//!
//! # Available Repositories
//!
//! - [`Users`]: User accounts, login attempt tracking and lockout
//! - [`Roles`]: Role definitions and user-role assignments
//! - [`Permissions`]: Permission definitions, role grants and access checks
//! - [`Regions`]: Monitoring regions (the widest cascade aggregate)
//! - [`Sensors`]: Sensors and their readings
//! - [`Devices`]: Field devices, status logs and maintenance records
//! - [`Alerts`]: Alert rules, triggered alerts and notifications
//! - [`ForestResources`]: Forest resources and their change history
//!
//! # Common Pattern
//!
//! All repositories follow this usage pattern:
//!
//! ```ignore
//! use forestctl::db::handlers::{Users, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Users::new(&mut conn);
//!     let user = repo.get_by_id(1).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Cascade Deletes
//!
//! `delete()` on an aggregate root (regions, devices, sensors, alert rules,
//! alerts, resources) removes dependent rows leaves-first using the plans in
//! [`crate::db::cascade`], all inside a single transaction.

pub mod alerts;
pub mod devices;
pub mod permissions;
pub mod regions;
pub mod repository;
pub mod resources;
pub mod roles;
pub mod sensors;
pub mod users;

pub use alerts::Alerts;
pub use devices::Devices;
pub use permissions::Permissions;
pub use regions::Regions;
pub use repository::Repository;
pub use resources::ForestResources;
pub use roles::Roles;
pub use sensors::Sensors;
pub use users::Users;
