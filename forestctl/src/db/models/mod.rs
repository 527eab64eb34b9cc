//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a database table schema
//! - **SQLx Integration**: Response models derive `sqlx::FromRow` for query results
//! - **Separation**: Database models are distinct from API models to allow
//!   independent evolution of storage and API representations
//! - **Type Safety**: Uses id aliases from [`crate::types`] (UserId, RegionId, etc.)
//!
//! # Model Categories
//!
//! ## Accounts and Access Control
//!
//! - [`users`]: User accounts, credentials, lockout state
//! - [`rbac`]: Roles and permissions
//!
//! ## Monitoring Domain
//!
//! - [`regions`]: Monitoring regions
//! - [`sensors`]: Sensors and their readings
//! - [`devices`]: Field devices, status logs and maintenance records
//! - [`alerts`]: Alert rules, alerts and notifications
//! - [`resources`]: Forest resources and change history

pub mod alerts;
pub mod devices;
pub mod rbac;
pub mod regions;
pub mod resources;
pub mod sensors;
pub mod users;
