//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract.
//!
//! They convert from the database models in [`crate::db::models`] and never
//! expose storage-only fields such as password hashes or lockout counters.

pub mod alerts;
pub mod auth;
pub mod devices;
pub mod rbac;
pub mod regions;
pub mod resources;
pub mod sensors;
pub mod users;
