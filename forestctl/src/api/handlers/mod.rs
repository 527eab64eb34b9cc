//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication and authorization checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration, login and the public role listing
//! - [`users`]: The current user's profile and password changes
//! - [`rbac`]: Role and permission administration
//! - [`regions`]: Monitoring region CRUD
//! - [`sensors`]: Sensor CRUD and reading ingestion
//! - [`devices`]: Device CRUD, status reports and maintenance records
//! - [`alerts`]: Alert rules, alerts and notifications
//! - [`resources`]: Forest resource CRUD and change history
//!
//! # Authentication
//!
//! Handlers under `/api` require a bearer token; most also declare a
//! required permission through the
//! [`crate::auth::permissions::RequiresPermission`] extractor.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and sanitized response bodies.

pub mod alerts;
pub mod auth;
pub mod devices;
pub mod rbac;
pub mod regions;
pub mod resources;
pub mod sensors;
pub mod users;
