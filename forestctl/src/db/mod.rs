//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - business logic & queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`cascade`]: Ordered deletion plans for aggregate roots
//! - [`errors`]: Database-specific error types
//!
//! # Foreign Keys and Deletion
//!
//! Foreign keys are declared without ON DELETE actions. Removing an
//! aggregate root (a region, device, sensor, alert rule, alert or resource)
//! goes through a [`cascade::CascadePlan`] that deletes dependents
//! leaves-first inside one transaction, so a failed step leaves everything
//! in place.
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/`
//! directory. The [`crate::migrator`] function provides access to the
//! migrator:
//!
//! ```ignore
//! forestctl::migrator().run(&pool).await?;
//! ```

pub mod cascade;
pub mod errors;
pub mod handlers;
pub mod models;
