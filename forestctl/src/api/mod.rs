//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/auth/*`): Registration, login, available roles
//! - **Account** (`/api/user/*`): Current user profile and password changes
//! - **Regions** (`/api/regions/*`): Monitoring regions
//! - **Sensors** (`/api/sensors/*`): Sensors and readings
//! - **Devices** (`/api/devices/*`): Devices, status logs, maintenance
//! - **Alerts** (`/api/alert-rules/*`, `/api/alerts/*`): Alerting
//! - **Resources** (`/api/resources/*`): Forest resources and changes
//! - **RBAC** (`/api/roles/*`, `/api/permissions/*`, `/api/users/*`): Access
//!   control administration
//!
//! Routes are assembled in [`crate::build_router`].

pub mod handlers;
pub mod models;
