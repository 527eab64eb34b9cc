//! # forestctl: Smart Forest Monitoring Backend
//!
//! `forestctl` is the backend for a smart forest monitoring system. It manages
//! monitoring regions, the sensors and field devices installed in them, the
//! alerts they raise, and the forest resources they track, behind a REST API
//! with role-based access control.
//!
//! ## Overview
//!
//! Forestry operations run heterogeneous field hardware (temperature and
//! humidity sensors, cameras, alerters) spread across managed regions. This
//! crate provides the single control plane for that estate: device and sensor
//! registration, reading ingestion, alert rule configuration and alert
//! handling workflows, resource inventories with change history, and the user
//! and permission administration that decides who may do what.
//!
//! ### Authentication and Authorization
//!
//! Clients authenticate with username/password and receive a signed bearer
//! token (an HS256 JWT). Every other endpoint requires that token, and most
//! also require a permission: users hold roles, roles hold permissions, and a
//! permission names a resource and an action (`regions`/`manage`,
//! `sensors`/`view`, ...). Permission checks read the database on every
//! request, so revoking a role takes effect immediately. Repeated failed
//! logins lock the account for a configurable window.
//!
//! ### Deletion Semantics
//!
//! Aggregates delete as a unit: removing a region takes its sensors,
//! readings, alerts, notifications, resources, change records and installed
//! devices with it, in one transaction. The per-aggregate deletion order
//! lives in [`db::cascade`] as data, executed by a single generic routine.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL (via SQLx) for all persistence. Request
//! handlers live in [`api::handlers`], database repositories in
//! [`db::handlers`], and the auth stack in [`auth`].
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::{
    auth::password,
    db::handlers::{Repository, Users},
    db::models::users::UserCreateDBRequest,
};
use axum::{
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
    Router,
};
pub use config::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};

pub use types::{
    AlertId, AlertRuleId, DeviceId, PermissionId, RegionId, ResourceId, RoleId, SensorId, UserId,
};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the forestctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: if a user with the configured admin username already exists,
/// nothing is changed and its id is returned. The admin gets the seeded
/// SYSTEM_ADMIN role. Returns `None` when no admin password is configured.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(config: &Config, db: &PgPool) -> anyhow::Result<Option<UserId>> {
    let Some(admin_password) = config.admin_password.as_deref() else {
        info!("No admin password configured, skipping initial admin user");
        return Ok(None);
    };

    let mut conn = db.acquire().await?;
    let mut users = Users::new(&mut conn);

    if let Some(existing) = users.get_by_username(&config.admin_username).await? {
        debug!(user_id = existing.id, "Admin user already exists");
        return Ok(Some(existing.id));
    }

    let role_id: RoleId = sqlx::query_scalar("SELECT id FROM roles WHERE role_name = 'SYSTEM_ADMIN'")
        .fetch_one(db)
        .await?;

    let password_hash = password::hash_string(admin_password)?;
    let created = users
        .create(&UserCreateDBRequest {
            username: config.admin_username.clone(),
            email: config.admin_email.clone(),
            real_name: "System Administrator".to_string(),
            phone: None,
            password_hash,
            role_id,
        })
        .await?;

    info!(user_id = created.id, "Created initial admin user");
    Ok(Some(created.id))
}

/// Connect the pool, run migrations and seed the initial admin
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool_settings = &config.database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(pool_settings.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(pool_settings.max_lifetime_secs))
        .connect(&config.database.url)
        .await?;

    migrator().run(&pool).await?;

    create_initial_admin_user(config, &pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create initial admin user: {e}"))?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.cors;

    let mut cors = if cors_config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(tower_http::cors::Any)
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(cors_config.allow_credentials)
    };

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// Authentication and permission checks happen in extractors
/// ([`auth::current_user::CurrentUser`] and
/// [`auth::permissions::RequiresPermission`]), so the route table stays a
/// plain listing of paths to handlers.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{alerts, auth, devices, rbac, regions, resources, sensors, users};

    // No token required
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/roles", get(auth::get_available_roles));

    let api_routes = Router::new()
        // Current user
        .route("/user/me", get(users::me))
        .route("/user/password", put(users::update_password))
        // Regions; reads are open to any authenticated user
        .route("/regions", get(regions::list_regions))
        .route("/regions/{id}", get(regions::get_region))
        .route("/regions", post(regions::create_region))
        .route("/regions/{id}", put(regions::update_region))
        .route("/regions/{id}", delete(regions::delete_region))
        // Sensors and readings
        .route("/sensors", get(sensors::list_sensors))
        .route("/sensors", post(sensors::create_sensor))
        .route("/sensors/{id}", get(sensors::get_sensor))
        .route("/sensors/{id}", put(sensors::update_sensor))
        .route("/sensors/{id}", delete(sensors::delete_sensor))
        .route("/sensors/{id}/status", patch(sensors::update_sensor_status))
        .route("/sensors/{id}/readings", get(sensors::list_readings))
        .route("/sensors/{id}/readings", post(sensors::add_reading))
        .route("/sensors/readings/batch", post(sensors::add_readings_batch))
        // Devices, status logs and maintenance
        .route("/devices", get(devices::list_devices))
        .route("/devices", post(devices::create_device))
        .route("/devices/{id}", get(devices::get_device))
        .route("/devices/{id}", put(devices::update_device))
        .route("/devices/{id}", delete(devices::delete_device))
        .route("/devices/{id}/status", get(devices::get_latest_status))
        .route("/devices/{id}/status", post(devices::add_status_log))
        .route("/devices/{id}/status/logs", get(devices::list_status_logs))
        .route("/devices/{id}/maintenance", get(devices::list_maintenance))
        .route("/devices/{id}/maintenance", post(devices::add_maintenance))
        .route("/maintenance/{id}", delete(devices::delete_maintenance))
        // Alert rules, alerts and notifications
        .route("/alert-rules", get(alerts::list_alert_rules))
        .route("/alert-rules", post(alerts::create_alert_rule))
        .route("/alert-rules/{id}", get(alerts::get_alert_rule))
        .route("/alert-rules/{id}", put(alerts::update_alert_rule))
        .route("/alert-rules/{id}", delete(alerts::delete_alert_rule))
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts", post(alerts::create_alert))
        .route("/alerts/{id}", get(alerts::get_alert))
        .route("/alerts/{id}", put(alerts::update_alert))
        .route("/alerts/{id}", delete(alerts::delete_alert))
        .route("/alerts/{id}/notifications", get(alerts::list_notifications))
        .route("/notifications", post(alerts::create_notification))
        // Forest resources and change history
        .route("/resources", get(resources::list_resources))
        .route("/resources", post(resources::create_resource))
        .route("/resources/{id}", get(resources::get_resource))
        .route("/resources/{id}", put(resources::update_resource))
        .route("/resources/{id}", delete(resources::delete_resource))
        .route("/resources/{id}/growth-stage", patch(resources::update_growth_stage))
        .route("/resources/{id}/changes", get(resources::list_changes))
        .route("/resource-changes", post(resources::create_change))
        // Role administration
        .route("/roles", post(rbac::create_role))
        .route("/roles/{id}", get(rbac::get_role))
        .route("/roles/{id}", put(rbac::update_role))
        .route("/roles/{id}", delete(rbac::delete_role))
        .route("/roles/{id}/permissions", get(rbac::get_role_permissions))
        .route("/roles/{id}/permissions", post(rbac::grant_permission_to_role))
        .route(
            "/roles/{id}/permissions/{permission_id}",
            delete(rbac::revoke_permission_from_role),
        )
        // Permission administration
        .route("/permissions", post(rbac::create_permission))
        .route("/permissions/{id}", get(rbac::get_permission))
        .route("/permissions/{id}", put(rbac::update_permission))
        .route("/permissions/{id}", delete(rbac::delete_permission))
        // Per-user access control views
        .route("/users/{user_id}/roles", get(rbac::get_user_roles))
        .route("/users/{user_id}/roles", post(rbac::assign_role_to_user))
        .route(
            "/users/{user_id}/roles/{role_id}",
            delete(rbac::remove_role_from_user),
        )
        .route("/users/{user_id}/permissions", get(rbac::get_user_permissions))
        .route("/users/{user_id}/check-permission", get(rbac::check_user_permission));

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(public_routes)
        .nest("/api", api_routes)
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled application: router, configuration and database pool.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting forestctl with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
        };
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service())
            .expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "forestctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn test_server(pool: PgPool) -> axum_test::TestServer {
        let state = AppState {
            db: pool,
            config: create_test_config(),
        };
        let router = build_router(state).unwrap();
        axum_test::TestServer::new(router.into_make_service()).expect("Failed to create test server")
    }

    async fn register(server: &axum_test::TestServer, username: &str, password: &str, role_id: i64) {
        let response = server
            .post("/auth/register")
            .json(&json!({
                "username": username,
                "password": password,
                "email": format!("{username}@forest.example"),
                "real_name": "Robin Asher",
                "role_id": role_id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    async fn login(server: &axum_test::TestServer, username: &str, password: &str) -> String {
        let response = server
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["token"].as_str().unwrap().to_string()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz_is_public(pool: PgPool) {
        let server = test_server(pool);
        server.get("/healthz").await.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_available_roles_listed_without_token(pool: PgPool) {
        let server = test_server(pool);
        let response = server.get("/auth/roles").await;
        response.assert_status_ok();

        let roles = response.json::<Vec<Value>>();
        assert!(roles.len() >= 4);
        let names: Vec<&str> = roles.iter().map(|r| r["role_name"].as_str().unwrap()).collect();
        assert!(names.contains(&"SYSTEM_ADMIN"));
        assert!(names.contains(&"VIEWER"));
        // Ordered by id
        let ids: Vec<i64> = roles.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_login_and_fetch_profile(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "ranger1", "hunter22", 4).await;
        let token = login(&server, "ranger1", "hunter22").await;

        let response = server
            .get("/api/user/me")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        let profile = response.json::<Value>();
        assert_eq!(profile["username"], "ranger1");
        // The password hash never leaves the database layer
        assert!(profile.get("password_hash").is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_requests_without_token_rejected(pool: PgPool) {
        let server = test_server(pool);
        server.get("/api/user/me").await.assert_status_unauthorized();
        server.get("/api/regions").await.assert_status_unauthorized();
        server.get("/api/sensors").await.assert_status_unauthorized();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_viewer_can_view_but_not_manage(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "ranger1", "hunter22", 4).await; // VIEWER
        let token = login(&server, "ranger1", "hunter22").await;

        server
            .get("/api/sensors")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let response = server
            .post("/api/regions")
            .authorization_bearer(&token)
            .json(&json!({ "name": "North Ridge", "type": "FOREST" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_admin_manages_regions_end_to_end(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "admin1", "hunter22", 1).await; // SYSTEM_ADMIN
        let token = login(&server, "admin1", "hunter22").await;

        let created = server
            .post("/api/regions")
            .authorization_bearer(&token)
            .json(&json!({ "name": "North Ridge", "type": "FOREST" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let region_id = created.json::<Value>()["id"].as_i64().unwrap();

        server
            .get(&format!("/api/regions/{region_id}"))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .delete(&format!("/api/regions/{region_id}"))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/regions/{region_id}"))
            .authorization_bearer(&token)
            .await
            .assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_status_and_growth_stage_patches(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "admin1", "hunter22", 1).await;
        let token = login(&server, "admin1", "hunter22").await;

        let region_id = server
            .post("/api/regions")
            .authorization_bearer(&token)
            .json(&json!({ "name": "North Ridge", "type": "FOREST" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();
        let sensor_id = server
            .post("/api/sensors")
            .authorization_bearer(&token)
            .json(&json!({
                "region_id": region_id,
                "model": "TH-200",
                "monitor_type": "TEMPERATURE",
                "protocol": "LORA",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let patched = server
            .patch(&format!("/api/sensors/{sensor_id}/status"))
            .authorization_bearer(&token)
            .json(&json!({ "status": "FAULT" }))
            .await;
        patched.assert_status_ok();
        let sensor = patched.json::<Value>();
        assert_eq!(sensor["status"], "FAULT");
        // Nothing else changed
        assert_eq!(sensor["model"], "TH-200");

        let resource_id = server
            .post("/api/resources")
            .authorization_bearer(&token)
            .json(&json!({
                "resource_type": "TREE",
                "region_id": region_id,
                "species_name": "Douglas fir",
                "growth_stage": "SEEDLING",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let reclassified = server
            .patch(&format!("/api/resources/{resource_id}/growth-stage"))
            .authorization_bearer(&token)
            .json(&json!({ "growth_stage": "SAPLING" }))
            .await;
        reclassified.assert_status_ok();
        assert_eq!(reclassified.json::<Value>()["growth_stage"], "SAPLING");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_batch_reading_ingest(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "admin1", "hunter22", 1).await;
        let token = login(&server, "admin1", "hunter22").await;

        let region_id = server
            .post("/api/regions")
            .authorization_bearer(&token)
            .json(&json!({ "name": "North Ridge", "type": "FOREST" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();
        let sensor_id = server
            .post("/api/sensors")
            .authorization_bearer(&token)
            .json(&json!({
                "region_id": region_id,
                "model": "TH-200",
                "monitor_type": "TEMPERATURE",
                "protocol": "LORA",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let batch = server
            .post("/api/sensors/readings/batch")
            .authorization_bearer(&token)
            .json(&json!([
                { "sensor_id": sensor_id, "reading_type": "TEMPERATURE", "numeric_value": 20.5, "value_unit": "C" },
                { "sensor_id": sensor_id, "reading_type": "TEMPERATURE", "numeric_value": 21.0, "value_unit": "C" },
            ]))
            .await;
        batch.assert_status(StatusCode::CREATED);
        assert_eq!(batch.json::<Vec<Value>>().len(), 2);

        let listed = server
            .get(&format!("/api/sensors/{sensor_id}/readings"))
            .authorization_bearer(&token)
            .await;
        listed.assert_status_ok();
        assert_eq!(listed.json::<Vec<Value>>().len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_permission_check_fails_closed_when_store_is_down(pool: PgPool) {
        let server = test_server(pool.clone());
        register(&server, "admin1", "hunter22", 1).await;
        let token = login(&server, "admin1", "hunter22").await;

        server
            .get("/api/sensors")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        // With the store gone the check must refuse, never allow
        pool.close().await;
        let response = server
            .get("/api/sensors")
            .authorization_bearer(&token)
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_lockout_after_repeated_failures_then_unlock(pool: PgPool) {
        let server = test_server(pool.clone());
        register(&server, "ranger1", "hunter22", 4).await;

        // Five wrong passwords, indistinguishable from an unknown user
        for _ in 0..5 {
            let response = server
                .post("/auth/login")
                .json(&json!({ "username": "ranger1", "password": "wrong" }))
                .await;
            response.assert_status_unauthorized();
            assert_eq!(response.text(), "Invalid username or password");
        }

        // Locked now, even with the right password
        let locked = server
            .post("/auth/login")
            .json(&json!({ "username": "ranger1", "password": "hunter22" }))
            .await;
        locked.assert_status_unauthorized();
        assert!(locked.text().starts_with("Account is locked"));

        // Expire the lock and log in
        sqlx::query("UPDATE users SET locked_until = NOW() - INTERVAL '1 minute' WHERE username = 'ranger1'")
            .execute(&pool)
            .await
            .unwrap();
        login(&server, "ranger1", "hunter22").await;
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_revoking_a_role_applies_to_existing_tokens(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "admin1", "hunter22", 1).await;
        register(&server, "ranger1", "hunter22", 4).await;
        let admin_token = login(&server, "admin1", "hunter22").await;
        let ranger_token = login(&server, "ranger1", "hunter22").await;

        server
            .get("/api/sensors")
            .authorization_bearer(&ranger_token)
            .await
            .assert_status_ok();

        let ranger_id = server
            .get("/api/user/me")
            .authorization_bearer(&ranger_token)
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        // Admin strips the VIEWER role; the ranger's token still verifies
        // but no longer grants access
        server
            .delete(&format!("/api/users/{ranger_id}/roles/4"))
            .authorization_bearer(&admin_token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get("/api/sensors")
            .authorization_bearer(&ranger_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_permission_probe_endpoint(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "admin1", "hunter22", 1).await;
        let token = login(&server, "admin1", "hunter22").await;

        let my_id = server
            .get("/api/user/me")
            .authorization_bearer(&token)
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let granted = server
            .get(&format!("/api/users/{my_id}/check-permission"))
            .add_query_param("resource", "regions")
            .add_query_param("action", "manage")
            .authorization_bearer(&token)
            .await;
        granted.assert_status_ok();
        assert_eq!(granted.json::<Value>()["has_permission"], true);

        let denied = server
            .get(&format!("/api/users/{my_id}/check-permission"))
            .add_query_param("resource", "regions")
            .add_query_param("action", "fly")
            .authorization_bearer(&token)
            .await;
        denied.assert_status_ok();
        assert_eq!(denied.json::<Value>()["has_permission"], false);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_password_change_requires_old_password(pool: PgPool) {
        let server = test_server(pool);
        register(&server, "ranger1", "hunter22", 4).await;
        let token = login(&server, "ranger1", "hunter22").await;

        let rejected = server
            .put("/api/user/password")
            .authorization_bearer(&token)
            .json(&json!({ "old_password": "wrong", "new_password": "newpass99" }))
            .await;
        rejected.assert_status_unauthorized();

        server
            .put("/api/user/password")
            .authorization_bearer(&token)
            .json(&json!({ "old_password": "hunter22", "new_password": "newpass99" }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        login(&server, "ranger1", "newpass99").await;
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_initial_admin_seed_is_idempotent(pool: PgPool) {
        let mut config = create_test_config();
        config.admin_password = Some("rootpass1".to_string());

        let first = create_initial_admin_user(&config, &pool).await.unwrap();
        let second = create_initial_admin_user(&config, &pool).await.unwrap();
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
