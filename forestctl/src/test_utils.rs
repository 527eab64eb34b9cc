//! Test utilities for integration testing (available with `test-utils` feature).

use crate::auth::password;
use crate::config::{AuthConfig, Config, PasswordConfig};
use crate::db::models::{
    devices::DeviceCreateDBRequest, regions::RegionCreateDBRequest, users::UserCreateDBRequest,
};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: AuthConfig {
            allow_registration: true,
            // Cheap hashing so tests don't spend their time in Argon2
            password: PasswordConfig {
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A user create request with a throwaway password, unique per username.
pub fn create_user_request(username: &str) -> UserCreateDBRequest {
    create_user_request_with_password(username, "correct horse battery staple")
}

/// A user create request whose stored hash matches `password`.
pub fn create_user_request_with_password(username: &str, password: &str) -> UserCreateDBRequest {
    let password_hash = password::hash_string_with_params(
        password,
        Some((&create_test_config().auth.password).into()),
    )
    .expect("Failed to hash test password");

    UserCreateDBRequest {
        username: username.to_string(),
        email: format!("{username}@forest.example"),
        real_name: format!("Test {username}"),
        phone: None,
        password_hash,
        role_id: 4, // seeded VIEWER role
    }
}

pub fn create_region_request(name: &str) -> RegionCreateDBRequest {
    RegionCreateDBRequest {
        name: name.to_string(),
        r#type: "FOREST".to_string(),
        latitude: Some(47.62),
        longitude: Some(-122.35),
        manager_id: None,
    }
}

pub fn create_device_request(name: &str) -> DeviceCreateDBRequest {
    DeviceCreateDBRequest {
        name: name.to_string(),
        r#type: "CAMERA".to_string(),
        model_spec: Some("FC-100".to_string()),
        purchased_at: None,
        install_region_id: None,
        installer_id: None,
        warranty_until: None,
    }
}
