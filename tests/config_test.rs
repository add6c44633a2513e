// ABOUTME: Configuration tests exercising environment-variable loading
// ABOUTME: Serialized because they mutate process-wide environment state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]

use std::env;

use serial_test::serial;

use trainlog_server::config::environment::{DatabaseUrl, Environment, ServerConfig};

fn clear_config_env() {
    for key in [
        "HTTP_PORT",
        "ENVIRONMENT",
        "DATABASE_URL",
        "JWT_SECRET",
        "JWT_EXPIRY_HOURS",
        "CORS_ORIGIN",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_apply_when_env_is_empty() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.environment, Environment::Development);
    assert!(config.auth.jwt_secret.is_none());
    assert_eq!(config.auth.jwt_expiry_hours, 24);
    assert_eq!(config.cors_origin, "*");
}

#[test]
#[serial]
fn env_values_override_defaults() {
    clear_config_env();
    env::set_var("HTTP_PORT", "9099");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("JWT_EXPIRY_HOURS", "72");
    env::set_var("CORS_ORIGIN", "https://app.example.com");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9099);
    assert_eq!(config.database.url, DatabaseUrl::Memory);
    assert_eq!(config.auth.jwt_expiry_hours, 72);
    assert_eq!(config.cors_origin, "https://app.example.com");

    clear_config_env();
}

#[test]
#[serial]
fn production_requires_a_jwt_secret() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");

    assert!(ServerConfig::from_env().is_err());

    env::set_var("JWT_SECRET", "a-real-secret");
    let config = ServerConfig::from_env().unwrap();
    assert!(config.environment.is_production());

    clear_config_env();
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");

    assert!(ServerConfig::from_env().is_err());

    clear_config_env();
}
