// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Environment-based configuration management for production deployment

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{defaults, limits};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and above
    Warn,
    /// Informational and above
    #[default]
    Info,
    /// Debug and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configuration decisions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory SQLite, used by tests
    Memory,
}

impl DatabaseUrl {
    /// Parse a `DATABASE_URL` value
    ///
    /// # Errors
    ///
    /// Returns an error for non-sqlite URL schemes.
    pub fn parse_url(url: &str) -> Result<Self> {
        if url == "sqlite::memory:" {
            return Ok(Self::Memory);
        }
        match url.strip_prefix("sqlite:") {
            Some(path) => Ok(Self::SQLite {
                path: PathBuf::from(path),
            }),
            None => anyhow::bail!(
                "Unsupported database URL '{url}': only sqlite: URLs are supported"
            ),
        }
    }

    /// Render as a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Where the database lives
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign JWTs. Generated at startup when unset
    /// (development only; production requires an explicit secret).
    pub jwt_secret: Option<String>,
    /// JWT expiry in hours
    pub jwt_expiry_hours: i64,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database settings
    pub database: DatabaseConfig,
    /// Auth settings
    pub auth: AuthConfig,
    /// Allowed CORS origin, `*` in development
    pub cors_origin: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `HTTP_PORT` is set but not a valid port number
    /// - `DATABASE_URL` is set to an unsupported scheme
    /// - The environment is production and `JWT_SECRET` is unset
    pub fn from_env() -> Result<Self> {
        let http_port = env::var("HTTP_PORT").map_or(Ok(defaults::HTTP_PORT), |value| {
            value
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT: {value}"))
        })?;

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        let log_level =
            LogLevel::from_str_or_default(&env::var("RUST_LOG").unwrap_or_default());

        let database_url = env::var("DATABASE_URL").map_or_else(
            |_| DatabaseUrl::parse_url(defaults::DATABASE_URL),
            |value| DatabaseUrl::parse_url(&value),
        )?;

        let jwt_secret = env::var("JWT_SECRET").ok();
        if environment.is_production() && jwt_secret.is_none() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }

        let jwt_expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .map_or(Ok(limits::DEFAULT_SESSION_HOURS), |value| {
                value
                    .parse::<i64>()
                    .with_context(|| format!("Invalid JWT_EXPIRY_HOURS: {value}"))
            })?;

        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".into());

        Ok(Self {
            http_port,
            environment,
            log_level,
            database: DatabaseConfig { url: database_url },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours,
            },
            cors_origin,
        })
    }

    /// One-line summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "env={} port={} db={} log={} jwt_expiry={}h",
            self.environment,
            self.http_port,
            self.database.url.to_connection_string(),
            self.log_level,
            self.auth.jwt_expiry_hours
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn database_url_parses_sqlite_paths() {
        let url = DatabaseUrl::parse_url("sqlite:./data/app.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:./data/app.db");
    }

    #[test]
    fn database_url_parses_memory() {
        let url = DatabaseUrl::parse_url("sqlite::memory:").unwrap();
        assert_eq!(url, DatabaseUrl::Memory);
    }

    #[test]
    fn database_url_rejects_other_schemes() {
        assert!(DatabaseUrl::parse_url("postgres://localhost/app").is_err());
    }

    #[test]
    fn environment_parsing_accepts_short_names() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("unknown"),
            Environment::Development
        );
    }
}
