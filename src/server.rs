// ABOUTME: Centralized resource container and HTTP server assembly
// ABOUTME: Wires database, auth, and config into the axum router with ambient middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! # Server Resources and HTTP Server
//!
//! Centralized resource container for dependency injection. Expensive shared
//! resources (database pool, auth manager) are created once and shared via
//! `Arc` across all route handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::middleware::AuthMiddleware;
use crate::routes::{
    AuthRoutes, CardioRoutes, GoalRoutes, HealthRoutes, ProfileRoutes, ScheduleRoutes,
    StrengthRoutes,
};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Shared database manager
    pub database: Arc<Database>,
    /// Shared JWT auth manager
    pub auth_manager: Arc<AuthManager>,
    /// Request authentication middleware
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(auth_manager);
        let auth_middleware = Arc::new(AuthMiddleware::new(Arc::clone(&auth_manager)));

        Self {
            database,
            auth_manager,
            auth_middleware,
            config,
        }
    }
}

/// The TrainLog HTTP server
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a new server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Assemble the full application router
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = Self::cors_layer(&self.resources.config.cors_origin);

        Router::new()
            .merge(HealthRoutes::routes())
            .merge(AuthRoutes::routes(Arc::clone(&self.resources)))
            .merge(ProfileRoutes::routes(Arc::clone(&self.resources)))
            .merge(GoalRoutes::routes(Arc::clone(&self.resources)))
            .merge(StrengthRoutes::routes(Arc::clone(&self.resources)))
            .merge(CardioRoutes::routes(Arc::clone(&self.resources)))
            .merge(ScheduleRoutes::routes(Arc::clone(&self.resources)))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(cors)
    }

    /// Build the CORS layer from configuration
    fn cors_layer(origin: &str) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

        if origin == "*" {
            layer.allow_origin(Any)
        } else {
            origin.parse::<HeaderValue>().map_or_else(
                |_| {
                    tracing::warn!("invalid CORS_ORIGIN {origin:?}, falling back to any origin");
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                        .allow_origin(Any)
                },
                |value| layer.allow_origin(value),
            )
        }
    }

    /// Bind and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if binding the listener or serving fails.
    pub async fn run(self) -> Result<()> {
        let port = self.resources.config.http_port;
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("Failed to bind port {port}"))?;

        info!("HTTP server listening on port {port}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")
    }
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
