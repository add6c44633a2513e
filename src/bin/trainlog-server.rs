// ABOUTME: Server binary wiring configuration, logging, database, and HTTP serving
// ABOUTME: Production entry point for the TrainLog fitness tracking API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! # TrainLog Server Binary
//!
//! Starts the TrainLog fitness API with user authentication and SQLite
//! persistence.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use trainlog_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::ServerConfig,
    database::Database,
    logging,
    server::{HttpServer, ServerResources},
};

#[derive(Parser)]
#[command(name = "trainlog-server")]
#[command(about = "TrainLog Fitness API - personal fitness tracking REST API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Override port if specified
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting TrainLog Fitness API");
    info!("{}", config.summary());

    // Initialize database
    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!("Database initialized successfully");

    // Resolve the JWT signing secret; generate an ephemeral one outside
    // production so local servers start without setup
    let jwt_secret = config.auth.jwt_secret.clone().unwrap_or_else(|| {
        warn!("JWT_SECRET not set; generating an ephemeral secret (sessions reset on restart)");
        generate_jwt_secret()
    });

    // Initialize authentication manager
    let auth_manager = AuthManager::new(
        jwt_secret.into_bytes(),
        config.auth.jwt_expiry_hours,
    );
    info!("Authentication manager initialized");

    // Create server resources and serve
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));

    HttpServer::new(resources).run().await
}
