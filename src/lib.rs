// ABOUTME: Main library entry point for the TrainLog fitness tracking API
// ABOUTME: Provides REST endpoints for workouts, goals, and weekly schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

#![deny(unsafe_code)]

//! # TrainLog Server
//!
//! A personal fitness-tracking REST API: users log strength and cardio
//! workouts, set progress goals, and manage a weekly training schedule.
//!
//! ## Features
//!
//! - **Workout logging**: strength sessions with per-set volume tracking and
//!   cardio sessions with distance/duration
//! - **Goals**: numeric targets with an ascending or descending direction and
//!   a derived, always-recomputed progress percentage
//! - **Weekly schedules**: per-week training plans plus curated recommended
//!   plans
//! - **Statistics**: per-user aggregations for goals, strength, and cardio
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Models**: domain entities shared by persistence and the REST surface
//! - **Progress**: the pure goal-progress calculator used by every write path
//!   and the form preview endpoint
//! - **Database**: SQLite persistence with per-user filtering
//! - **Routes**: axum routers with thin handlers per domain
//! - **Auth**: JWT session tokens and bcrypt password handling
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trainlog_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("TrainLog server configured with port: HTTP={}", config.http_port);
//!
//!     Ok(())
//! }
//! ```

/// Authentication and session management
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Database persistence layer
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Domain models
pub mod models;

/// Goal progress computation
pub mod progress;

/// HTTP routes organized by domain
pub mod routes;

/// Server resources and HTTP server assembly
pub mod server;

/// Request payload validation
pub mod validation;
