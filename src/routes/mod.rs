// ABOUTME: Route module organization for TrainLog HTTP endpoints
// ABOUTME: Centralized route definitions organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Route module for the TrainLog server
//!
//! This module organizes all HTTP routes by domain. Each domain module
//! contains route definitions and thin handler functions that delegate to
//! the database layer.

/// Authentication routes (signup, login, profile)
pub mod auth;
/// Cardio workout routes
pub mod cardio;
/// Goal and goal-progress routes
pub mod goals;
/// Health check and system status routes
pub mod health;
/// User profile routes
pub mod profile;
/// Weekly schedule and recommended plan routes
pub mod schedule;
/// Strength workout routes
pub mod strength;

/// Authentication route handlers
pub use auth::AuthRoutes;
/// Authentication service
pub use auth::AuthService;
/// Login request payload
pub use auth::LoginRequest;
/// Login response with token
pub use auth::LoginResponse;
/// User registration request
pub use auth::RegisterRequest;
/// Registration response with user details
pub use auth::RegisterResponse;
/// Cardio route handlers
pub use cardio::CardioRoutes;
/// Goal route handlers
pub use goals::GoalRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Profile route handlers
pub use profile::ProfileRoutes;
/// Schedule route handlers
pub use schedule::ScheduleRoutes;
/// Strength route handlers
pub use strength::StrengthRoutes;
