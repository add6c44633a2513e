// ABOUTME: Configuration module organization
// ABOUTME: Environment-variable driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Configuration management

/// Environment-based server configuration
pub mod environment;

pub use environment::{AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig};
