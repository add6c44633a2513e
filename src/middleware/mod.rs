// ABOUTME: HTTP middleware module organization
// ABOUTME: Request authentication shared by all protected routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! HTTP middleware

/// Bearer-token request authentication
pub mod auth;

pub use auth::AuthMiddleware;
