// ABOUTME: User authentication route handlers for registration and login
// ABOUTME: Thin handlers delegating to AuthService for account business logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Authentication routes for user account management
//!
//! This module handles user registration, login, and the authenticated
//! profile lookup. Handlers are thin wrappers that delegate business logic
//! to [`AuthService`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::constants::error_messages;
use crate::errors::AppError;
use crate::models::User;
use crate::server::ServerResources;
use crate::validation::{is_valid_email, is_valid_password};

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Email address, unique per account
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Optional display name
    pub display_name: Option<String>,
}

/// User registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Created user id
    pub user_id: String,
    /// Human-readable confirmation
    pub message: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// User info for login response
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub user_id: String,
    /// Account email
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub jwt_token: String,
    /// Token expiry, RFC 3339
    pub expires_at: String,
    /// The authenticated user
    pub user: UserInfo,
}

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    resources: Arc<ServerResources>,
}

impl AuthService {
    /// Create a new auth service over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle user registration
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the email is taken, or the
    /// database operation fails.
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
        tracing::info!("User registration attempt for email: {}", request.email);

        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }

        if !is_valid_password(&request.password) {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        if let Ok(Some(_)) = self
            .resources
            .database
            .get_user_by_email(&request.email)
            .await
        {
            return Err(AppError::already_exists(error_messages::USER_ALREADY_EXISTS));
        }

        let password_hash = crate::auth::hash_password(&request.password)
            .map_err(|e| AppError::internal(e.to_string()))?;

        let user = User::new(request.email.clone(), password_hash, request.display_name);

        let user_id = self
            .resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(
            "User registered successfully: {} ({})",
            request.email,
            user_id
        );

        Ok(RegisterResponse {
            user_id: user_id.to_string(),
            message: "User registered successfully".into(),
        })
    }

    /// Handle user login
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or token generation fails.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        tracing::info!("User login attempt for email: {}", request.email);

        let user = self
            .resources
            .database
            .get_user_by_email_required(&request.email)
            .await
            .map_err(|_| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        let is_valid =
            crate::auth::verify_password(request.password, user.password_hash.clone())
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        if !user.is_active {
            tracing::warn!("Login blocked for deactivated user: {}", request.email);
            return Err(AppError::auth_invalid("Account is deactivated"));
        }

        self.resources
            .database
            .update_last_active(user.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let jwt_token = self
            .resources
            .auth_manager
            .generate_token(&user)
            .map_err(|e| AppError::internal(e.to_string()))?;
        let expires_at = chrono::Utc::now()
            + chrono::Duration::hours(self.resources.auth_manager.token_expiry_hours());

        tracing::info!(
            "User logged in successfully: {} ({})",
            request.email,
            user.id
        );

        Ok(LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/signup", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/profile", get(Self::handle_profile))
            .with_state(resources)
    }

    /// Handle POST /api/auth/signup
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::new(resources).register(body).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::new(resources).login(body).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/auth/profile - identity of the presented token
    async fn handle_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)?;

        let user = resources
            .database
            .get_user(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("User {}", auth.user_id)))?;

        let info = UserInfo {
            user_id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
        };
        Ok((StatusCode::OK, Json(info)).into_response())
    }
}
