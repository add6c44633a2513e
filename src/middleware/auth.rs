// ABOUTME: Request authentication middleware for protected endpoints
// ABOUTME: Extracts and validates Bearer JWTs, resolving the authenticated user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::{AuthManager, AuthResult, JwtValidationError};
use crate::errors::{AppError, AppResult, ErrorCode};

/// Middleware for authenticating protected requests
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>) -> Self {
        Self { auth_manager }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The Authorization header is missing or not a Bearer scheme
    /// - The token is expired, malformed, or has an invalid signature
    /// - The token subject is not a valid user id
    pub fn authenticate_request_with_headers(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let auth_header = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer scheme"))?;

        let claims = self
            .auth_manager
            .validate_token(token)
            .map_err(|e| match e {
                JwtValidationError::TokenExpired { .. } => AppError::auth_expired(),
                JwtValidationError::TokenMalformed { details } => {
                    AppError::new(ErrorCode::AuthMalformed, details)
                }
                JwtValidationError::TokenInvalid { reason } => AppError::auth_invalid(reason),
            })?;

        let user_id = claims
            .user_id()
            .map_err(|e| AppError::auth_invalid(e.to_string()))?;

        tracing::debug!(%user_id, "request authenticated");

        Ok(AuthResult { user_id })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::User;

    fn middleware_and_token() -> (AuthMiddleware, String) {
        let auth_manager = Arc::new(AuthManager::new(b"mw-test-secret".to_vec(), 24));
        let user = User::new("mw@test.io".into(), "hash".into(), None);
        let token = auth_manager.generate_token(&user).unwrap();
        (AuthMiddleware::new(auth_manager), token)
    }

    #[test]
    fn accepts_valid_bearer_token() {
        let (middleware, token) = middleware_and_token();
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );

        assert!(middleware
            .authenticate_request_with_headers(&headers)
            .is_ok());
    }

    #[test]
    fn rejects_missing_header() {
        let (middleware, _) = middleware_and_token();
        let err = middleware
            .authenticate_request_with_headers(&HeaderMap::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthRequired);
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let (middleware, token) = middleware_and_token();
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            format!("Basic {token}").parse().unwrap(),
        );

        let err = middleware
            .authenticate_request_with_headers(&headers)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn rejects_garbage_token() {
        let (middleware, _) = middleware_and_token();
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            "Bearer garbage".parse().unwrap(),
        );

        let err = middleware
            .authenticate_request_with_headers(&headers)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthMalformed);
    }
}
