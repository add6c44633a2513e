// ABOUTME: JWT-based user authentication and session management
// ABOUTME: Handles token generation, validation, and password hashing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! # Authentication and Session Management
//!
//! This module provides JWT-based (HS256) authentication for the TrainLog
//! server: token generation and validation plus bcrypt password helpers.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let expired_for = current_time.signed_duration_since(*expired_at);
                write!(
                    f,
                    "JWT token expired {} minutes ago at {}",
                    expired_for.num_minutes(),
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp (milliseconds, unique per token)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim as a user id
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).context("JWT subject is not a valid user id")
    }
}

/// Authentication result with user context
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
}

/// Authentication manager for `JWT` tokens and user sessions
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry_hours: i64,
    /// Monotonic counter to ensure unique timestamps for tokens
    token_counter: AtomicU64,
}

impl Clone for AuthManager {
    fn clone(&self) -> Self {
        Self {
            jwt_secret: self.jwt_secret.clone(),
            token_expiry_hours: self.token_expiry_hours,
            // Fresh counter for the cloned instance; each instance maintains
            // uniqueness independently
            token_counter: AtomicU64::new(0),
        }
    }
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub const fn new(jwt_secret: Vec<u8>, token_expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
            token_counter: AtomicU64::new(0),
        }
    }

    /// Token lifetime configured for this manager
    #[must_use]
    pub const fn token_expiry_hours(&self) -> i64 {
        self.token_expiry_hours
    }

    /// Generate a `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        // Atomic counter keeps issued-at values unique for tokens generated
        // within the same second
        let counter = self.token_counter.fetch_add(1, Ordering::Relaxed);
        let unique_iat =
            now.timestamp() * 1000 + i64::from(u32::try_from(counter % 1000).unwrap_or(0));

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: unique_iat,
            exp: expiry.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )?;

        Ok(token)
    }

    /// Validate a `JWT` token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] distinguishing expired, invalid, and
    /// malformed tokens.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        ) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(Self::convert_jwt_error(&e, token, &self.jwt_secret)),
        }
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(
        e: &jsonwebtoken::errors::Error,
        token: &str,
        secret: &[u8],
    ) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        tracing::debug!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                let expired_at = Self::decode_expiry(token, secret)
                    .unwrap_or_else(Utc::now);
                JwtValidationError::TokenExpired {
                    expired_at,
                    current_time: Utc::now(),
                }
            }
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            other => JwtValidationError::TokenInvalid {
                reason: format!("{other:?}"),
            },
        }
    }

    /// Recover the expiry of an expired token for error reporting
    fn decode_expiry(token: &str, secret: &[u8]) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation).ok()?;
        DateTime::from_timestamp(data.claims.exp, 0)
    }
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Password hashing failed")
}

/// Verify a password against its stored hash on the blocking pool
///
/// bcrypt verification is CPU-bound, so it must not run on the async
/// executor.
///
/// # Errors
///
/// Returns an error if the blocking task or bcrypt verification fails.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
        .await
        .context("Password verification task failed")?
        .context("Password verification error")
}

/// Generate a random hex-encoded JWT secret for development use
#[must_use]
pub fn generate_jwt_secret() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
