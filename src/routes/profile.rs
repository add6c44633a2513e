// ABOUTME: Route handlers for the authenticated user's profile
// ABOUTME: Read and partial-update of display name, physical stats, and unit preferences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! User profile routes
//!
//! All endpoints require JWT authentication; users can only read and update
//! their own profile.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::database::UserProfileUpdate;
use crate::errors::AppError;
use crate::models::{DistanceUnit, User, WeightUnit};
use crate::server::ServerResources;

/// Response for a user's profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User id
    pub user_id: String,
    /// Account email
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// Age in years
    pub age: Option<u16>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimetres
    pub height_cm: Option<f64>,
    /// Preferred weight unit
    pub weight_unit: WeightUnit,
    /// Preferred distance unit
    pub distance_unit: DistanceUnit,
    /// Account creation timestamp, RFC 3339
    pub created_at: String,
    /// Last activity timestamp, RFC 3339
    pub last_active: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            age: user.age,
            weight_kg: user.weight_kg,
            height_cm: user.height_cm,
            weight_unit: user.weight_unit,
            distance_unit: user.distance_unit,
            created_at: user.created_at.to_rfc3339(),
            last_active: user.last_active.to_rfc3339(),
        }
    }
}

/// Request body for updating a profile; absent fields are left unchanged
#[derive(Debug, Deserialize, Default)]
pub struct UpdateProfileBody {
    /// New display name
    pub display_name: Option<String>,
    /// New age
    pub age: Option<u16>,
    /// New body weight in kilograms
    pub weight_kg: Option<f64>,
    /// New height in centimetres
    pub height_cm: Option<f64>,
    /// New preferred weight unit
    pub weight_unit: Option<WeightUnit>,
    /// New preferred distance unit
    pub distance_unit: Option<DistanceUnit>,
}

impl From<UpdateProfileBody> for UserProfileUpdate {
    fn from(body: UpdateProfileBody) -> Self {
        Self {
            display_name: body.display_name,
            age: body.age,
            weight_kg: body.weight_kg,
            height_cm: body.height_cm,
            weight_unit: body.weight_unit,
            distance_unit: body.distance_unit,
        }
    }
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", get(Self::handle_get))
            .route("/api/users", put(Self::handle_update))
            .with_state(resources)
    }

    /// Handle GET /api/users - the authenticated user's profile
    async fn handle_get(
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

        let response: ProfileResponse = user.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/users - partial profile update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpdateProfileBody>,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request_with_headers(&headers)?;

        if let Some(age) = body.age {
            if age == 0 || age > 130 {
                return Err(AppError::invalid_input("Age is out of range"));
            }
        }
        if let Some(weight_kg) = body.weight_kg {
            crate::validation::validate_non_negative("weight_kg", weight_kg)?;
        }
        if let Some(height_cm) = body.height_cm {
            crate::validation::validate_non_negative("height_cm", height_cm)?;
        }

        let update: UserProfileUpdate = body.into();
        let user = resources
            .database
            .update_user_profile(auth.user_id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("User {}", auth.user_id)))?;

        let response: ProfileResponse = user.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
