// ABOUTME: Route handlers for cardio workouts and cardio statistics
// ABOUTME: CRUD over the authenticated user's sessions with activity-grouped stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Cardio workout routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthResult;
use crate::database::{NewCardioWorkout, UpdateCardioWorkout};
use crate::errors::AppError;
use crate::routes::goals::DeletedResponse;
use crate::routes::strength::ListWorkoutsQuery;
use crate::server::ServerResources;
use crate::validation::validate_cardio_fields;

/// Request body for logging a cardio workout
#[derive(Debug, Deserialize)]
pub struct CreateCardioBody {
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Activity type (e.g. "running")
    #[serde(alias = "type")]
    pub activity: String,
    /// Distance covered
    pub distance: f64,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Pace as recorded by the user
    pub pace: Option<String>,
    /// Estimated calories burned
    pub calories: Option<u32>,
    /// Where the session took place
    pub location: Option<String>,
}

/// Request body for updating a workout; absent fields are left unchanged
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCardioBody {
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New activity type
    #[serde(alias = "type")]
    pub activity: Option<String>,
    /// New distance
    pub distance: Option<f64>,
    /// New duration
    pub duration_minutes: Option<u32>,
    /// New pace
    pub pace: Option<String>,
    /// New calories
    pub calories: Option<u32>,
    /// New location
    pub location: Option<String>,
}

/// Cardio routes handler
pub struct CardioRoutes;

impl CardioRoutes {
    /// Create all cardio workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/cardio", get(Self::handle_list))
            .route("/api/cardio", post(Self::handle_create))
            .route("/api/cardio/stats/summary", get(Self::handle_stats))
            .route("/api/cardio/:id", get(Self::handle_get))
            .route("/api/cardio/:id", put(Self::handle_update))
            .route("/api/cardio/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Extract and authenticate user from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources
            .auth_middleware
            .authenticate_request_with_headers(headers)
    }

    /// Handle GET /api/cardio - list workouts, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let page = resources
            .database
            .list_cardio_workouts(
                auth.user_id,
                query.page.unwrap_or(1),
                query
                    .limit
                    .unwrap_or(crate::constants::limits::DEFAULT_PAGE_SIZE),
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/cardio - log a workout
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateCardioBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        validate_cardio_fields(&body.activity, body.distance, body.duration_minutes)?;

        let workout = resources
            .database
            .create_cardio_workout(
                auth.user_id,
                NewCardioWorkout {
                    date: body.date,
                    activity: body.activity,
                    distance: body.distance,
                    duration_minutes: body.duration_minutes,
                    pace: body.pace,
                    calories: body.calories,
                    location: body.location,
                },
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Handle GET /api/cardio/stats/summary - aggregate statistics
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let stats = resources
            .database
            .cardio_stats(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    /// Handle GET /api/cardio/:id - one workout
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let workout = resources
            .database
            .get_cardio_workout(auth.user_id, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Cardio workout {id}")))?;

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle PUT /api/cardio/:id - partial update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateCardioBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        if let Some(distance) = body.distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(AppError::invalid_input(
                    "Distance must be a number greater than 0",
                ));
            }
        }
        if let Some(duration_minutes) = body.duration_minutes {
            if duration_minutes == 0 {
                return Err(AppError::invalid_input(
                    "Duration must be a number greater than 0",
                ));
            }
        }

        let workout = resources
            .database
            .update_cardio_workout(
                auth.user_id,
                id,
                UpdateCardioWorkout {
                    date: body.date,
                    activity: body.activity,
                    distance: body.distance,
                    duration_minutes: body.duration_minutes,
                    pace: body.pace,
                    calories: body.calories,
                    location: body.location,
                },
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Cardio workout {id}")))?;

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle DELETE /api/cardio/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let deleted = resources
            .database
            .delete_cardio_workout(auth.user_id, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !deleted {
            return Err(AppError::not_found(format!("Cardio workout {id}")));
        }

        Ok((
            StatusCode::OK,
            Json(DeletedResponse {
                message: "Cardio workout deleted".into(),
            }),
        )
            .into_response())
    }
}
