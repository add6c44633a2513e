// ABOUTME: Route handlers for strength workouts, statistics, and personal records
// ABOUTME: Total volume is derived in the database layer, never accepted from clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Strength workout routes
//!
//! CRUD over the authenticated user's strength workouts plus aggregate
//! statistics and personal records.

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
use crate::database::{NewStrengthWorkout, UpdateStrengthWorkout};
use crate::errors::AppError;
use crate::models::Exercise;
use crate::routes::goals::DeletedResponse;
use crate::server::ServerResources;
use crate::validation::validate_strength_fields;

/// Request body for logging a strength workout
#[derive(Debug, Deserialize)]
pub struct CreateStrengthBody {
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Session name
    pub name: String,
    /// Exercises performed
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Rate of perceived exertion, 1-10
    pub rpe: Option<u8>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Request body for updating a workout; absent fields are left unchanged
#[derive(Debug, Deserialize, Default)]
pub struct UpdateStrengthBody {
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New name
    pub name: Option<String>,
    /// New exercise list
    pub exercises: Option<Vec<Exercise>>,
    /// New duration
    pub duration_minutes: Option<u32>,
    /// New RPE
    pub rpe: Option<u8>,
    /// New notes
    pub notes: Option<String>,
}

/// Query parameters for listing workouts
#[derive(Debug, Deserialize, Default)]
pub struct ListWorkoutsQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Strength routes handler
pub struct StrengthRoutes;

impl StrengthRoutes {
    /// Create all strength workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/strength", get(Self::handle_list))
            .route("/api/strength", post(Self::handle_create))
            .route("/api/strength/stats/summary", get(Self::handle_stats))
            .route("/api/strength/records", get(Self::handle_records))
            .route("/api/strength/:id", get(Self::handle_get))
            .route("/api/strength/:id", put(Self::handle_update))
            .route("/api/strength/:id", delete(Self::handle_delete))
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

    /// Handle GET /api/strength - list workouts, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let page = resources
            .database
            .list_strength_workouts(
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

    /// Handle POST /api/strength - log a workout
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateStrengthBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        validate_strength_fields(&body.name, &body.exercises, body.duration_minutes, body.rpe)?;

        let workout = resources
            .database
            .create_strength_workout(
                auth.user_id,
                NewStrengthWorkout {
                    date: body.date,
                    name: body.name,
                    exercises: body.exercises,
                    duration_minutes: body.duration_minutes,
                    rpe: body.rpe,
                    notes: body.notes,
                },
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Handle GET /api/strength/stats/summary - aggregate statistics
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let stats = resources
            .database
            .strength_stats(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    /// Handle GET /api/strength/records - personal records per exercise
    async fn handle_records(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let records = resources
            .database
            .personal_records(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(records)).into_response())
    }

    /// Handle GET /api/strength/:id - one workout
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let workout = resources
            .database
            .get_strength_workout(auth.user_id, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Strength workout {id}")))?;

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle PUT /api/strength/:id - partial update, recomputing volume
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateStrengthBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        if let Some(exercises) = &body.exercises {
            validate_strength_fields(
                body.name.as_deref().unwrap_or("workout"),
                exercises,
                body.duration_minutes.unwrap_or(1),
                body.rpe,
            )?;
        }

        let workout = resources
            .database
            .update_strength_workout(
                auth.user_id,
                id,
                UpdateStrengthWorkout {
                    date: body.date,
                    name: body.name,
                    exercises: body.exercises,
                    duration_minutes: body.duration_minutes,
                    rpe: body.rpe,
                    notes: body.notes,
                },
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Strength workout {id}")))?;

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle DELETE /api/strength/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let deleted = resources
            .database
            .delete_strength_workout(auth.user_id, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !deleted {
            return Err(AppError::not_found(format!("Strength workout {id}")));
        }

        Ok((
            StatusCode::OK,
            Json(DeletedResponse {
                message: "Strength workout deleted".into(),
            }),
        )
            .into_response())
    }
}
