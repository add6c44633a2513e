// ABOUTME: Route handlers for goals, goal progress history, and goal statistics
// ABOUTME: Preview endpoint serves unsaved form state through the same shared calculator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Goal routes
//!
//! CRUD over the authenticated user's goals, progress-history appends, an
//! aggregate statistics summary, and a progress preview for unsaved form
//! state. The derived `progress` field is never accepted from a client:
//! every write path recomputes it in the database layer, and the preview
//! endpoint runs the identical calculation for values that have not been
//! persisted yet.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthResult;
use crate::database::{GoalFilter, NewGoal, UpdateGoal};
use crate::errors::AppError;
use crate::models::{GoalMetric, GoalPriority, GoalStatus, ProgressEntry};
use crate::progress::{compute_progress_rounded, GoalDirection, GoalProgressInput};
use crate::server::ServerResources;
use crate::validation::{validate_goal_fields, validate_progress_entry};

/// Request body for creating a goal
#[derive(Debug, Deserialize)]
pub struct CreateGoalBody {
    /// Display name
    pub name: String,
    /// What the goal measures
    #[serde(default)]
    pub metric: GoalMetric,
    /// Direction of progress
    #[serde(default)]
    pub direction: GoalDirection,
    /// Baseline value
    #[serde(default)]
    pub start_value: f64,
    /// Completion value
    pub target: f64,
    /// Current value
    #[serde(default)]
    pub current: f64,
    /// Completion deadline
    pub deadline: DateTime<Utc>,
    /// Priority
    #[serde(default)]
    pub priority: GoalPriority,
    /// Lifecycle status
    #[serde(default)]
    pub status: GoalStatus,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// Request body for updating a goal; absent fields are left unchanged
#[derive(Debug, Deserialize, Default)]
pub struct UpdateGoalBody {
    /// New name
    pub name: Option<String>,
    /// New metric
    pub metric: Option<GoalMetric>,
    /// New direction
    pub direction: Option<GoalDirection>,
    /// New baseline
    pub start_value: Option<f64>,
    /// New target
    pub target: Option<f64>,
    /// New current value
    pub current: Option<f64>,
    /// New deadline
    pub deadline: Option<DateTime<Utc>>,
    /// New priority
    pub priority: Option<GoalPriority>,
    /// New status
    pub status: Option<GoalStatus>,
    /// New description
    pub description: Option<String>,
}

impl From<UpdateGoalBody> for UpdateGoal {
    fn from(body: UpdateGoalBody) -> Self {
        Self {
            name: body.name,
            metric: body.metric,
            direction: body.direction,
            start_value: body.start_value,
            target: body.target,
            current: body.current,
            deadline: body.deadline,
            priority: body.priority,
            status: body.status,
            description: body.description,
        }
    }
}

/// Query parameters for listing goals
#[derive(Debug, Deserialize, Default)]
pub struct ListGoalsQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Sort key, optionally `-` prefixed for descending
    pub sort: Option<String>,
    /// Filter by status
    pub status: Option<GoalStatus>,
    /// Filter by priority
    pub priority: Option<GoalPriority>,
    /// Filter by metric
    pub metric: Option<GoalMetric>,
}

/// Request body for appending a progress measurement
#[derive(Debug, Deserialize)]
pub struct AddProgressBody {
    /// When the measurement was taken; defaults to now
    pub date: Option<DateTime<Utc>>,
    /// Measured value
    pub value: f64,
    /// Free-form note
    #[serde(default)]
    pub notes: String,
}

/// Response for the progress preview endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewProgressResponse {
    /// The percentage that would be persisted for these values
    pub progress: u8,
}

/// Response for deletions
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Confirmation message
    pub message: String,
}

/// Goal routes handler
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create all goal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/goals", get(Self::handle_list))
            .route("/api/goals", post(Self::handle_create))
            .route("/api/goals/stats/summary", get(Self::handle_stats))
            .route("/api/goals/preview", post(Self::handle_preview))
            .route("/api/goals/:id", get(Self::handle_get))
            .route("/api/goals/:id", put(Self::handle_update))
            .route("/api/goals/:id", delete(Self::handle_delete))
            .route("/api/goals/:id/progress", post(Self::handle_add_progress))
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

    /// Handle GET /api/goals - list goals with filters and pagination
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListGoalsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let filter = GoalFilter {
            status: query.status,
            priority: query.priority,
            metric: query.metric,
            page: query.page.unwrap_or(1),
            limit: query
                .limit
                .unwrap_or(crate::constants::limits::DEFAULT_PAGE_SIZE),
            sort: query.sort.unwrap_or_else(|| "-created_at".into()),
        };

        let page = resources
            .database
            .list_goals(auth.user_id, &filter)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/goals - create a goal
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateGoalBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        validate_goal_fields(
            &body.name,
            body.start_value,
            body.target,
            body.current,
            body.deadline,
            &body.description,
        )?;

        let goal = resources
            .database
            .create_goal(
                auth.user_id,
                NewGoal {
                    name: body.name,
                    metric: body.metric,
                    direction: body.direction,
                    start_value: body.start_value,
                    target: body.target,
                    current: body.current,
                    deadline: body.deadline,
                    priority: body.priority,
                    status: body.status,
                    description: body.description,
                },
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::CREATED, Json(goal)).into_response())
    }

    /// Handle POST /api/goals/preview - progress for unsaved form state
    ///
    /// Runs the same calculation the persistence layer uses, so the value a
    /// form shows before saving is exactly the value that will be stored.
    async fn handle_preview(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(input): Json<GoalProgressInput>,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources)?;

        let response = PreviewProgressResponse {
            progress: compute_progress_rounded(input),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/goals/stats/summary - aggregate goal statistics
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let stats = resources
            .database
            .goal_stats(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    /// Handle GET /api/goals/:id - one goal with history
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let goal = resources
            .database
            .get_goal(auth.user_id, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Goal {id}")))?;

        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Handle PUT /api/goals/:id - partial update, recomputing progress
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateGoalBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        if let Some(name) = &body.name {
            if name.trim().is_empty() || name.len() > crate::constants::limits::MAX_GOAL_NAME_LENGTH
            {
                return Err(AppError::invalid_input("Goal name is invalid"));
            }
        }
        for (field, value) in [
            ("start_value", body.start_value),
            ("target", body.target),
            ("current", body.current),
        ] {
            if let Some(value) = value {
                crate::validation::validate_non_negative(field, value)?;
            }
        }
        if let Some(deadline) = body.deadline {
            if deadline <= Utc::now() {
                return Err(AppError::invalid_input("Deadline must be in the future"));
            }
        }

        let goal = resources
            .database
            .update_goal(auth.user_id, id, body.into())
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Goal {id}")))?;

        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Handle DELETE /api/goals/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let deleted = resources
            .database
            .delete_goal(auth.user_id, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !deleted {
            return Err(AppError::not_found(format!("Goal {id}")));
        }

        Ok((
            StatusCode::OK,
            Json(DeletedResponse {
                message: "Goal deleted".into(),
            }),
        )
            .into_response())
    }

    /// Handle POST /api/goals/:id/progress - append a measurement
    async fn handle_add_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<AddProgressBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        validate_progress_entry(body.value, &body.notes)?;

        let entry = ProgressEntry {
            date: body.date.unwrap_or_else(Utc::now),
            value: body.value,
            notes: body.notes,
        };

        let goal = resources
            .database
            .add_goal_progress(auth.user_id, id, entry)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Goal {id}")))?;

        Ok((StatusCode::OK, Json(goal)).into_response())
    }
}
