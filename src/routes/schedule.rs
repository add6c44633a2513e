// ABOUTME: Route handlers for weekly training schedules and recommended plans
// ABOUTME: Replacing a week's schedule is atomic; plans are curated and read-mostly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Weekly schedule routes
//!
//! A user's schedule for one week is replaced as a unit: the posted entries
//! become the week's schedule and any previous entries for that week are
//! dropped in the same transaction.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthResult;
use crate::database::{NewRecommendedPlan, NewScheduleEntry};
use crate::errors::AppError;
use crate::models::{PlanLevel, PlannedExercise, SessionType, Weekday};
use crate::server::ServerResources;
use crate::validation::validate_schedule_entries;

/// Query parameters for fetching a week's schedule
#[derive(Debug, Deserialize, Default)]
pub struct WeekQuery {
    /// Monday of the requested week; defaults to the current week
    pub week_start: Option<NaiveDate>,
}

/// One day within a posted weekly schedule
#[derive(Debug, Deserialize)]
pub struct ScheduleEntryBody {
    /// Day of week
    pub day: Weekday,
    /// Session type
    #[serde(alias = "type")]
    pub session_type: SessionType,
    /// Human-readable plan for the day
    pub details: String,
    /// Exercises planned for the day
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
}

/// Request body for replacing a week's schedule
#[derive(Debug, Deserialize)]
pub struct UpdateWeekBody {
    /// Monday of the week being replaced
    pub week_start: NaiveDate,
    /// The week's entries
    pub schedules: Vec<ScheduleEntryBody>,
}

/// Query parameters for listing recommended plans
#[derive(Debug, Deserialize, Default)]
pub struct RecommendedQuery {
    /// Filter by level
    pub level: Option<PlanLevel>,
    /// Maximum plans to return
    pub limit: Option<u32>,
}

/// Request body for adding a recommended plan
#[derive(Debug, Deserialize)]
pub struct CreatePlanBody {
    /// Plan title
    pub title: String,
    /// What the plan covers
    pub description: String,
    /// Embedded video URL
    pub video_url: String,
    /// Link to the full plan
    pub full_url: String,
    /// Difficulty/category level
    #[serde(default)]
    pub level: PlanLevel,
    /// Expected session duration, free-form
    #[serde(default = "default_plan_duration")]
    pub duration: String,
    /// Required equipment
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_plan_duration() -> String {
    "30-45 minutes".into()
}

/// Schedule routes handler
pub struct ScheduleRoutes;

impl ScheduleRoutes {
    /// Create all schedule routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/schedule/weekly", get(Self::handle_get_week))
            .route("/api/schedule/weekly", post(Self::handle_replace_week))
            .route("/api/schedule/recommended", get(Self::handle_list_plans))
            .route("/api/schedule/recommended", post(Self::handle_create_plan))
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

    /// Handle GET /api/schedule/weekly - one week's schedule, Monday first
    async fn handle_get_week(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WeekQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let entries = resources
            .database
            .get_weekly_schedule(auth.user_id, query.week_start)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(entries)).into_response())
    }

    /// Handle POST /api/schedule/weekly - replace one week's schedule
    async fn handle_replace_week(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpdateWeekBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let details: Vec<&str> = body
            .schedules
            .iter()
            .map(|entry| entry.details.as_str())
            .collect();
        validate_schedule_entries(&details)?;

        let entries = body
            .schedules
            .into_iter()
            .map(|entry| NewScheduleEntry {
                day: entry.day,
                session_type: entry.session_type,
                details: entry.details,
                exercises: entry.exercises,
            })
            .collect();

        let saved = resources
            .database
            .replace_weekly_schedule(auth.user_id, body.week_start, entries)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(saved)).into_response())
    }

    /// Handle GET /api/schedule/recommended - curated plans
    async fn handle_list_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecommendedQuery>,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources)?;

        let plans = resources
            .database
            .list_recommended_plans(
                query.level,
                query
                    .limit
                    .unwrap_or(crate::constants::limits::DEFAULT_PAGE_SIZE),
            )
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(plans)).into_response())
    }

    /// Handle POST /api/schedule/recommended - add a curated plan
    async fn handle_create_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreatePlanBody>,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources)?;

        if body.title.trim().is_empty() {
            return Err(AppError::invalid_input("Plan title is required"));
        }
        for (field, value) in [("video_url", &body.video_url), ("full_url", &body.full_url)] {
            if url::Url::parse(value).is_err() {
                return Err(AppError::invalid_input(format!("{field} must be a valid URL")));
            }
        }

        let plan = resources
            .database
            .create_recommended_plan(NewRecommendedPlan {
                title: body.title,
                description: body.description,
                video_url: body.video_url,
                full_url: body.full_url,
                level: body.level,
                duration: body.duration,
                equipment: body.equipment,
                tags: body.tags,
            })
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::CREATED, Json(plan)).into_response())
    }
}
