// ABOUTME: Request payload validation invoked by handlers before touching the database
// ABOUTME: Mirrors the per-entity field rules enforced at the API boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Request validation
//!
//! Field-level rules applied to incoming payloads. Violations surface as
//! `AppError::invalid_input` (HTTP 400) with the offending field named in
//! the detail payload. Goal range sanity (target reachable from start in the
//! stated direction) is deliberately NOT enforced here: the progress
//! calculator resolves degenerate ranges itself.

use chrono::{DateTime, Utc};

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::Exercise;

/// Reject with a field-scoped validation error
fn field_error(field: &str, message: &str) -> AppError {
    AppError::invalid_input(message).with_details(serde_json::json!({ "field": field }))
}

/// Simple structural email validation
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() <= 5 {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false; // @ at start or end
    }
    let domain_part = &email[at_pos + 1..];
    domain_part.contains('.')
}

/// Password strength: minimum length plus at least one letter and one digit
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= limits::MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// A non-negative, finite numeric field
pub fn validate_non_negative(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(field_error(
            field,
            &format!("{field} must be a number greater than or equal to 0"),
        ));
    }
    Ok(())
}

/// Goal payload rules shared by create and update
///
/// # Errors
///
/// Returns an invalid-input error naming the offending field.
pub fn validate_goal_fields(
    name: &str,
    start_value: f64,
    target: f64,
    current: f64,
    deadline: DateTime<Utc>,
    description: &str,
) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(field_error("name", "Goal name is required"));
    }
    if name.len() > limits::MAX_GOAL_NAME_LENGTH {
        return Err(field_error(
            "name",
            "Goal name must be less than 100 characters",
        ));
    }
    validate_non_negative("start_value", start_value)?;
    validate_non_negative("target", target)?;
    validate_non_negative("current", current)?;
    if deadline <= Utc::now() {
        return Err(field_error("deadline", "Deadline must be in the future"));
    }
    if description.len() > limits::MAX_DESCRIPTION_LENGTH {
        return Err(field_error(
            "description",
            "Description must be less than 500 characters",
        ));
    }
    Ok(())
}

/// Progress history entry rules
///
/// # Errors
///
/// Returns an invalid-input error naming the offending field.
pub fn validate_progress_entry(value: f64, notes: &str) -> AppResult<()> {
    validate_non_negative("value", value)?;
    if notes.len() > limits::MAX_NOTES_LENGTH {
        return Err(field_error(
            "notes",
            "Notes must be less than 200 characters",
        ));
    }
    Ok(())
}

/// Weekly schedule rules: 1-7 entries, each with non-empty bounded details
///
/// # Errors
///
/// Returns an invalid-input error naming the offending field.
pub fn validate_schedule_entries(details: &[&str]) -> AppResult<()> {
    if details.is_empty() || details.len() > 7 {
        return Err(field_error(
            "schedules",
            "Schedules must be an array with 1-7 items",
        ));
    }
    for detail in details {
        if detail.trim().is_empty() {
            return Err(field_error("details", "Schedule details are required"));
        }
        if detail.len() > limits::MAX_SCHEDULE_DETAILS_LENGTH {
            return Err(field_error(
                "details",
                "Details must be less than 200 characters",
            ));
        }
    }
    Ok(())
}

/// Strength workout rules: non-empty name, positive duration, sane sets and RPE
///
/// # Errors
///
/// Returns an invalid-input error naming the offending field.
pub fn validate_strength_fields(
    name: &str,
    exercises: &[Exercise],
    duration_minutes: u32,
    rpe: Option<u8>,
) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(field_error("name", "Workout name is required"));
    }
    if duration_minutes == 0 {
        return Err(field_error("duration", "Duration must be at least 1 minute"));
    }
    for exercise in exercises {
        if exercise.name.trim().is_empty() {
            return Err(field_error("exercises", "Exercise name is required"));
        }
        for set in &exercise.sets {
            validate_non_negative("weight", set.weight)?;
            if set.reps == 0 {
                return Err(field_error("reps", "Reps must be at least 1"));
            }
        }
    }
    if let Some(rpe) = rpe {
        if !(limits::RPE_MIN..=limits::RPE_MAX).contains(&rpe) {
            return Err(field_error("rpe", "RPE must be between 1 and 10"));
        }
    }
    Ok(())
}

/// Cardio workout rules: non-empty activity, positive distance and duration
///
/// # Errors
///
/// Returns an invalid-input error naming the offending field.
pub fn validate_cardio_fields(
    activity: &str,
    distance: f64,
    duration_minutes: u32,
) -> AppResult<()> {
    if activity.trim().is_empty() {
        return Err(field_error("type", "Type is required"));
    }
    if !distance.is_finite() || distance <= 0.0 {
        return Err(field_error(
            "distance",
            "Distance must be a number greater than 0",
        ));
    }
    if duration_minutes == 0 {
        return Err(field_error(
            "duration",
            "Duration must be a number greater than 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user.example.com"));
    }

    #[test]
    fn password_requires_letter_and_digit() {
        assert!(is_valid_password("hunter42x"));
        assert!(!is_valid_password("short1"));
        assert!(!is_valid_password("allletters"));
        assert!(!is_valid_password("1234567890"));
    }

    #[test]
    fn goal_deadline_must_be_future() {
        let past = Utc::now() - chrono::Duration::days(1);
        let err = validate_goal_fields("Run 10k", 0.0, 10.0, 0.0, past, "").unwrap_err();
        assert!(err.message.contains("future"));
    }

    #[test]
    fn goal_rejects_negative_target() {
        let future = Utc::now() + chrono::Duration::days(30);
        assert!(validate_goal_fields("Run", 0.0, -1.0, 0.0, future, "").is_err());
    }

    #[test]
    fn degenerate_goal_ranges_are_allowed() {
        // Target below start on an ascending goal is the calculator's
        // problem, not a validation failure
        let future = Utc::now() + chrono::Duration::days(30);
        assert!(validate_goal_fields("Maintain", 100.0, 80.0, 100.0, future, "").is_ok());
    }

    #[test]
    fn schedule_bounds() {
        assert!(validate_schedule_entries(&[]).is_err());
        assert!(validate_schedule_entries(&["Push day"]).is_ok());
        assert!(validate_schedule_entries(&[""; 8]).is_err());
    }

    #[test]
    fn cardio_rejects_zero_distance() {
        assert!(validate_cardio_fields("running", 0.0, 30).is_err());
        assert!(validate_cardio_fields("running", 5.2, 30).is_ok());
    }
}
