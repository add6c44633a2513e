// ABOUTME: Domain model organization for TrainLog entities
// ABOUTME: Users, goals, strength/cardio workouts, and weekly schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Domain models
//!
//! Data structures shared between the database layer and the REST surface.
//! Derived fields (`Goal::progress`, `StrengthWorkout::total_volume`) are
//! views over the other fields and are recomputed on every write, never set
//! directly.

/// Goal entity with direction, history, and derived progress
pub mod goal;
/// Weekly schedule entries and recommended training plans
pub mod schedule;
/// User account and physical profile
pub mod user;
/// Strength and cardio workout entities
pub mod workout;

pub use goal::{Goal, GoalMetric, GoalPriority, GoalStatus, ProgressEntry};
pub use schedule::{PlanLevel, PlannedExercise, RecommendedPlan, ScheduleEntry, SessionType, Weekday};
pub use user::{DistanceUnit, User, WeightUnit};
pub use workout::{CardioWorkout, Exercise, ExerciseSet, StrengthWorkout};
