// ABOUTME: Goal entity with metric, priority, status, history, and derived progress
// ABOUTME: Progress is a pure function of the goal's numeric fields, recomputed on every write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progress::{compute_progress_rounded, GoalDirection, GoalProgressInput};

/// What the goal measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    /// Strength numbers (e.g. one-rep max)
    Strength,
    /// Cardio performance
    Cardio,
    /// Endurance volume
    Endurance,
    /// Body weight reduction
    WeightLoss,
    /// Muscle mass gain
    MuscleGain,
    /// Mobility and flexibility
    Flexibility,
    /// Anything else
    #[default]
    Other,
}

impl GoalMetric {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Endurance => "endurance",
            Self::WeightLoss => "weight_loss",
            Self::MuscleGain => "muscle_gain",
            Self::Flexibility => "flexibility",
            Self::Other => "other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "strength" => Self::Strength,
            "cardio" => Self::Cardio,
            "endurance" => Self::Endurance,
            "weight_loss" => Self::WeightLoss,
            "muscle_gain" => Self::MuscleGain,
            "flexibility" => Self::Flexibility,
            _ => Self::Other,
        }
    }
}

/// Goal priority for ordering and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    /// Low priority
    Low,
    /// Medium priority
    #[default]
    Medium,
    /// High priority
    High,
}

impl GoalPriority {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    /// Goal is being worked toward
    #[default]
    Active,
    /// Goal was reached
    Completed,
    /// Deadline passed without completion
    Failed,
    /// Goal is on hold
    Paused,
}

impl GoalStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Paused => "paused",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "paused" => Self::Paused,
            _ => Self::Active,
        }
    }
}

/// One recorded measurement in a goal's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// When the measurement was taken
    pub date: DateTime<Utc>,
    /// Measured value (same unit as the goal's target)
    pub value: f64,
    /// Free-form note
    #[serde(default)]
    pub notes: String,
}

/// A user-defined numeric target with a start baseline, current value,
/// deadline, and direction.
///
/// `progress` is derived: always recomputed from
/// `(start_value, current, target, direction)` whenever any of them changes,
/// including history appends that move `current`. It is never accepted from
/// a client and never hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// What the goal measures
    pub metric: GoalMetric,
    /// Whether progress means the value rising or falling
    pub direction: GoalDirection,
    /// Value at goal creation (baseline)
    pub start_value: f64,
    /// Value that defines completion
    pub target: f64,
    /// Most recently recorded value
    pub current: f64,
    /// Completion deadline
    pub deadline: DateTime<Utc>,
    /// Priority for ordering
    pub priority: GoalPriority,
    /// Lifecycle status
    pub status: GoalStatus,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Recorded measurement history, oldest first
    #[serde(default)]
    pub history: Vec<ProgressEntry>,
    /// Derived completion percentage in [0, 100]
    pub progress: u8,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// The progress-computation input for this goal's current state
    #[must_use]
    pub const fn progress_input(&self) -> GoalProgressInput {
        GoalProgressInput::new(self.start_value, self.current, self.target, self.direction)
    }

    /// Recompute the derived `progress` field from the goal's numeric state.
    ///
    /// Must be called after any mutation of `start_value`, `current`,
    /// `target`, or `direction`.
    pub fn recompute_progress(&mut self) {
        self.progress = compute_progress_rounded(self.progress_input());
    }

    /// Append a measurement to the history and move `current` to its value,
    /// recomputing progress.
    pub fn record_measurement(&mut self, entry: ProgressEntry) {
        self.current = entry.value;
        self.history.push(entry);
        self.recompute_progress();
    }
}
