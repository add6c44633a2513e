// ABOUTME: Strength and cardio workout entities
// ABOUTME: StrengthWorkout carries a derived total_volume recomputed from its sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One set of an exercise: weight lifted for a number of reps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Weight in the user's configured unit
    pub weight: f64,
    /// Repetitions performed
    pub reps: u32,
}

impl ExerciseSet {
    /// Volume contributed by this set
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// An exercise within a strength workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise name (e.g. "Deadlift")
    pub name: String,
    /// Sets performed
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    /// Total volume across all sets
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(ExerciseSet::volume).sum()
    }
}

/// A logged strength training session
///
/// `total_volume` is derived from `exercises` and recomputed whenever they
/// change; it is never accepted from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthWorkout {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Session name (e.g. "Push day")
    pub name: String,
    /// Exercises performed
    pub exercises: Vec<Exercise>,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Derived sum of weight x reps across all sets
    pub total_volume: f64,
    /// Rate of perceived exertion, 1-10
    pub rpe: Option<u8>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl StrengthWorkout {
    /// Compute total volume for a set of exercises
    #[must_use]
    pub fn volume_of(exercises: &[Exercise]) -> f64 {
        exercises.iter().map(Exercise::volume).sum()
    }

    /// Recompute the derived `total_volume` field from the exercises.
    ///
    /// Must be called after any mutation of `exercises`.
    pub fn recompute_total_volume(&mut self) {
        self.total_volume = Self::volume_of(&self.exercises);
    }
}

/// A logged cardio session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardioWorkout {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Activity type (e.g. "running", "cycling")
    pub activity: String,
    /// Distance covered in the user's configured unit
    pub distance: f64,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Pace as recorded by the user (e.g. "5:30/km")
    pub pace: Option<String>,
    /// Estimated calories burned
    pub calories: Option<u32>,
    /// Where the session took place
    pub location: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    fn bench_and_squat() -> Vec<Exercise> {
        vec![
            Exercise {
                name: "Bench press".into(),
                sets: vec![
                    ExerciseSet {
                        weight: 80.0,
                        reps: 5,
                    },
                    ExerciseSet {
                        weight: 85.0,
                        reps: 3,
                    },
                ],
            },
            Exercise {
                name: "Squat".into(),
                sets: vec![ExerciseSet {
                    weight: 100.0,
                    reps: 5,
                }],
            },
        ]
    }

    #[test]
    fn volume_sums_weight_times_reps() {
        let exercises = bench_and_squat();
        // 80*5 + 85*3 + 100*5
        assert_eq!(StrengthWorkout::volume_of(&exercises), 1155.0);
    }

    #[test]
    fn recompute_follows_exercise_changes() {
        let now = Utc::now();
        let mut workout = StrengthWorkout {
            id: 1,
            user_id: Uuid::new_v4(),
            date: now,
            name: "Push day".into(),
            exercises: bench_and_squat(),
            duration_minutes: 60,
            total_volume: 0.0,
            rpe: Some(8),
            notes: None,
            created_at: now,
            updated_at: now,
        };

        workout.recompute_total_volume();
        assert_eq!(workout.total_volume, 1155.0);

        workout.exercises.truncate(1);
        workout.recompute_total_volume();
        assert_eq!(workout.total_volume, 655.0);
    }
}
