// ABOUTME: Strength workout database operations with derived total volume
// ABOUTME: Exercises are stored as a JSON column; stats and PRs aggregate over them

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::Database;
use crate::models::{Exercise, StrengthWorkout};

/// Fields accepted when logging a strength workout
///
/// `total_volume` is deliberately absent: it is derived on write.
#[derive(Debug, Clone)]
pub struct NewStrengthWorkout {
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Session name
    pub name: String,
    /// Exercises performed
    pub exercises: Vec<Exercise>,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Rate of perceived exertion, 1-10
    pub rpe: Option<u8>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Partial update for a strength workout; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateStrengthWorkout {
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

/// One page of strength workouts plus pagination metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct StrengthListPage {
    /// Workouts on this page
    pub workouts: Vec<StrengthWorkout>,
    /// Total number of pages
    pub total_pages: u32,
    /// The requested page
    pub current_page: u32,
    /// Total workouts for the user
    pub total_workouts: u32,
}

/// Per-exercise aggregate across all of a user's workouts
#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseProgress {
    /// Exercise name
    pub name: String,
    /// Heaviest single set
    pub max_weight: f64,
    /// Highest single-set volume
    pub max_volume: f64,
    /// Total sets performed
    pub total_sets: u32,
    /// Total reps performed
    pub total_reps: u32,
    /// Number of workouts including this exercise
    pub workout_count: u32,
}

/// Training volume for one calendar day
#[derive(Debug, Serialize, Deserialize)]
pub struct VolumeByDay {
    /// Day in `YYYY-MM-DD` form
    pub date: String,
    /// Total volume lifted that day
    pub volume: f64,
}

/// Aggregated strength statistics for a user
#[derive(Debug, Serialize, Deserialize)]
pub struct StrengthStats {
    /// Total logged workouts
    pub total_workouts: u32,
    /// Total volume across all workouts
    pub total_volume: f64,
    /// Total minutes trained
    pub total_duration_minutes: u32,
    /// Mean RPE across workouts (missing RPE counts as 0)
    pub average_rpe: f64,
    /// Per-exercise aggregates
    pub exercise_progress: Vec<ExerciseProgress>,
    /// Daily volume over the last 30 days, oldest first
    pub recent_volume: Vec<VolumeByDay>,
    /// Workouts in the last 30 days
    pub recent_workout_count: u32,
}

/// A personal best for one exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Weight of the record set
    pub weight: f64,
    /// Reps of the record set
    pub reps: u32,
    /// Volume of the record set
    pub volume: f64,
    /// When the record was set
    pub date: DateTime<Utc>,
    /// Workout the record was set in
    pub workout_name: String,
}

/// Personal records keyed by exercise name
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonalRecords {
    /// Heaviest set per exercise
    pub max_weight: BTreeMap<String, PersonalRecord>,
    /// Highest single-set volume per exercise
    pub max_volume: BTreeMap<String, PersonalRecord>,
}

impl Database {
    /// Create strength workout table
    pub(super) async fn migrate_strength(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS strength_workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date DATETIME NOT NULL,
                name TEXT NOT NULL,
                exercises TEXT NOT NULL DEFAULT '[]',
                duration_minutes INTEGER NOT NULL,
                total_volume REAL NOT NULL DEFAULT 0,
                rpe INTEGER CHECK (rpe BETWEEN 1 AND 10),
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_strength_user_date ON strength_workouts(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Log a strength workout, computing its derived total volume
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails
    pub async fn create_strength_workout(
        &self,
        user_id: Uuid,
        new_workout: NewStrengthWorkout,
    ) -> Result<StrengthWorkout> {
        let now = Utc::now();
        let total_volume = StrengthWorkout::volume_of(&new_workout.exercises);
        let exercises_json = serde_json::to_string(&new_workout.exercises)?;

        let result = sqlx::query(
            r"
            INSERT INTO strength_workouts (
                user_id, date, name, exercises, duration_minutes,
                total_volume, rpe, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(user_id.to_string())
        .bind(new_workout.date)
        .bind(&new_workout.name)
        .bind(exercises_json)
        .bind(i64::from(new_workout.duration_minutes))
        .bind(total_volume)
        .bind(new_workout.rpe.map(i64::from))
        .bind(&new_workout.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(StrengthWorkout {
            id: result.last_insert_rowid(),
            user_id,
            date: new_workout.date,
            name: new_workout.name,
            exercises: new_workout.exercises,
            duration_minutes: new_workout.duration_minutes,
            total_volume,
            rpe: new_workout.rpe,
            notes: new_workout.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get one of the user's strength workouts by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_strength_workout(
        &self,
        user_id: Uuid,
        workout_id: i64,
    ) -> Result<Option<StrengthWorkout>> {
        let row = sqlx::query("SELECT * FROM strength_workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_strength(&row)).transpose()
    }

    /// List the user's strength workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_strength_workouts(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<StrengthListPage> {
        let limit = limit.clamp(1, crate::constants::limits::MAX_PAGE_SIZE);
        let page = page.max(1);
        let offset = (page - 1) * limit;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM strength_workouts WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r"
            SELECT * FROM strength_workouts WHERE user_id = $1
            ORDER BY date DESC LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        let workouts = rows
            .iter()
            .map(Self::row_to_strength)
            .collect::<Result<Vec<_>>>()?;

        let total = u32::try_from(total).unwrap_or(0);
        Ok(StrengthListPage {
            workouts,
            total_pages: total.div_ceil(limit),
            current_page: page,
            total_workouts: total,
        })
    }

    /// Apply a partial update, recomputing total volume when exercises change
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails
    pub async fn update_strength_workout(
        &self,
        user_id: Uuid,
        workout_id: i64,
        update: UpdateStrengthWorkout,
    ) -> Result<Option<StrengthWorkout>> {
        let Some(mut workout) = self.get_strength_workout(user_id, workout_id).await? else {
            return Ok(None);
        };

        if let Some(date) = update.date {
            workout.date = date;
        }
        if let Some(name) = update.name {
            workout.name = name;
        }
        if let Some(exercises) = update.exercises {
            workout.exercises = exercises;
            workout.recompute_total_volume();
        }
        if let Some(duration_minutes) = update.duration_minutes {
            workout.duration_minutes = duration_minutes;
        }
        if let Some(rpe) = update.rpe {
            workout.rpe = Some(rpe);
        }
        if let Some(notes) = update.notes {
            workout.notes = Some(notes);
        }
        workout.updated_at = Utc::now();

        let exercises_json = serde_json::to_string(&workout.exercises)?;

        sqlx::query(
            r"
            UPDATE strength_workouts SET
                date = $3, name = $4, exercises = $5, duration_minutes = $6,
                total_volume = $7, rpe = $8, notes = $9, updated_at = $10
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout.id)
        .bind(user_id.to_string())
        .bind(workout.date)
        .bind(&workout.name)
        .bind(exercises_json)
        .bind(i64::from(workout.duration_minutes))
        .bind(workout.total_volume)
        .bind(workout.rpe.map(i64::from))
        .bind(&workout.notes)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(Some(workout))
    }

    /// Delete one of the user's strength workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_strength_workout(&self, user_id: Uuid, workout_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM strength_workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate strength statistics for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn strength_stats(&self, user_id: Uuid) -> Result<StrengthStats> {
        let workouts = self.all_strength_workouts(user_id).await?;

        let total_volume: f64 = workouts.iter().map(|w| w.total_volume).sum();
        let total_duration_minutes: u32 = workouts.iter().map(|w| w.duration_minutes).sum();
        let average_rpe = if workouts.is_empty() {
            0.0
        } else {
            workouts
                .iter()
                .map(|w| w.rpe.map_or(0.0, f64::from))
                .sum::<f64>()
                / workouts.len() as f64
        };

        // Per-exercise aggregates across all workouts
        let mut exercise_progress: BTreeMap<String, ExerciseProgress> = BTreeMap::new();
        for workout in &workouts {
            for exercise in &workout.exercises {
                let entry = exercise_progress
                    .entry(exercise.name.clone())
                    .or_insert_with(|| ExerciseProgress {
                        name: exercise.name.clone(),
                        max_weight: 0.0,
                        max_volume: 0.0,
                        total_sets: 0,
                        total_reps: 0,
                        workout_count: 0,
                    });
                entry.workout_count += 1;

                for set in &exercise.sets {
                    entry.total_sets += 1;
                    entry.total_reps += set.reps;
                    entry.max_weight = entry.max_weight.max(set.weight);
                    entry.max_volume = entry.max_volume.max(set.volume());
                }
            }
        }

        // Daily volume over the trailing 30 days
        let cutoff = Utc::now() - Duration::days(30);
        let mut volume_by_day: BTreeMap<String, f64> = BTreeMap::new();
        let mut recent_workout_count = 0u32;
        for workout in &workouts {
            if workout.date >= cutoff {
                recent_workout_count += 1;
                *volume_by_day
                    .entry(workout.date.format("%Y-%m-%d").to_string())
                    .or_default() += workout.total_volume;
            }
        }

        Ok(StrengthStats {
            total_workouts: u32::try_from(workouts.len()).unwrap_or(0),
            total_volume,
            total_duration_minutes,
            average_rpe,
            exercise_progress: exercise_progress.into_values().collect(),
            recent_volume: volume_by_day
                .into_iter()
                .map(|(date, volume)| VolumeByDay { date, volume })
                .collect(),
            recent_workout_count,
        })
    }

    /// Personal records (heaviest set and highest single-set volume) per exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn personal_records(&self, user_id: Uuid) -> Result<PersonalRecords> {
        let workouts = self.all_strength_workouts(user_id).await?;

        let mut max_weight: BTreeMap<String, PersonalRecord> = BTreeMap::new();
        let mut max_volume: BTreeMap<String, PersonalRecord> = BTreeMap::new();

        for workout in &workouts {
            for exercise in &workout.exercises {
                for set in &exercise.sets {
                    let record = PersonalRecord {
                        weight: set.weight,
                        reps: set.reps,
                        volume: set.volume(),
                        date: workout.date,
                        workout_name: workout.name.clone(),
                    };

                    let weight_best = max_weight.get(&exercise.name);
                    if weight_best.is_none_or(|best| set.weight > best.weight) {
                        max_weight.insert(exercise.name.clone(), record.clone());
                    }

                    let volume_best = max_volume.get(&exercise.name);
                    if volume_best.is_none_or(|best| record.volume > best.volume) {
                        max_volume.insert(exercise.name.clone(), record);
                    }
                }
            }
        }

        Ok(PersonalRecords {
            max_weight,
            max_volume,
        })
    }

    /// Fetch all of a user's strength workouts, newest first
    async fn all_strength_workouts(&self, user_id: Uuid) -> Result<Vec<StrengthWorkout>> {
        let rows =
            sqlx::query("SELECT * FROM strength_workouts WHERE user_id = $1 ORDER BY date DESC")
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(Self::row_to_strength).collect()
    }

    /// Convert a database row to a `StrengthWorkout` struct
    fn row_to_strength(row: &SqliteRow) -> Result<StrengthWorkout> {
        let user_id: String = row.get("user_id");
        let exercises_json: String = row.get("exercises");
        let duration: i64 = row.get("duration_minutes");
        let rpe: Option<i64> = row.get("rpe");

        Ok(StrengthWorkout {
            id: row.get("id"),
            user_id: Uuid::parse_str(&user_id)?,
            date: row.get("date"),
            name: row.get("name"),
            exercises: serde_json::from_str(&exercises_json)?,
            duration_minutes: u32::try_from(duration)?,
            total_volume: row.get("total_volume"),
            rpe: rpe.map(u8::try_from).transpose()?,
            notes: row.get("notes"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
