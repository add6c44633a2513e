// ABOUTME: Cardio workout database operations
// ABOUTME: CRUD with per-user filtering plus activity-grouped statistics

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::Database;
use crate::models::CardioWorkout;

/// Fields accepted when logging a cardio workout
#[derive(Debug, Clone)]
pub struct NewCardioWorkout {
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Activity type (e.g. "running")
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

/// Partial update for a cardio workout; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateCardioWorkout {
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New activity type
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

/// One page of cardio workouts plus pagination metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct CardioListPage {
    /// Workouts on this page
    pub workouts: Vec<CardioWorkout>,
    /// Total number of pages
    pub total_pages: u32,
    /// The requested page
    pub current_page: u32,
    /// Total workouts for the user
    pub total_workouts: u32,
}

/// Aggregated cardio statistics for a user
#[derive(Debug, Serialize, Deserialize)]
pub struct CardioStats {
    /// Total logged sessions
    pub total_sessions: u32,
    /// Total distance covered
    pub total_distance: f64,
    /// Total minutes of cardio
    pub total_duration_minutes: u32,
    /// Total calories burned (sessions without calories count as 0)
    pub total_calories: u32,
    /// Session counts keyed by activity type
    pub by_activity: BTreeMap<String, u32>,
}

impl Database {
    /// Create cardio workout table
    pub(super) async fn migrate_cardio(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS cardio_workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date DATETIME NOT NULL,
                activity TEXT NOT NULL,
                distance REAL NOT NULL,
                duration_minutes INTEGER NOT NULL,
                pace TEXT,
                calories INTEGER,
                location TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_cardio_user_date ON cardio_workouts(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Log a cardio workout
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_cardio_workout(
        &self,
        user_id: Uuid,
        new_workout: NewCardioWorkout,
    ) -> Result<CardioWorkout> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO cardio_workouts (
                user_id, date, activity, distance, duration_minutes,
                pace, calories, location, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(user_id.to_string())
        .bind(new_workout.date)
        .bind(&new_workout.activity)
        .bind(new_workout.distance)
        .bind(i64::from(new_workout.duration_minutes))
        .bind(&new_workout.pace)
        .bind(new_workout.calories.map(i64::from))
        .bind(&new_workout.location)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(CardioWorkout {
            id: result.last_insert_rowid(),
            user_id,
            date: new_workout.date,
            activity: new_workout.activity,
            distance: new_workout.distance,
            duration_minutes: new_workout.duration_minutes,
            pace: new_workout.pace,
            calories: new_workout.calories,
            location: new_workout.location,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get one of the user's cardio workouts by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_cardio_workout(
        &self,
        user_id: Uuid,
        workout_id: i64,
    ) -> Result<Option<CardioWorkout>> {
        let row = sqlx::query("SELECT * FROM cardio_workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_cardio(&row)).transpose()
    }

    /// List the user's cardio workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_cardio_workouts(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<CardioListPage> {
        let limit = limit.clamp(1, crate::constants::limits::MAX_PAGE_SIZE);
        let page = page.max(1);
        let offset = (page - 1) * limit;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cardio_workouts WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r"
            SELECT * FROM cardio_workouts WHERE user_id = $1
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
            .map(Self::row_to_cardio)
            .collect::<Result<Vec<_>>>()?;

        let total = u32::try_from(total).unwrap_or(0);
        Ok(CardioListPage {
            workouts,
            total_pages: total.div_ceil(limit),
            current_page: page,
            total_workouts: total,
        })
    }

    /// Apply a partial update to one of the user's cardio workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_cardio_workout(
        &self,
        user_id: Uuid,
        workout_id: i64,
        update: UpdateCardioWorkout,
    ) -> Result<Option<CardioWorkout>> {
        let Some(mut workout) = self.get_cardio_workout(user_id, workout_id).await? else {
            return Ok(None);
        };

        if let Some(date) = update.date {
            workout.date = date;
        }
        if let Some(activity) = update.activity {
            workout.activity = activity;
        }
        if let Some(distance) = update.distance {
            workout.distance = distance;
        }
        if let Some(duration_minutes) = update.duration_minutes {
            workout.duration_minutes = duration_minutes;
        }
        if let Some(pace) = update.pace {
            workout.pace = Some(pace);
        }
        if let Some(calories) = update.calories {
            workout.calories = Some(calories);
        }
        if let Some(location) = update.location {
            workout.location = Some(location);
        }
        workout.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE cardio_workouts SET
                date = $3, activity = $4, distance = $5, duration_minutes = $6,
                pace = $7, calories = $8, location = $9, updated_at = $10
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout.id)
        .bind(user_id.to_string())
        .bind(workout.date)
        .bind(&workout.activity)
        .bind(workout.distance)
        .bind(i64::from(workout.duration_minutes))
        .bind(&workout.pace)
        .bind(workout.calories.map(i64::from))
        .bind(&workout.location)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(Some(workout))
    }

    /// Delete one of the user's cardio workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_cardio_workout(&self, user_id: Uuid, workout_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cardio_workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate cardio statistics for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn cardio_stats(&self, user_id: Uuid) -> Result<CardioStats> {
        let summary_row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total_sessions,
                COALESCE(SUM(distance), 0.0) AS total_distance,
                COALESCE(SUM(duration_minutes), 0) AS total_duration,
                COALESCE(SUM(COALESCE(calories, 0)), 0) AS total_calories
            FROM cardio_workouts WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        let by_activity_rows = sqlx::query(
            r"
            SELECT activity, COUNT(*) AS n FROM cardio_workouts
            WHERE user_id = $1 GROUP BY activity
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let by_activity = by_activity_rows
            .iter()
            .map(|row| {
                (
                    row.get::<String, _>("activity"),
                    u32::try_from(row.get::<i64, _>("n")).unwrap_or(0),
                )
            })
            .collect();

        Ok(CardioStats {
            total_sessions: u32::try_from(summary_row.get::<i64, _>("total_sessions"))
                .unwrap_or(0),
            total_distance: summary_row.get("total_distance"),
            total_duration_minutes: u32::try_from(summary_row.get::<i64, _>("total_duration"))
                .unwrap_or(0),
            total_calories: u32::try_from(summary_row.get::<i64, _>("total_calories"))
                .unwrap_or(0),
            by_activity,
        })
    }

    /// Convert a database row to a `CardioWorkout` struct
    fn row_to_cardio(row: &SqliteRow) -> Result<CardioWorkout> {
        let user_id: String = row.get("user_id");
        let duration: i64 = row.get("duration_minutes");
        let calories: Option<i64> = row.get("calories");

        Ok(CardioWorkout {
            id: row.get("id"),
            user_id: Uuid::parse_str(&user_id)?,
            date: row.get("date"),
            activity: row.get("activity"),
            distance: row.get("distance"),
            duration_minutes: u32::try_from(duration)?,
            pace: row.get("pace"),
            calories: calories.map(u32::try_from).transpose()?,
            location: row.get("location"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
