// ABOUTME: Weekly schedule and recommended plan database operations
// ABOUTME: Replacing a week's schedule is atomic; entries sort Monday-first

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::Database;
use crate::models::{
    PlanLevel, PlannedExercise, RecommendedPlan, ScheduleEntry, SessionType, Weekday,
};

/// Fields accepted for one day of a weekly schedule
#[derive(Debug, Clone)]
pub struct NewScheduleEntry {
    /// Day of week
    pub day: Weekday,
    /// Session type
    pub session_type: SessionType,
    /// Human-readable plan for the day
    pub details: String,
    /// Exercises planned for the day
    pub exercises: Vec<PlannedExercise>,
}

/// Fields accepted when adding a recommended plan
#[derive(Debug, Clone)]
pub struct NewRecommendedPlan {
    /// Plan title
    pub title: String,
    /// What the plan covers
    pub description: String,
    /// Embedded video URL
    pub video_url: String,
    /// Link to the full plan
    pub full_url: String,
    /// Difficulty/category level
    pub level: PlanLevel,
    /// Expected session duration, free-form
    pub duration: String,
    /// Required equipment
    pub equipment: Vec<String>,
    /// Search tags
    pub tags: Vec<String>,
}

/// Monday of the week containing today
#[must_use]
pub fn current_week_start() -> NaiveDate {
    let today = Utc::now().date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

impl Database {
    /// Create schedule and recommended plan tables
    pub(super) async fn migrate_schedule(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weekly_schedule (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                day TEXT NOT NULL CHECK (day IN ('Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat', 'Sun')),
                session_type TEXT NOT NULL CHECK (session_type IN ('workout', 'rest', 'cardio', 'strength', 'recovery')),
                details TEXT NOT NULL,
                exercises TEXT NOT NULL DEFAULT '[]',
                is_active BOOLEAN NOT NULL DEFAULT 1,
                week_start DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_schedule_user_week ON weekly_schedule(user_id, week_start)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recommended_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                video_url TEXT NOT NULL,
                full_url TEXT NOT NULL,
                level TEXT NOT NULL DEFAULT 'intermediate' CHECK (level IN ('beginner', 'intermediate', 'advanced', 'bodybuilding', 'weightloss')),
                duration TEXT NOT NULL DEFAULT '30-45 minutes',
                equipment TEXT NOT NULL DEFAULT '[]',
                tags TEXT NOT NULL DEFAULT '[]',
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a user's schedule for one week, Monday first
    ///
    /// Defaults to the current week when `week_start` is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_weekly_schedule(
        &self,
        user_id: Uuid,
        week_start: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleEntry>> {
        let week_start = week_start.unwrap_or_else(current_week_start);

        let rows = sqlx::query(
            "SELECT * FROM weekly_schedule WHERE user_id = $1 AND week_start = $2",
        )
        .bind(user_id.to_string())
        .bind(week_start)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = rows
            .iter()
            .map(Self::row_to_schedule_entry)
            .collect::<Result<Vec<_>>>()?;

        entries.sort_by_key(|entry| entry.day.ordinal());
        Ok(entries)
    }

    /// Replace a user's schedule for one week atomically
    ///
    /// Deletes the existing rows for that week and inserts the new set in a
    /// single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails
    pub async fn replace_weekly_schedule(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
        entries: Vec<NewScheduleEntry>,
    ) -> Result<Vec<ScheduleEntry>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM weekly_schedule WHERE user_id = $1 AND week_start = $2")
            .bind(user_id.to_string())
            .bind(week_start)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let exercises_json = serde_json::to_string(&entry.exercises)?;

            let result = sqlx::query(
                r"
                INSERT INTO weekly_schedule (
                    user_id, day, session_type, details, exercises,
                    is_active, week_start, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, 1, $6, $7, $8)
                ",
            )
            .bind(user_id.to_string())
            .bind(entry.day.as_str())
            .bind(entry.session_type.as_str())
            .bind(&entry.details)
            .bind(exercises_json)
            .bind(week_start)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            saved.push(ScheduleEntry {
                id: result.last_insert_rowid(),
                user_id,
                day: entry.day,
                session_type: entry.session_type,
                details: entry.details,
                exercises: entry.exercises,
                is_active: true,
                week_start,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;

        saved.sort_by_key(|entry| entry.day.ordinal());
        Ok(saved)
    }

    /// List active recommended plans, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recommended_plans(
        &self,
        level: Option<PlanLevel>,
        limit: u32,
    ) -> Result<Vec<RecommendedPlan>> {
        let limit = limit.clamp(1, crate::constants::limits::MAX_PAGE_SIZE);

        let rows = sqlx::query(
            r"
            SELECT * FROM recommended_plans
            WHERE is_active = 1 AND ($1 IS NULL OR level = $1)
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(level.map(|l| l.as_str()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    /// Add a recommended plan
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails
    pub async fn create_recommended_plan(
        &self,
        new_plan: NewRecommendedPlan,
    ) -> Result<RecommendedPlan> {
        let now = Utc::now();
        let equipment_json = serde_json::to_string(&new_plan.equipment)?;
        let tags_json = serde_json::to_string(&new_plan.tags)?;

        let result = sqlx::query(
            r"
            INSERT INTO recommended_plans (
                title, description, video_url, full_url, level,
                duration, equipment, tags, is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 1, $9)
            ",
        )
        .bind(&new_plan.title)
        .bind(&new_plan.description)
        .bind(&new_plan.video_url)
        .bind(&new_plan.full_url)
        .bind(new_plan.level.as_str())
        .bind(&new_plan.duration)
        .bind(equipment_json)
        .bind(tags_json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(RecommendedPlan {
            id: result.last_insert_rowid(),
            title: new_plan.title,
            description: new_plan.description,
            video_url: new_plan.video_url,
            full_url: new_plan.full_url,
            level: new_plan.level,
            duration: new_plan.duration,
            equipment: new_plan.equipment,
            tags: new_plan.tags,
            is_active: true,
            created_at: now,
        })
    }

    /// Convert a database row to a `ScheduleEntry` struct
    fn row_to_schedule_entry(row: &SqliteRow) -> Result<ScheduleEntry> {
        let user_id: String = row.get("user_id");
        let day: String = row.get("day");
        let session_type: String = row.get("session_type");
        let exercises_json: String = row.get("exercises");

        Ok(ScheduleEntry {
            id: row.get("id"),
            user_id: Uuid::parse_str(&user_id)?,
            day: Weekday::parse(&day).ok_or_else(|| anyhow!("Invalid weekday: {day}"))?,
            session_type: SessionType::parse(&session_type),
            details: row.get("details"),
            exercises: serde_json::from_str(&exercises_json)?,
            is_active: row.get("is_active"),
            week_start: row.get("week_start"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Convert a database row to a `RecommendedPlan` struct
    fn row_to_plan(row: &SqliteRow) -> Result<RecommendedPlan> {
        let level: String = row.get("level");
        let equipment_json: String = row.get("equipment");
        let tags_json: String = row.get("tags");

        Ok(RecommendedPlan {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            video_url: row.get("video_url"),
            full_url: row.get("full_url"),
            level: PlanLevel::parse(&level),
            duration: row.get("duration"),
            equipment: serde_json::from_str(&equipment_json)?,
            tags: serde_json::from_str(&tags_json)?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
        })
    }
}
