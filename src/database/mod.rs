// ABOUTME: Database management over SQLite with idempotent migrations
// ABOUTME: One submodule per entity; every query filters on the owning user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! # Database Management
//!
//! This module provides persistence for the TrainLog server: users, goals,
//! strength and cardio workouts, and weekly schedules. Derived fields are
//! recomputed here on every write so no handler can store a stale
//! `progress` or `total_volume`.

mod cardio;
mod goals;
mod schedule;
mod strength;
mod users;

pub use cardio::{CardioListPage, CardioStats, NewCardioWorkout, UpdateCardioWorkout};
pub use goals::{
    GoalFilter, GoalListPage, GoalStats, GoalStatsSummary, NewGoal, UpcomingDeadline, UpdateGoal,
};
pub use schedule::{current_week_start, NewRecommendedPlan, NewScheduleEntry};
pub use strength::{
    ExerciseProgress, NewStrengthWorkout, PersonalRecord, PersonalRecords, StrengthListPage,
    StrengthStats, UpdateStrengthWorkout, VolumeByDay,
};
pub use users::UserProfileUpdate;

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

/// Database manager for all TrainLog entities
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory SQLite database exists per connection; a single pooled
        // connection keeps every query on the same database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_goals().await?;
        self.migrate_strength().await?;
        self.migrate_cardio().await?;
        self.migrate_schedule().await?;

        Ok(())
    }
}
