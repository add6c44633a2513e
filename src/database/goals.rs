// ABOUTME: Goal database operations with per-user filtering and derived progress
// ABOUTME: Every write recomputes the progress percentage through the shared calculator

use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::Database;
use crate::models::{Goal, GoalMetric, GoalPriority, GoalStatus, ProgressEntry};
use crate::progress::{compute_progress_rounded, GoalDirection, GoalProgressInput};

/// Fields accepted when creating a goal
///
/// `progress` is deliberately absent: it is derived on write.
#[derive(Debug, Clone)]
pub struct NewGoal {
    /// Display name
    pub name: String,
    /// What the goal measures
    pub metric: GoalMetric,
    /// Direction of progress
    pub direction: GoalDirection,
    /// Baseline value
    pub start_value: f64,
    /// Completion value
    pub target: f64,
    /// Current value
    pub current: f64,
    /// Completion deadline
    pub deadline: DateTime<Utc>,
    /// Priority
    pub priority: GoalPriority,
    /// Lifecycle status
    pub status: GoalStatus,
    /// Free-form description
    pub description: String,
}

/// Partial update for a goal; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateGoal {
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

/// Filters and pagination for listing goals
#[derive(Debug, Clone)]
pub struct GoalFilter {
    /// Only goals with this status
    pub status: Option<GoalStatus>,
    /// Only goals with this priority
    pub priority: Option<GoalPriority>,
    /// Only goals with this metric
    pub metric: Option<GoalMetric>,
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Sort key, optionally prefixed with `-` for descending
    pub sort: String,
}

impl Default for GoalFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            metric: None,
            page: 1,
            limit: crate::constants::limits::DEFAULT_PAGE_SIZE,
            sort: "-created_at".into(),
        }
    }
}

/// One page of goals plus pagination metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalListPage {
    /// Goals on this page
    pub goals: Vec<Goal>,
    /// Total number of pages
    pub total_pages: u32,
    /// The requested page
    pub current_page: u32,
    /// Total goals matching the filter
    pub total_goals: u32,
}

/// Headline counts for a user's goals
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalStatsSummary {
    /// All goals
    pub total_goals: u32,
    /// Goals still active
    pub active_goals: u32,
    /// Goals completed
    pub completed_goals: u32,
    /// Mean derived progress across all goals
    pub average_progress: f64,
}

/// A goal approaching its deadline
#[derive(Debug, Serialize, Deserialize)]
pub struct UpcomingDeadline {
    /// Goal identifier
    pub id: i64,
    /// Goal name
    pub name: String,
    /// Deadline
    pub deadline: DateTime<Utc>,
    /// Derived progress
    pub progress: u8,
    /// Priority
    pub priority: GoalPriority,
}

/// Aggregated goal statistics for a user
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalStats {
    /// Headline counts
    pub summary: GoalStatsSummary,
    /// Goal counts keyed by priority
    pub by_priority: BTreeMap<String, u32>,
    /// Goal counts keyed by metric
    pub by_metric: BTreeMap<String, u32>,
    /// Active goals due within 30 days, soonest first (max 5)
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
}

/// Map a client sort key to a safe ORDER BY clause
fn sort_clause(sort: &str) -> &'static str {
    match sort {
        "created_at" => "ORDER BY created_at ASC",
        "deadline" => "ORDER BY deadline ASC",
        "-deadline" => "ORDER BY deadline DESC",
        "progress" => "ORDER BY progress ASC",
        "-progress" => "ORDER BY progress DESC",
        "name" => "ORDER BY name ASC",
        "-name" => "ORDER BY name DESC",
        _ => "ORDER BY created_at DESC",
    }
}

impl Database {
    /// Create goals and goal history tables
    pub(super) async fn migrate_goals(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                metric TEXT NOT NULL,
                direction TEXT NOT NULL DEFAULT 'ascending' CHECK (direction IN ('ascending', 'descending')),
                start_value REAL NOT NULL DEFAULT 0,
                target REAL NOT NULL,
                current REAL NOT NULL DEFAULT 0,
                deadline DATETIME NOT NULL,
                priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
                status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed', 'failed', 'paused')),
                description TEXT NOT NULL DEFAULT '',
                progress INTEGER NOT NULL DEFAULT 0 CHECK (progress BETWEEN 0 AND 100),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goal_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                goal_id INTEGER NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
                date DATETIME NOT NULL,
                value REAL NOT NULL,
                notes TEXT NOT NULL DEFAULT ''
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_goals_user_id ON goals(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_goal_history_goal_id ON goal_history(goal_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a goal, computing its derived progress before insert
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_goal(&self, user_id: Uuid, new_goal: NewGoal) -> Result<Goal> {
        let now = Utc::now();
        let progress = compute_progress_rounded(GoalProgressInput::new(
            new_goal.start_value,
            new_goal.current,
            new_goal.target,
            new_goal.direction,
        ));

        let result = sqlx::query(
            r"
            INSERT INTO goals (
                user_id, name, metric, direction, start_value, target, current,
                deadline, priority, status, description, progress, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(user_id.to_string())
        .bind(&new_goal.name)
        .bind(new_goal.metric.as_str())
        .bind(new_goal.direction.as_str())
        .bind(new_goal.start_value)
        .bind(new_goal.target)
        .bind(new_goal.current)
        .bind(new_goal.deadline)
        .bind(new_goal.priority.as_str())
        .bind(new_goal.status.as_str())
        .bind(&new_goal.description)
        .bind(i64::from(progress))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Goal {
            id: result.last_insert_rowid(),
            user_id,
            name: new_goal.name,
            metric: new_goal.metric,
            direction: new_goal.direction,
            start_value: new_goal.start_value,
            target: new_goal.target,
            current: new_goal.current,
            deadline: new_goal.deadline,
            priority: new_goal.priority,
            status: new_goal.status,
            description: new_goal.description,
            history: Vec::new(),
            progress,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get one of the user's goals by id, with history
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_goal(&self, user_id: Uuid, goal_id: i64) -> Result<Option<Goal>> {
        let row = sqlx::query("SELECT * FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut goal = Self::row_to_goal(&row)?;
        goal.history = self
            .load_histories(&[goal.id])
            .await?
            .remove(&goal.id)
            .unwrap_or_default();

        Ok(Some(goal))
    }

    /// List the user's goals with filters and pagination
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_goals(&self, user_id: Uuid, filter: &GoalFilter) -> Result<GoalListPage> {
        let limit = filter.limit.clamp(1, crate::constants::limits::MAX_PAGE_SIZE);
        let page = filter.page.max(1);
        let offset = (page - 1) * limit;

        let where_clause = r"
            WHERE user_id = $1
              AND ($2 IS NULL OR status = $2)
              AND ($3 IS NULL OR priority = $3)
              AND ($4 IS NULL OR metric = $4)
        ";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM goals {where_clause}"))
            .bind(user_id.to_string())
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.metric.map(|m| m.as_str()))
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "SELECT * FROM goals {where_clause} {} LIMIT $5 OFFSET $6",
            sort_clause(&filter.sort)
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.metric.map(|m| m.as_str()))
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        let mut goals = rows
            .iter()
            .map(Self::row_to_goal)
            .collect::<Result<Vec<_>>>()?;

        let ids: Vec<i64> = goals.iter().map(|g| g.id).collect();
        let mut histories = self.load_histories(&ids).await?;
        for goal in &mut goals {
            goal.history = histories.remove(&goal.id).unwrap_or_default();
        }

        let total = u32::try_from(total).unwrap_or(0);
        Ok(GoalListPage {
            goals,
            total_pages: total.div_ceil(limit),
            current_page: page,
            total_goals: total,
        })
    }

    /// Apply a partial update to one of the user's goals, recomputing its
    /// derived progress
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_goal(
        &self,
        user_id: Uuid,
        goal_id: i64,
        update: UpdateGoal,
    ) -> Result<Option<Goal>> {
        let Some(mut goal) = self.get_goal(user_id, goal_id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            goal.name = name;
        }
        if let Some(metric) = update.metric {
            goal.metric = metric;
        }
        if let Some(direction) = update.direction {
            goal.direction = direction;
        }
        if let Some(start_value) = update.start_value {
            goal.start_value = start_value;
        }
        if let Some(target) = update.target {
            goal.target = target;
        }
        if let Some(current) = update.current {
            goal.current = current;
        }
        if let Some(deadline) = update.deadline {
            goal.deadline = deadline;
        }
        if let Some(priority) = update.priority {
            goal.priority = priority;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        if let Some(description) = update.description {
            goal.description = description;
        }

        goal.recompute_progress();
        goal.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE goals SET
                name = $3, metric = $4, direction = $5, start_value = $6,
                target = $7, current = $8, deadline = $9, priority = $10,
                status = $11, description = $12, progress = $13, updated_at = $14
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(goal.id)
        .bind(user_id.to_string())
        .bind(&goal.name)
        .bind(goal.metric.as_str())
        .bind(goal.direction.as_str())
        .bind(goal.start_value)
        .bind(goal.target)
        .bind(goal.current)
        .bind(goal.deadline)
        .bind(goal.priority.as_str())
        .bind(goal.status.as_str())
        .bind(&goal.description)
        .bind(i64::from(goal.progress))
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(Some(goal))
    }

    /// Delete one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_goal(&self, user_id: Uuid, goal_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a measurement to a goal's history, moving `current` and
    /// recomputing progress atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn add_goal_progress(
        &self,
        user_id: Uuid,
        goal_id: i64,
        entry: ProgressEntry,
    ) -> Result<Option<Goal>> {
        let Some(mut goal) = self.get_goal(user_id, goal_id).await? else {
            return Ok(None);
        };

        goal.record_measurement(entry.clone());
        goal.updated_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO goal_history (goal_id, date, value, notes) VALUES ($1, $2, $3, $4)")
            .bind(goal.id)
            .bind(entry.date)
            .bind(entry.value)
            .bind(&entry.notes)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            UPDATE goals SET current = $3, progress = $4, updated_at = $5
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(goal.id)
        .bind(user_id.to_string())
        .bind(goal.current)
        .bind(i64::from(goal.progress))
        .bind(goal.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(goal))
    }

    /// Aggregate goal statistics for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn goal_stats(&self, user_id: Uuid) -> Result<GoalStats> {
        let summary_row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total_goals,
                COALESCE(SUM(status = 'active'), 0) AS active_goals,
                COALESCE(SUM(status = 'completed'), 0) AS completed_goals,
                COALESCE(AVG(progress), 0.0) AS average_progress
            FROM goals WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        let summary = GoalStatsSummary {
            total_goals: u32::try_from(summary_row.get::<i64, _>("total_goals")).unwrap_or(0),
            active_goals: u32::try_from(summary_row.get::<i64, _>("active_goals")).unwrap_or(0),
            completed_goals: u32::try_from(summary_row.get::<i64, _>("completed_goals"))
                .unwrap_or(0),
            average_progress: summary_row.get("average_progress"),
        };

        let by_priority = self.count_grouped(user_id, "priority").await?;
        let by_metric = self.count_grouped(user_id, "metric").await?;

        let cutoff = Utc::now() + Duration::days(30);
        let upcoming_rows = sqlx::query(
            r"
            SELECT id, name, deadline, progress, priority FROM goals
            WHERE user_id = $1 AND status = 'active' AND deadline <= $2
            ORDER BY deadline ASC
            LIMIT 5
            ",
        )
        .bind(user_id.to_string())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let upcoming_deadlines = upcoming_rows
            .iter()
            .map(|row| {
                let priority: String = row.get("priority");
                UpcomingDeadline {
                    id: row.get("id"),
                    name: row.get("name"),
                    deadline: row.get("deadline"),
                    progress: u8::try_from(row.get::<i64, _>("progress")).unwrap_or(0),
                    priority: GoalPriority::parse(&priority),
                }
            })
            .collect();

        Ok(GoalStats {
            summary,
            by_priority,
            by_metric,
            upcoming_deadlines,
        })
    }

    /// Count a user's goals grouped by a column
    async fn count_grouped(&self, user_id: Uuid, column: &str) -> Result<BTreeMap<String, u32>> {
        let query =
            format!("SELECT {column} AS key, COUNT(*) AS n FROM goals WHERE user_id = $1 GROUP BY {column}");

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get::<String, _>("key"),
                    u32::try_from(row.get::<i64, _>("n")).unwrap_or(0),
                )
            })
            .collect())
    }

    /// Load history entries for a set of goals in one query
    async fn load_histories(&self, goal_ids: &[i64]) -> Result<HashMap<i64, Vec<ProgressEntry>>> {
        if goal_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = (1..=goal_ids.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT goal_id, date, value, notes FROM goal_history
             WHERE goal_id IN ({placeholders}) ORDER BY date ASC, id ASC"
        );

        let mut q = sqlx::query(&query);
        for id in goal_ids {
            q = q.bind(id);
        }

        let rows = q.fetch_all(&self.pool).await?;

        let mut histories: HashMap<i64, Vec<ProgressEntry>> = HashMap::new();
        for row in &rows {
            histories
                .entry(row.get("goal_id"))
                .or_default()
                .push(ProgressEntry {
                    date: row.get("date"),
                    value: row.get("value"),
                    notes: row.get("notes"),
                });
        }

        Ok(histories)
    }

    /// Convert a database row to a Goal struct (history loaded separately)
    fn row_to_goal(row: &SqliteRow) -> Result<Goal> {
        let user_id: String = row.get("user_id");
        let metric: String = row.get("metric");
        let direction: String = row.get("direction");
        let priority: String = row.get("priority");
        let status: String = row.get("status");
        let progress: i64 = row.get("progress");

        Ok(Goal {
            id: row.get("id"),
            user_id: Uuid::parse_str(&user_id)?,
            name: row.get("name"),
            metric: GoalMetric::parse(&metric),
            direction: GoalDirection::parse(&direction),
            start_value: row.get("start_value"),
            target: row.get("target"),
            current: row.get("current"),
            deadline: row.get("deadline"),
            priority: GoalPriority::parse(&priority),
            status: GoalStatus::parse(&status),
            description: row.get("description"),
            history: Vec::new(),
            progress: u8::try_from(progress).map_err(|_| anyhow!("progress out of range"))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
