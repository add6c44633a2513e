// ABOUTME: User management database operations
// ABOUTME: Handles user registration, lookup, and profile management

use anyhow::{anyhow, Result};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::{DistanceUnit, User, WeightUnit};

/// Partial update for a user's profile fields
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    /// New display name
    pub display_name: Option<String>,
    /// New age
    pub age: Option<u16>,
    /// New body weight in kilograms
    pub weight_kg: Option<f64>,
    /// New height in centimetres
    pub height_cm: Option<f64>,
    /// New preferred weight unit
    pub weight_unit: Option<WeightUnit>,
    /// New preferred distance unit
    pub distance_unit: Option<DistanceUnit>,
}

impl Database {
    /// Create users table and indexes
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                display_name TEXT,
                password_hash TEXT NOT NULL,
                age INTEGER,
                weight_kg REAL,
                height_cm REAL,
                weight_unit TEXT NOT NULL DEFAULT 'kg' CHECK (weight_unit IN ('kg', 'lbs')),
                distance_unit TEXT NOT NULL DEFAULT 'km' CHECK (distance_unit IN ('km', 'mi')),
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                last_active DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already in use
    /// - The database operation fails
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(anyhow!("Email already in use by another user"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, email, display_name, password_hash,
                age, weight_kg, height_cm, weight_unit, distance_unit,
                is_active, created_at, last_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.age.map(i64::from))
        .bind(user.weight_kg)
        .bind(user.height_cm)
        .bind(user.weight_unit.as_str())
        .bind(user.distance_unit.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.last_active)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_impl("email", email).await
    }

    /// Get a user by email, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database query fails
    /// - The user is not found
    pub async fn get_user_by_email_required(&self, email: &str) -> Result<User> {
        self.get_user_by_email(email)
            .await?
            .ok_or_else(|| anyhow!("User not found with email: {email}"))
    }

    /// Internal implementation for getting a user
    async fn get_user_impl(&self, field: &str, value: &str) -> Result<Option<User>> {
        let query = format!(
            r"
            SELECT id, email, display_name, password_hash,
                   age, weight_kg, height_cm, weight_unit, distance_unit,
                   is_active, created_at, last_active
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// Convert a database row to a User struct
    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.get("id");
        let weight_unit: String = row.get("weight_unit");
        let distance_unit: String = row.get("distance_unit");
        let age: Option<i64> = row.get("age");

        Ok(User {
            id: Uuid::parse_str(&id)?,
            email: row.get("email"),
            display_name: row.get("display_name"),
            password_hash: row.get("password_hash"),
            age: age.map(u16::try_from).transpose()?,
            weight_kg: row.get("weight_kg"),
            height_cm: row.get("height_cm"),
            weight_unit: weight_unit.parse().map_err(|e| anyhow!("{e}"))?,
            distance_unit: distance_unit.parse().map_err(|e| anyhow!("{e}"))?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            last_active: row.get("last_active"),
        })
    }

    /// Update user's last active timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_last_active(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_active = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apply a partial profile update, returning the refreshed user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        update: &UserProfileUpdate,
    ) -> Result<Option<User>> {
        sqlx::query(
            r"
            UPDATE users SET
                display_name = COALESCE($2, display_name),
                age = COALESCE($3, age),
                weight_kg = COALESCE($4, weight_kg),
                height_cm = COALESCE($5, height_cm),
                weight_unit = COALESCE($6, weight_unit),
                distance_unit = COALESCE($7, distance_unit),
                last_active = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(&update.display_name)
        .bind(update.age.map(i64::from))
        .bind(update.weight_kg)
        .bind(update.height_cm)
        .bind(update.weight_unit.map(|u| u.as_str()))
        .bind(update.distance_unit.map(|u| u.as_str()))
        .execute(&self.pool)
        .await?;

        self.get_user(user_id).await
    }

    /// Get total user count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
