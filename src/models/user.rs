// ABOUTME: User account model with physical profile and unit preferences
// ABOUTME: User, WeightUnit, and DistanceUnit definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Preferred weight unit for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms
    #[default]
    Kg,
    /// Pounds
    Lbs,
}

impl WeightUnit {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lbs => "lbs",
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Self::Kg),
            "lbs" => Ok(Self::Lbs),
            _ => Err(AppError::invalid_input(format!("Invalid weight unit: {s}"))),
        }
    }
}

/// Preferred distance unit for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometres
    #[default]
    Km,
    /// Miles
    Mi,
}

impl DistanceUnit {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Mi => "mi",
        }
    }
}

impl Display for DistanceUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "km" => Ok(Self::Km),
            "mi" => Ok(Self::Mi),
            _ => Err(AppError::invalid_input(format!(
                "Invalid distance unit: {s}"
            ))),
        }
    }
}

/// Represents a registered user
///
/// Every workout, goal, and schedule row is owned by exactly one user and
/// every query filters on that ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address (used for identification)
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// Hashed password for authentication
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Age in years
    pub age: Option<u16>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimetres
    pub height_cm: Option<f64>,
    /// Preferred weight unit for display
    pub weight_unit: WeightUnit,
    /// Preferred distance unit for display
    pub distance_unit: DistanceUnit,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// Last time user accessed the system
    pub last_active: DateTime<Utc>,
    /// Whether the user account is active
    pub is_active: bool,
}

impl User {
    /// Create a new user with the given email and password hash
    #[must_use]
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            age: None,
            weight_kg: None,
            height_cm: None,
            weight_unit: WeightUnit::default(),
            distance_unit: DistanceUnit::default(),
            created_at: now,
            last_active: now,
            is_active: true,
        }
    }

    /// Update last active timestamp
    pub fn update_last_active(&mut self) {
        self.last_active = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn new_user_has_defaults() {
        let user = User::new("a@b.io".into(), "hash".into(), None);
        assert!(user.is_active);
        assert_eq!(user.weight_unit, WeightUnit::Kg);
        assert_eq!(user.distance_unit, DistanceUnit::Km);
        assert!(user.age.is_none());
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = User::new("a@b.io".into(), "secret-hash".into(), None);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn units_round_trip() {
        assert_eq!("lbs".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("mi".parse::<DistanceUnit>().unwrap(), DistanceUnit::Mi);
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }
}
