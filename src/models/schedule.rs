// ABOUTME: Weekly schedule entries and recommended training plan models
// ABOUTME: Weekday/SessionType/PlanLevel enums with database string round-trips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Day of week for schedule entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    /// Monday
    Mon,
    /// Tuesday
    Tue,
    /// Wednesday
    Wed,
    /// Thursday
    Thu,
    /// Friday
    Fri,
    /// Saturday
    Sat,
    /// Sunday
    Sun,
}

impl Weekday {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
            Self::Sun => "Sun",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Mon" => Some(Self::Mon),
            "Tue" => Some(Self::Tue),
            "Wed" => Some(Self::Wed),
            "Thu" => Some(Self::Thu),
            "Fri" => Some(Self::Fri),
            "Sat" => Some(Self::Sat),
            "Sun" => Some(Self::Sun),
            _ => None,
        }
    }

    /// Position within the week, Monday first, for sorting
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::Mon => 0,
            Self::Tue => 1,
            Self::Wed => 2,
            Self::Thu => 3,
            Self::Fri => 4,
            Self::Sat => 5,
            Self::Sun => 6,
        }
    }
}

/// What kind of session a schedule entry plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// General workout
    #[default]
    Workout,
    /// Rest day
    Rest,
    /// Cardio session
    Cardio,
    /// Strength session
    Strength,
    /// Active recovery
    Recovery,
}

impl SessionType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Rest => "rest",
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Recovery => "recovery",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "rest" => Self::Rest,
            "cardio" => Self::Cardio,
            "strength" => Self::Strength,
            "recovery" => Self::Recovery,
            _ => Self::Workout,
        }
    }
}

/// An exercise planned for a scheduled session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Exercise name
    pub name: String,
    /// Planned set count
    pub sets: Option<u32>,
    /// Planned reps, free-form ("5" or "8-12")
    pub reps: Option<String>,
    /// Planned duration, free-form ("20 min")
    pub duration: Option<String>,
}

/// One day of a user's weekly training schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Day of week
    pub day: Weekday,
    /// Session type
    pub session_type: SessionType,
    /// Human-readable plan for the day
    pub details: String,
    /// Exercises planned for the day
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
    /// Whether this entry is active
    pub is_active: bool,
    /// Monday of the week this entry belongs to
    pub week_start: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Difficulty/category level of a recommended plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    /// New lifters
    Beginner,
    /// Established base
    #[default]
    Intermediate,
    /// Experienced athletes
    Advanced,
    /// Hypertrophy focus
    Bodybuilding,
    /// Fat loss focus
    Weightloss,
}

impl PlanLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Bodybuilding => "bodybuilding",
            Self::Weightloss => "weightloss",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            "bodybuilding" => Self::Bodybuilding,
            "weightloss" => Self::Weightloss,
            _ => Self::Intermediate,
        }
    }
}

/// A curated training plan offered to all users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedPlan {
    /// Row identifier
    pub id: i64,
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
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the plan is offered
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_ordering_starts_monday() {
        assert!(Weekday::Mon.ordinal() < Weekday::Sun.ordinal());
        let mut days = vec![Weekday::Sun, Weekday::Wed, Weekday::Mon];
        days.sort_by_key(Weekday::ordinal);
        assert_eq!(days, vec![Weekday::Mon, Weekday::Wed, Weekday::Sun]);
    }

    #[test]
    fn weekday_rejects_unknown_strings() {
        assert_eq!(Weekday::parse("Tue"), Some(Weekday::Tue));
        assert_eq!(Weekday::parse("Noneday"), None);
    }

    #[test]
    fn session_type_round_trips() {
        for ty in [
            SessionType::Workout,
            SessionType::Rest,
            SessionType::Recovery,
        ] {
            assert_eq!(SessionType::parse(ty.as_str()), ty);
        }
    }
}
