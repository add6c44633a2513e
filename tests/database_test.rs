// ABOUTME: Database integration tests over in-memory SQLite
// ABOUTME: Covers per-user isolation and derived-field recomputation on every write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use trainlog_server::database::{
    Database, GoalFilter, NewCardioWorkout, NewGoal, NewScheduleEntry, NewStrengthWorkout,
    UpdateGoal,
};
use trainlog_server::models::{
    Exercise, ExerciseSet, GoalMetric, GoalPriority, GoalStatus, ProgressEntry, SessionType, User,
    Weekday,
};
use trainlog_server::progress::GoalDirection;

async fn test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

async fn test_user(db: &Database, email: &str) -> Uuid {
    let user = User::new(email.into(), "hash".into(), None);
    db.create_user(&user).await.unwrap()
}

fn bench_goal(direction: GoalDirection) -> NewGoal {
    NewGoal {
        name: "Bench press 100kg".into(),
        metric: GoalMetric::Strength,
        direction,
        start_value: 80.0,
        target: 100.0,
        current: 80.0,
        deadline: Utc::now() + Duration::days(90),
        priority: GoalPriority::High,
        status: GoalStatus::Active,
        description: String::new(),
    }
}

#[tokio::test]
async fn user_round_trip() {
    let db = test_db().await;
    let id = test_user(&db, "round@trip.io").await;

    let user = db.get_user(id).await.unwrap().unwrap();
    assert_eq!(user.email, "round@trip.io");
    assert!(user.is_active);

    let by_email = db.get_user_by_email("round@trip.io").await.unwrap();
    assert_eq!(by_email.unwrap().id, id);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = test_db().await;
    test_user(&db, "dup@user.io").await;

    let again = User::new("dup@user.io".into(), "other".into(), None);
    assert!(db.create_user(&again).await.is_err());
}

#[tokio::test]
async fn goal_create_computes_progress() {
    let db = test_db().await;
    let user_id = test_user(&db, "goal@user.io").await;

    let goal = db
        .create_goal(user_id, bench_goal(GoalDirection::Ascending))
        .await
        .unwrap();

    assert_eq!(goal.progress, 0);

    // Degenerate descending range at creation resolves without error
    let mut degenerate = bench_goal(GoalDirection::Descending);
    degenerate.start_value = 70.0;
    degenerate.current = 65.0;
    degenerate.target = 80.0;
    let degenerate = db.create_goal(user_id, degenerate).await.unwrap();
    assert_eq!(degenerate.progress, 100);
}

#[tokio::test]
async fn goal_update_recomputes_progress() {
    let db = test_db().await;
    let user_id = test_user(&db, "update@user.io").await;

    let goal = db
        .create_goal(user_id, bench_goal(GoalDirection::Ascending))
        .await
        .unwrap();

    let updated = db
        .update_goal(
            user_id,
            goal.id,
            UpdateGoal {
                current: Some(90.0),
                ..UpdateGoal::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.progress, 50);

    // Flipping the direction re-derives progress from the same numbers
    let flipped = db
        .update_goal(
            user_id,
            goal.id,
            UpdateGoal {
                direction: Some(GoalDirection::Descending),
                ..UpdateGoal::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    // start 80, current 90, target 100: descending degenerate, current above target
    assert_eq!(flipped.progress, 0);

    let stored = db.get_goal(user_id, goal.id).await.unwrap().unwrap();
    assert_eq!(stored.progress, 0);
}

#[tokio::test]
async fn progress_entry_moves_current_and_history() {
    let db = test_db().await;
    let user_id = test_user(&db, "history@user.io").await;

    let goal = db
        .create_goal(user_id, bench_goal(GoalDirection::Ascending))
        .await
        .unwrap();

    let goal = db
        .add_goal_progress(
            user_id,
            goal.id,
            ProgressEntry {
                date: Utc::now(),
                value: 95.0,
                notes: "new PR".into(),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(goal.current, 95.0);
    assert_eq!(goal.progress, 75);
    assert_eq!(goal.history.len(), 1);

    let stored = db.get_goal(user_id, goal.id).await.unwrap().unwrap();
    assert_eq!(stored.history.len(), 1);
    assert_eq!(stored.history[0].notes, "new PR");
    assert_eq!(stored.progress, 75);
}

#[tokio::test]
async fn goals_are_isolated_per_user() {
    let db = test_db().await;
    let alice = test_user(&db, "alice@user.io").await;
    let bob = test_user(&db, "bob@user.io").await;

    let goal = db
        .create_goal(alice, bench_goal(GoalDirection::Ascending))
        .await
        .unwrap();

    assert!(db.get_goal(bob, goal.id).await.unwrap().is_none());
    assert!(!db.delete_goal(bob, goal.id).await.unwrap());

    let bob_page = db.list_goals(bob, &GoalFilter::default()).await.unwrap();
    assert_eq!(bob_page.total_goals, 0);
}

#[tokio::test]
async fn goal_list_filters_and_paginates() {
    let db = test_db().await;
    let user_id = test_user(&db, "list@user.io").await;

    for i in 0..12 {
        let mut goal = bench_goal(GoalDirection::Ascending);
        goal.name = format!("Goal {i}");
        goal.priority = if i % 2 == 0 {
            GoalPriority::High
        } else {
            GoalPriority::Low
        };
        db.create_goal(user_id, goal).await.unwrap();
    }

    let page = db
        .list_goals(
            user_id,
            &GoalFilter {
                limit: 5,
                ..GoalFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.goals.len(), 5);
    assert_eq!(page.total_goals, 12);
    assert_eq!(page.total_pages, 3);

    let high_only = db
        .list_goals(
            user_id,
            &GoalFilter {
                priority: Some(GoalPriority::High),
                limit: 50,
                ..GoalFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(high_only.total_goals, 6);
    assert!(high_only
        .goals
        .iter()
        .all(|g| g.priority == GoalPriority::High));
}

#[tokio::test]
async fn goal_stats_aggregate() {
    let db = test_db().await;
    let user_id = test_user(&db, "stats@user.io").await;

    let mut done = bench_goal(GoalDirection::Ascending);
    done.current = 100.0;
    done.status = GoalStatus::Completed;
    db.create_goal(user_id, done).await.unwrap();

    // Active goal due within 30 days
    let mut soon = bench_goal(GoalDirection::Ascending);
    soon.deadline = Utc::now() + Duration::days(7);
    db.create_goal(user_id, soon).await.unwrap();

    let stats = db.goal_stats(user_id).await.unwrap();
    assert_eq!(stats.summary.total_goals, 2);
    assert_eq!(stats.summary.active_goals, 1);
    assert_eq!(stats.summary.completed_goals, 1);
    assert_eq!(stats.summary.average_progress, 50.0);
    assert_eq!(stats.by_priority.get("high"), Some(&2));
    assert_eq!(stats.by_metric.get("strength"), Some(&2));
    assert_eq!(stats.upcoming_deadlines.len(), 1);
}

#[tokio::test]
async fn strength_workout_volume_is_derived() {
    let db = test_db().await;
    let user_id = test_user(&db, "strength@user.io").await;

    let workout = db
        .create_strength_workout(
            user_id,
            NewStrengthWorkout {
                date: Utc::now(),
                name: "Push day".into(),
                exercises: vec![Exercise {
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
                }],
                duration_minutes: 45,
                rpe: Some(8),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(workout.total_volume, 655.0);

    let records = db.personal_records(user_id).await.unwrap();
    let best = records.max_weight.get("Bench press").unwrap();
    assert_eq!(best.weight, 85.0);
    let best_volume = records.max_volume.get("Bench press").unwrap();
    assert_eq!(best_volume.volume, 400.0);

    let stats = db.strength_stats(user_id).await.unwrap();
    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.total_volume, 655.0);
    assert_eq!(stats.exercise_progress.len(), 1);
    assert_eq!(stats.exercise_progress[0].total_sets, 2);
    assert_eq!(stats.recent_workout_count, 1);
}

#[tokio::test]
async fn cardio_stats_group_by_activity() {
    let db = test_db().await;
    let user_id = test_user(&db, "cardio@user.io").await;

    for (activity, distance) in [("running", 5.0), ("running", 10.0), ("cycling", 40.0)] {
        db.create_cardio_workout(
            user_id,
            NewCardioWorkout {
                date: Utc::now(),
                activity: activity.into(),
                distance,
                duration_minutes: 30,
                pace: None,
                calories: Some(300),
                location: None,
            },
        )
        .await
        .unwrap();
    }

    let stats = db.cardio_stats(user_id).await.unwrap();
    assert_eq!(stats.total_sessions, 3);
    assert_eq!(stats.total_distance, 55.0);
    assert_eq!(stats.total_calories, 900);
    assert_eq!(stats.by_activity.get("running"), Some(&2));
    assert_eq!(stats.by_activity.get("cycling"), Some(&1));
}

#[tokio::test]
async fn weekly_schedule_replace_is_atomic() {
    let db = test_db().await;
    let user_id = test_user(&db, "schedule@user.io").await;
    let week = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();

    let first = vec![
        NewScheduleEntry {
            day: Weekday::Wed,
            session_type: SessionType::Cardio,
            details: "Easy run".into(),
            exercises: Vec::new(),
        },
        NewScheduleEntry {
            day: Weekday::Mon,
            session_type: SessionType::Strength,
            details: "Push day".into(),
            exercises: Vec::new(),
        },
    ];

    let saved = db
        .replace_weekly_schedule(user_id, week, first)
        .await
        .unwrap();
    assert_eq!(saved.len(), 2);
    // Sorted Monday-first regardless of posting order
    assert_eq!(saved[0].day, Weekday::Mon);

    // Replacing drops the old entries for the week
    let second = vec![NewScheduleEntry {
        day: Weekday::Fri,
        session_type: SessionType::Rest,
        details: "Full rest".into(),
        exercises: Vec::new(),
    }];
    db.replace_weekly_schedule(user_id, week, second)
        .await
        .unwrap();

    let stored = db.get_weekly_schedule(user_id, Some(week)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].day, Weekday::Fri);

    // A different week is untouched
    let other_week = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
    let other = db
        .get_weekly_schedule(user_id, Some(other_week))
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn recommended_plans_filter_by_level() {
    let db = test_db().await;

    for (title, level) in [
        ("Starting strength", trainlog_server::models::PlanLevel::Beginner),
        ("Hypertrophy block", trainlog_server::models::PlanLevel::Bodybuilding),
    ] {
        db.create_recommended_plan(trainlog_server::database::NewRecommendedPlan {
            title: title.into(),
            description: "desc".into(),
            video_url: "https://videos.example/embed/1".into(),
            full_url: "https://videos.example/watch/1".into(),
            level,
            duration: "45 minutes".into(),
            equipment: vec!["barbell".into()],
            tags: vec!["compound".into()],
        })
        .await
        .unwrap();
    }

    let all = db.list_recommended_plans(None, 10).await.unwrap();
    assert_eq!(all.len(), 2);

    let beginner = db
        .list_recommended_plans(Some(trainlog_server::models::PlanLevel::Beginner), 10)
        .await
        .unwrap();
    assert_eq!(beginner.len(), 1);
    assert_eq!(beginner[0].title, "Starting strength");
}

#[tokio::test]
async fn file_backed_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("trainlog.db").display());

    let user_id = {
        let db = Database::new(&url).await.unwrap();
        let user_id = test_user(&db, "persist@user.io").await;
        db.create_goal(user_id, bench_goal(GoalDirection::Ascending))
            .await
            .unwrap();
        user_id
    };

    let reopened = Database::new(&url).await.unwrap();
    let page = reopened
        .list_goals(user_id, &GoalFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total_goals, 1);
    assert_eq!(page.goals[0].name, "Bench press 100kg");
}

#[tokio::test]
async fn deleting_a_goal_drops_its_history() {
    let db = test_db().await;
    let user_id = test_user(&db, "cascade@user.io").await;

    let goal = db
        .create_goal(user_id, bench_goal(GoalDirection::Ascending))
        .await
        .unwrap();
    db.add_goal_progress(
        user_id,
        goal.id,
        ProgressEntry {
            date: Utc::now(),
            value: 85.0,
            notes: String::new(),
        },
    )
    .await
    .unwrap();

    assert!(db.delete_goal(user_id, goal.id).await.unwrap());

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goal_history WHERE goal_id = $1")
        .bind(goal.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}
