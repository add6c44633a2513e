// ABOUTME: Integration tests for the goal progress calculator
// ABOUTME: Covers direction semantics, degenerate ranges, clamping, and rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use trainlog_server::progress::{
    compute_progress, compute_progress_rounded, GoalDirection, GoalProgressInput,
};

fn input(start: f64, current: f64, target: f64, direction: GoalDirection) -> GoalProgressInput {
    GoalProgressInput::new(start, current, target, direction)
}

#[test]
fn bounded_for_a_grid_of_inputs() {
    let values = [0.0, 0.5, 1.0, 10.0, 80.0, 100.0, 1_000.0, 1.0e12];
    for &start in &values {
        for &current in &values {
            for &target in &values {
                for direction in [GoalDirection::Ascending, GoalDirection::Descending] {
                    let pct = compute_progress(input(start, current, target, direction));
                    assert!(
                        (0.0..=100.0).contains(&pct),
                        "({start}, {current}, {target}, {direction}) produced {pct}"
                    );
                    assert!(pct.is_finite());
                }
            }
        }
    }
}

#[test]
fn ascending_baseline_cases() {
    // Start equals current: no progress yet
    assert_eq!(
        compute_progress(input(80.0, 80.0, 100.0, GoalDirection::Ascending)),
        0.0
    );
    // Current equals target: complete
    assert_eq!(
        compute_progress(input(80.0, 100.0, 100.0, GoalDirection::Ascending)),
        100.0
    );
    // Halfway through the span
    assert_eq!(
        compute_progress(input(80.0, 90.0, 100.0, GoalDirection::Ascending)),
        50.0
    );
}

#[test]
fn descending_weight_loss_midpoint() {
    // Lost 10 of the 20 needed
    assert_eq!(
        compute_progress(input(90.0, 80.0, 70.0, GoalDirection::Descending)),
        50.0
    );
}

#[test]
fn descending_degenerate_range_checks_current() {
    // Target at or above start: binary outcome decided by current vs target
    assert_eq!(
        compute_progress(input(70.0, 65.0, 80.0, GoalDirection::Descending)),
        100.0
    );
    assert_eq!(
        compute_progress(input(70.0, 85.0, 80.0, GoalDirection::Descending)),
        0.0
    );
}

#[test]
fn overshoot_clamps_to_hundred() {
    assert_eq!(
        compute_progress(input(0.0, 150.0, 100.0, GoalDirection::Ascending)),
        100.0
    );
    assert_eq!(
        compute_progress(input(90.0, 50.0, 70.0, GoalDirection::Descending)),
        100.0
    );
}

#[test]
fn zero_start_uses_simple_ratio() {
    assert_eq!(
        compute_progress(input(0.0, 25.0, 50.0, GoalDirection::Ascending)),
        50.0
    );
}

#[test]
fn idempotent_across_repeated_calls() {
    let probe = input(63.5, 71.25, 92.0, GoalDirection::Ascending);
    let first = compute_progress(probe);
    for _ in 0..100 {
        assert_eq!(compute_progress(probe), first);
    }
}

#[test]
fn rounded_value_is_an_integer_percentage() {
    let probe = input(0.0, 1.0, 3.0, GoalDirection::Ascending);
    assert_eq!(compute_progress_rounded(probe), 33);
    assert!(compute_progress_rounded(probe) <= 100);
}

#[test]
fn default_direction_is_ascending() {
    let parsed: GoalProgressInput = serde_json::from_str(
        r#"{ "start_value": 0, "current": 25, "target": 50 }"#,
    )
    .unwrap();
    assert_eq!(parsed.direction, GoalDirection::Ascending);
    assert_eq!(compute_progress(parsed), 50.0);
}

#[test]
fn missing_numeric_fields_default_to_zero() {
    let parsed: GoalProgressInput = serde_json::from_str(r#"{ "direction": "ascending" }"#).unwrap();
    assert_eq!(compute_progress(parsed), 0.0);
}
