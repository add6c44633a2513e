// ABOUTME: Goal progress computation shared by persistence hooks and form previews
// ABOUTME: Maps start/current/target values plus a direction into a clamped 0-100 percentage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

//! Goal progress computation
//!
//! A goal's `progress` field is a derived view, never state: it is recomputed
//! from `(start_value, current, target, direction)` on every write that touches
//! one of those fields, and on the fly for unsaved form previews. Both call
//! sites go through this module so stored and displayed percentages cannot
//! drift apart.

use serde::{Deserialize, Serialize};

/// Whether progress is measured by the current value rising or falling
/// relative to the start value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    /// Current value should rise from the start toward the target
    /// (lifting more weight, running farther).
    #[default]
    Ascending,
    /// Current value should fall from the start toward the target
    /// (weight loss, faster pace in seconds).
    Descending,
}

impl GoalDirection {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "descending" => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

impl std::fmt::Display for GoalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input record for the progress computation.
///
/// One named type shared by every caller, so the persistence layer and the
/// preview endpoint cannot silently disagree about field meaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgressInput {
    /// Value at goal creation (baseline)
    #[serde(default)]
    pub start_value: f64,
    /// Most recently recorded value
    #[serde(default)]
    pub current: f64,
    /// Value that defines completion
    #[serde(default)]
    pub target: f64,
    /// Direction of progress
    #[serde(default)]
    pub direction: GoalDirection,
}

impl GoalProgressInput {
    /// Create a progress input from raw goal fields
    #[must_use]
    pub const fn new(start_value: f64, current: f64, target: f64, direction: GoalDirection) -> Self {
        Self {
            start_value,
            current,
            target,
            direction,
        }
    }
}

/// Treat malformed numeric input (NaN, infinities, negatives) as 0.
///
/// Goal values are non-negative by contract; anything else reaching this
/// function came from an unvalidated source and must not poison the result.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Compute a goal's completion percentage, clamped to [0, 100].
///
/// Never fails: a target that is unreachable in the stated direction from the
/// stated start (a degenerate range) resolves to a binary 0 or 100 instead of
/// dividing by zero. Every division is guarded by the corresponding
/// degenerate-range branch.
#[must_use]
pub fn compute_progress(input: GoalProgressInput) -> f64 {
    let start = sanitize(input.start_value);
    let current = sanitize(input.current);
    let target = sanitize(input.target);

    let percentage = match input.direction {
        GoalDirection::Descending => {
            let total_to_lose = start - target;
            if total_to_lose <= 0.0 {
                // Degenerate range: target at or above start.
                if current <= target {
                    100.0
                } else {
                    0.0
                }
            } else {
                let lost_so_far = start - current;
                (lost_so_far / total_to_lose) * 100.0
            }
        }
        GoalDirection::Ascending => {
            let span = target - start;
            if start <= 0.0 && target > 0.0 {
                // No meaningful baseline offset: simple ratio against target.
                (current / target) * 100.0
            } else if span > 0.0 {
                ((current - start) / span) * 100.0
            } else if current >= target {
                // Degenerate range: target at or below start.
                100.0
            } else {
                0.0
            }
        }
    };

    percentage.clamp(0.0, 100.0)
}

/// Compute the authoritative progress value persisted on the goal record.
///
/// Rounded to the nearest integer. The preview endpoint returns this same
/// value, so the stored and displayed percentages are identical by
/// construction.
#[must_use]
pub fn compute_progress_rounded(input: GoalProgressInput) -> u8 {
    // Safe: compute_progress is clamped to [0, 100]
    compute_progress(input).round() as u8
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    fn ascending(start: f64, current: f64, target: f64) -> GoalProgressInput {
        GoalProgressInput::new(start, current, target, GoalDirection::Ascending)
    }

    fn descending(start: f64, current: f64, target: f64) -> GoalProgressInput {
        GoalProgressInput::new(start, current, target, GoalDirection::Descending)
    }

    #[test]
    fn start_equals_current_is_zero_percent() {
        assert_eq!(compute_progress(ascending(80.0, 80.0, 100.0)), 0.0);
    }

    #[test]
    fn current_equals_target_is_complete() {
        assert_eq!(compute_progress(ascending(80.0, 100.0, 100.0)), 100.0);
    }

    #[test]
    fn ascending_midpoint() {
        assert_eq!(compute_progress(ascending(80.0, 90.0, 100.0)), 50.0);
    }

    #[test]
    fn descending_midpoint_weight_loss() {
        // Lost 10 of the 20 needed
        assert_eq!(compute_progress(descending(90.0, 80.0, 70.0)), 50.0);
    }

    #[test]
    fn descending_degenerate_already_met() {
        // Target at or above start, current at or below target
        assert_eq!(compute_progress(descending(70.0, 65.0, 80.0)), 100.0);
    }

    #[test]
    fn descending_degenerate_not_met() {
        // Target at or above start but current still above it
        assert_eq!(compute_progress(descending(70.0, 85.0, 80.0)), 0.0);
    }

    #[test]
    fn overshoot_clamps_to_hundred() {
        assert_eq!(compute_progress(ascending(0.0, 150.0, 100.0)), 100.0);
    }

    #[test]
    fn regression_below_start_clamps_to_zero() {
        assert_eq!(compute_progress(ascending(80.0, 60.0, 100.0)), 0.0);
        assert_eq!(compute_progress(descending(90.0, 95.0, 70.0)), 0.0);
    }

    #[test]
    fn zero_start_simple_ratio() {
        assert_eq!(compute_progress(ascending(0.0, 25.0, 50.0)), 50.0);
    }

    #[test]
    fn ascending_degenerate_target_below_start() {
        assert_eq!(compute_progress(ascending(100.0, 100.0, 80.0)), 100.0);
        assert_eq!(compute_progress(ascending(100.0, 50.0, 80.0)), 0.0);
    }

    #[test]
    fn all_zero_inputs_are_zero_percent() {
        assert_eq!(compute_progress(ascending(0.0, 0.0, 0.0)), 0.0);
        // Descending all-zero: target >= start and current <= target
        assert_eq!(compute_progress(descending(0.0, 0.0, 0.0)), 100.0);
    }

    #[test]
    fn malformed_inputs_never_escape_bounds() {
        let weird = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -5.0, 0.0, 42.0];
        for &start in &weird {
            for &current in &weird {
                for &target in &weird {
                    for direction in [GoalDirection::Ascending, GoalDirection::Descending] {
                        let pct = compute_progress(GoalProgressInput::new(
                            start, current, target, direction,
                        ));
                        assert!(
                            (0.0..=100.0).contains(&pct),
                            "out of bounds: {pct} for ({start}, {current}, {target}, {direction})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let input = descending(90.0, 82.5, 70.0);
        assert_eq!(compute_progress(input), compute_progress(input));
        assert_eq!(
            compute_progress_rounded(input),
            compute_progress_rounded(input)
        );
    }

    #[test]
    fn rounded_value_rounds_to_nearest() {
        // 1/3 of the way: 33.33.. rounds down
        assert_eq!(compute_progress_rounded(ascending(0.0, 1.0, 3.0)), 33);
        // 2/3 of the way: 66.66.. rounds up
        assert_eq!(compute_progress_rounded(ascending(0.0, 2.0, 3.0)), 67);
    }

    #[test]
    fn direction_round_trips_through_strings() {
        assert_eq!(GoalDirection::parse("descending"), GoalDirection::Descending);
        assert_eq!(GoalDirection::parse("ascending"), GoalDirection::Ascending);
        // Unknown strings fall back to the default direction
        assert_eq!(GoalDirection::parse("sideways"), GoalDirection::Ascending);
    }
}
