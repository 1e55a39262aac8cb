//! Difficulty curve
//!
//! Difficulty is a pure function of seconds spent in the running phase. Speed,
//! spawn interval and score rate are all derived from the resulting level.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Linear difficulty curve and the quantities derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurve {
    /// Level at zero running time
    pub base: f32,
    /// Level gained per running second
    pub growth: f32,
    pub speed_base: f32,
    pub speed_per_level: f32,
    pub spawn_base: f32,
    pub spawn_per_level: f32,
    /// Spawn interval floor (seconds)
    pub spawn_min: f32,
    pub score_base: f32,
    pub score_per_level: f32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            base: DIFFICULTY_BASE,
            growth: DIFFICULTY_GROWTH,
            speed_base: SPEED_BASE,
            speed_per_level: SPEED_PER_LEVEL,
            spawn_base: SPAWN_INTERVAL_BASE,
            spawn_per_level: SPAWN_INTERVAL_PER_LEVEL,
            spawn_min: SPAWN_INTERVAL_MIN,
            score_base: SCORE_RATE_BASE,
            score_per_level: SCORE_RATE_PER_LEVEL,
        }
    }
}

/// Snapshot of the derived quantities at one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyParams {
    pub level: f32,
    /// World scroll speed toward the player (units/s)
    pub fall_speed: f32,
    pub spawn_interval_secs: f32,
    /// Points per running second
    pub score_rate: f32,
}

impl DifficultyCurve {
    /// Difficulty level after `elapsed` running seconds
    #[inline]
    pub fn level(&self, elapsed: f32) -> f32 {
        self.base + self.growth * elapsed.max(0.0)
    }

    #[inline]
    pub fn fall_speed(&self, level: f32) -> f32 {
        self.speed_base + self.speed_per_level * level
    }

    /// Seconds between spawns, never below `spawn_min`
    #[inline]
    pub fn spawn_interval(&self, level: f32) -> f32 {
        (self.spawn_base - self.spawn_per_level * level).max(self.spawn_min)
    }

    #[inline]
    pub fn score_rate(&self, level: f32) -> f32 {
        self.score_base + self.score_per_level * level
    }

    pub fn params(&self, elapsed: f32) -> DifficultyParams {
        let level = self.level(elapsed);
        DifficultyParams {
            level,
            fall_speed: self.fall_speed(level),
            spawn_interval_secs: self.spawn_interval(level),
            score_rate: self.score_rate(level),
        }
    }

    /// Keep the curve non-decreasing and the spawn floor positive
    pub fn sanitized(mut self) -> Self {
        self.growth = self.growth.max(0.0);
        self.spawn_per_level = self.spawn_per_level.max(0.0);
        self.spawn_min = self.spawn_min.max(0.05);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_curve_values() {
        let curve = DifficultyCurve::default();
        assert_eq!(curve.level(0.0), 1.0);
        assert!((curve.level(100.0) - 4.0).abs() < 1e-5);
        assert_eq!(curve.fall_speed(1.0), 10.0);
        assert!((curve.spawn_interval(1.0) - 1.15).abs() < 1e-6);
        assert_eq!(curve.score_rate(1.0), 10.0);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let curve = DifficultyCurve::default();
        // 1.2 - 0.05 * 14 = 0.5
        assert!((curve.spawn_interval(14.0) - 0.5).abs() < 1e-6);
        assert_eq!(curve.spawn_interval(100.0), 0.5);
    }

    #[test]
    fn test_negative_elapsed_clamped() {
        let curve = DifficultyCurve::default();
        assert_eq!(curve.level(-5.0), curve.base);
    }

    proptest! {
        #[test]
        fn prop_level_non_decreasing(t in 0.0f32..10_000.0, dt in 0.0f32..1.0) {
            let curve = DifficultyCurve::default();
            prop_assert!(curve.level(t + dt) >= curve.level(t));
        }

        #[test]
        fn prop_spawn_interval_monotone_and_bounded(d in 0.0f32..1_000.0, step in 0.0f32..10.0) {
            let curve = DifficultyCurve::default();
            let a = curve.spawn_interval(d);
            let b = curve.spawn_interval(d + step);
            prop_assert!(b <= a);
            prop_assert!(a >= 0.5);
            prop_assert!(b >= 0.5);
        }
    }
}
