//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be rebalanced from JSON
//! without touching the simulation. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::difficulty::DifficultyCurve;
use crate::sim::effects::EffectsTuning;

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lanes ===
    /// World-space X of each lane, left to right
    pub lane_positions: [f32; 3],
    /// Seconds to ease between two lanes
    pub lane_change_duration: f32,

    // === Player ===
    pub player_y: f32,
    pub player_z: f32,
    /// Collision sphere radius
    pub player_radius: f32,

    // === Frame ===
    /// Upper bound on a single frame delta (seconds)
    pub max_frame_dt: f32,

    // === Obstacle physics ===
    pub ground_y: f32,
    /// Vertical acceleration while falling (negative is down)
    pub gravity: f32,
    /// Fraction of the scroll distance applied while falling.
    /// Landed obstacles move at the full scroll speed, so this sets how hard
    /// the speed jump on landing reads.
    pub fall_forward_bias: f32,
    /// Obstacles whose Z passes this are destroyed
    pub obstacle_remove_z: f32,

    // === Spawning ===
    /// Drop height above ground, `[min, max]`
    pub spawn_height: [f32; 2],
    /// Distance ahead of the player, `[min, max]`
    pub spawn_distance: [f32; 2],
    /// Base width/height/depth
    pub obstacle_base_size: [f32; 3],
    /// Random extra width/height/depth (scaled by the size factor)
    pub obstacle_size_range: [f32; 3],
    pub size_factor_base: f32,
    pub size_factor_per_level: f32,
    /// Size factor never exceeds this
    pub size_factor_cap: f32,
    /// Every Nth spawn rotates the lane theme
    pub theme_rotation_period: u32,

    // === Curves ===
    pub difficulty: DifficultyCurve,
    pub effects: EffectsTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_positions: LANE_POSITIONS,
            lane_change_duration: LANE_CHANGE_DURATION,

            player_y: PLAYER_Y,
            player_z: PLAYER_Z,
            player_radius: PLAYER_RADIUS,

            max_frame_dt: MAX_FRAME_DT,

            ground_y: GROUND_Y,
            gravity: GRAVITY,
            fall_forward_bias: FALL_FORWARD_BIAS,
            obstacle_remove_z: OBSTACLE_REMOVE_Z,

            spawn_height: [SPAWN_HEIGHT_MIN, SPAWN_HEIGHT_MAX],
            spawn_distance: [SPAWN_DISTANCE_MIN, SPAWN_DISTANCE_MAX],
            obstacle_base_size: OBSTACLE_BASE_SIZE,
            obstacle_size_range: OBSTACLE_SIZE_RANGE,
            size_factor_base: SIZE_FACTOR_BASE,
            size_factor_per_level: SIZE_FACTOR_PER_LEVEL,
            size_factor_cap: SIZE_FACTOR_CAP,
            theme_rotation_period: THEME_ROTATION_PERIOD,

            difficulty: DifficultyCurve::default(),
            effects: EffectsTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Parse tuning from JSON, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Obstacle size multiplier at a difficulty level
    #[inline]
    pub fn size_factor(&self, difficulty: f32) -> f32 {
        (self.size_factor_base + difficulty * self.size_factor_per_level).min(self.size_factor_cap)
    }

    /// Lane X position, `None` when the index is off the table
    #[inline]
    pub fn lane_x(&self, index: usize) -> Option<f32> {
        self.lane_positions.get(index).copied()
    }

    /// Clamp values that would stall or explode the simulation
    pub fn sanitized(mut self) -> Self {
        fn order(range: &mut [f32; 2]) {
            if range[0] > range[1] {
                range.swap(0, 1);
            }
        }

        order(&mut self.spawn_height);
        order(&mut self.spawn_distance);
        self.lane_change_duration = self.lane_change_duration.max(1e-3);
        self.max_frame_dt = self.max_frame_dt.max(1e-3);
        self.player_radius = self.player_radius.max(0.0);
        self.theme_rotation_period = self.theme_rotation_period.max(1);
        self.difficulty = self.difficulty.sanitized();
        self.effects = self.effects.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_factor_caps_at_double() {
        let tuning = Tuning::default();
        assert!((tuning.size_factor(1.0) - 0.9).abs() < 1e-6);
        assert_eq!(tuning.size_factor(12.0), 2.0);
        assert_eq!(tuning.size_factor(500.0), 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": -30.0 }"#).unwrap();
        assert_eq!(tuning.gravity, -30.0);
        assert_eq!(tuning.lane_positions, LANE_POSITIONS);
        assert_eq!(tuning.difficulty, DifficultyCurve::default());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitize_orders_ranges() {
        let tuning = Tuning::from_json(
            r#"{ "spawn_height": [11.0, 8.0], "theme_rotation_period": 0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.spawn_height, [8.0, 11.0]);
        assert_eq!(tuning.theme_rotation_period, 1);
    }
}
