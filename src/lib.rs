//! Lane Dash - A three-lane dodge arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (lanes, spawning, physics, collisions, run state)
//! - `clock`: Frame clock that turns host timestamps into clamped deltas
//! - `game`: Host-agnostic driver tying the clock, sim and top-score store together
//! - `view`: Read-only snapshots for the renderer and the HUD
//! - `input`: Key and swipe mapping onto intents
//! - `topscore`: Top score persistence
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences for ambient effects

pub mod clock;
pub mod error;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;
pub mod topscore;
pub mod tuning;
pub mod view;

pub use clock::FrameClock;
pub use error::StoreError;
pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use topscore::{MemoryStore, TopScoreStore};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single frame delta (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Fixed step used by headless runs and tests (60 Hz)
    pub const HEADLESS_DT: f32 = 1.0 / 60.0;

    /// World-space X of each lane, left to right
    pub const LANE_POSITIONS: [f32; 3] = [-2.5, 0.0, 2.5];
    /// Lane the player starts every run in
    pub const CENTER_LANE: usize = 1;
    /// Seconds to ease between two lanes
    pub const LANE_CHANGE_DURATION: f32 = 0.15;

    /// Player sphere rests on the ground at this height
    pub const PLAYER_Y: f32 = 0.7;
    /// Player depth plane (obstacles slide toward +Z)
    pub const PLAYER_Z: f32 = 0.0;
    /// Collision sphere radius
    pub const PLAYER_RADIUS: f32 = 0.7;

    /// Ground plane height
    pub const GROUND_Y: f32 = 0.0;
    /// Downward acceleration on falling obstacles (units/s²)
    pub const GRAVITY: f32 = -25.0;
    /// Fraction of the scroll distance applied to obstacles while they fall
    pub const FALL_FORWARD_BIAS: f32 = 0.3;
    /// Obstacles past this Z (behind the player) are destroyed
    pub const OBSTACLE_REMOVE_Z: f32 = 6.0;

    /// Spawn height above ground
    pub const SPAWN_HEIGHT_MIN: f32 = 8.0;
    pub const SPAWN_HEIGHT_MAX: f32 = 11.0;
    /// Spawn distance ahead of the player
    pub const SPAWN_DISTANCE_MIN: f32 = 40.0;
    pub const SPAWN_DISTANCE_MAX: f32 = 60.0;

    /// Obstacle extents: base + uniform(0,1) * range * size factor
    pub const OBSTACLE_BASE_SIZE: [f32; 3] = [1.2, 1.0, 1.0];
    pub const OBSTACLE_SIZE_RANGE: [f32; 3] = [1.0, 1.5, 1.0];
    /// Size factor = min(cap, base + difficulty * per_level)
    pub const SIZE_FACTOR_BASE: f32 = 0.8;
    pub const SIZE_FACTOR_PER_LEVEL: f32 = 0.1;
    pub const SIZE_FACTOR_CAP: f32 = 2.0;
    /// Every Nth spawned obstacle rotates the lane colour theme
    pub const THEME_ROTATION_PERIOD: u32 = 10;

    /// Difficulty level = base + growth * running seconds
    pub const DIFFICULTY_BASE: f32 = 1.0;
    pub const DIFFICULTY_GROWTH: f32 = 0.03;
    /// Fall (scroll) speed = base + per_level * difficulty
    pub const SPEED_BASE: f32 = 6.0;
    pub const SPEED_PER_LEVEL: f32 = 4.0;
    /// Spawn interval = max(min, base - per_level * difficulty)
    pub const SPAWN_INTERVAL_BASE: f32 = 1.2;
    pub const SPAWN_INTERVAL_PER_LEVEL: f32 = 0.05;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.5;
    /// Score rate = base + per_level * difficulty (points per second)
    pub const SCORE_RATE_BASE: f32 = 8.0;
    pub const SCORE_RATE_PER_LEVEL: f32 = 2.0;

    /// Speed lines
    pub const SPEED_LINE_LIFE_MIN: f32 = 0.25;
    pub const SPEED_LINE_LIFE_MAX: f32 = 0.45;
    /// Speed lines travel this many times the scroll distance
    pub const SPEED_LINE_STRETCH: f32 = 2.5;
    /// Lines emitted by one lane-change burst
    pub const SPEED_LINE_BURST: u32 = 6;
    /// Above this scroll speed a steady trickle of lines is emitted
    pub const SPEED_LINE_FAST_THRESHOLD: f32 = 14.0;
    /// Seconds between trickle emissions at high speed
    pub const SPEED_LINE_TRICKLE_INTERVAL: f32 = 0.08;

    /// Rain streaks
    pub const RAIN_SPAWN_INTERVAL: f32 = 0.03;
    pub const RAIN_SPEED_MIN: f32 = 30.0;
    pub const RAIN_SPEED_MAX: f32 = 45.0;
    pub const RAIN_SPAWN_Z: f32 = -60.0;
    /// Rain streaks past this Z are destroyed
    pub const RAIN_REMOVE_Z: f32 = 8.0;
    pub const RAIN_SPREAD_X: f32 = 12.0;
    pub const RAIN_HEIGHT_MIN: f32 = 0.5;
    pub const RAIN_HEIGHT_MAX: f32 = 9.0;

    /// Impact flash decay (intensity per second)
    pub const IMPACT_FLASH_DECAY: f32 = 4.0;
}

/// Smoothstep easing `t²(3 − 2t)` for `t` in `[0, 1]`
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
