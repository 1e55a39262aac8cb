//! Simulation core
//!
//! All gameplay logic lives here. This module must stay free of host concerns:
//! - `dt` is supplied by the caller and clamped on entry
//! - Seeded RNG only, injected per call
//! - Stable iteration order (obstacles ordered by ID)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod lane;
pub mod physics;
pub mod run;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{check_collisions, closest_point_on_aabb, first_hit, sphere_aabb_intersects};
pub use difficulty::{DifficultyCurve, DifficultyParams};
pub use effects::{EffectsState, EffectsTuning, RainStreak, SpeedLine};
pub use lane::{LaneDir, LaneState};
pub use physics::{PhysicsReport, forward_distance, integrate_obstacles};
pub use spawner::{Spawned, Spawner, spawn_obstacle};
pub use state::{GameEvent, GamePhase, GameState, Intent, Obstacle, ObstaclePhase, ObstacleSet};
pub use tick::tick;
