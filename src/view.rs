//! Read-only snapshots for the rendering and presentation layers
//!
//! Built from `GameState` after each frame. Nothing here feeds back into the
//! simulation.

use glam::Vec3;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, ObstaclePhase};
use crate::tuning::Tuning;

/// Emissive intensity with the world standing still
const EMISSIVE_BASE: f32 = 0.2;
/// Scroll speed at which the player glow saturates
const EMISSIVE_FULL_SPEED: f32 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec3,
    pub radius: f32,
    /// Glow strength in `[0, 1]`, rising with speed
    pub emissive: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub pos: Vec3,
    pub size: Vec3,
    pub phase: ObstaclePhase,
    /// Landing flash in `[0, 1]`; always 0 when flashes are disabled
    pub flash: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedLineView {
    pub pos: Vec3,
    pub length: f32,
    pub opacity: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub speed_lines: Vec<SpeedLineView>,
    pub rain: Vec<Vec3>,
    pub lane_positions: [f32; 3],
    pub theme: u32,
}

impl FrameView {
    pub fn capture(state: &GameState, tuning: &Tuning, settings: &Settings) -> Self {
        let speed = if state.phase == GamePhase::Running || state.phase == GamePhase::Paused {
            state.difficulty.fall_speed
        } else {
            0.0
        };
        let flash_enabled = settings.effective_impact_flash();

        Self {
            phase: state.phase,
            player: PlayerView {
                pos: state.player_pos(tuning),
                radius: tuning.player_radius,
                emissive: emissive_for_speed(speed),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    pos: o.pos,
                    size: o.size,
                    phase: o.phase,
                    flash: if flash_enabled { o.impact_flash } else { 0.0 },
                })
                .collect(),
            speed_lines: state
                .effects
                .speed_lines
                .iter()
                .map(|l| SpeedLineView {
                    pos: l.pos,
                    length: l.length,
                    opacity: l.opacity(),
                })
                .collect(),
            rain: state.effects.rain.iter().map(|r| r.pos).collect(),
            lane_positions: tuning.lane_positions,
            theme: state.theme,
        }
    }
}

/// Player glow for a given scroll speed
pub fn emissive_for_speed(speed: f32) -> f32 {
    let t = (speed / EMISSIVE_FULL_SPEED).clamp(0.0, 1.0);
    EMISSIVE_BASE + (1.0 - EMISSIVE_BASE) * t
}

/// What the HUD shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub top_score: u64,
    pub phase: GamePhase,
    pub overlay_message: Option<String>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let overlay_message = match state.phase {
            GamePhase::Idle => Some("Press Space or tap to start".to_string()),
            GamePhase::Running => None,
            GamePhase::Paused => Some("Paused".to_string()),
            GamePhase::GameOver => Some(format!(
                "Game over! Score {}. Press Space or tap to restart",
                state.display_score()
            )),
        };

        Self {
            score: state.display_score(),
            top_score: state.top_score,
            phase: state.phase,
            overlay_message,
        }
    }
}
