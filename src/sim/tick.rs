//! Per-frame simulation step
//!
//! `tick` applies queued intents, clamps `dt`, then, while running, advances
//! difficulty, lane, spawner, physics and collision in that order.

use super::collision::first_hit;
use super::physics::integrate_obstacles;
use super::state::{GameEvent, GamePhase, GameState, Intent};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, intents: &[Intent], dt: f32, tuning: &Tuning, settings: &Settings) {
    for &intent in intents {
        state.apply(intent, tuning);
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, tuning.max_frame_dt)
    } else {
        0.0
    };

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::Idle | GamePhase::GameOver => {
            // Background keeps drifting between runs
            state.effects.update(
                dt,
                state.difficulty.fall_speed,
                false,
                state.lane.position_x,
                &tuning.effects,
                settings,
                &mut state.effects_rng,
            );
            return;
        }
        GamePhase::Running => {}
    }

    // Difficulty and score
    state.elapsed_difficulty_time += dt;
    state.difficulty = tuning.difficulty.params(state.elapsed_difficulty_time);
    state.score += dt * state.difficulty.score_rate;
    let speed = state.difficulty.fall_speed;

    // Lane
    state.lane.advance(dt);

    // Spawner
    let spawned = state.spawner.try_spawn(
        dt,
        state.difficulty.level,
        tuning,
        &mut state.rng,
        || state.obstacles.allocate_id(),
    );
    if let Some(spawned) = spawned {
        let obstacle = spawned.obstacle;
        log::debug!(
            "Spawned obstacle {} in lane {} at z={:.1}",
            obstacle.id,
            obstacle.lane,
            obstacle.pos.z
        );
        state.events.push(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            lane: obstacle.lane,
        });
        state.obstacles.insert(obstacle);

        if spawned.rotate_theme {
            state.theme += 1;
            state.events.push(GameEvent::ThemeRotated { theme: state.theme });
            log::info!("Lane theme rotated to {}", state.theme);
        }
    }

    // Physics
    let report = integrate_obstacles(&mut state.obstacles, dt, speed, tuning);
    for id in report.landed {
        log::debug!("Obstacle {} landed", id);
        state.events.push(GameEvent::ObstacleLanded { id });
    }
    state.effects.update(
        dt,
        speed,
        true,
        state.lane.position_x,
        &tuning.effects,
        settings,
        &mut state.effects_rng,
    );

    // Collision
    let player = state.player_pos(tuning);
    if let Some(hit) = first_hit(player, tuning.player_radius, state.obstacles.as_slice()) {
        state.end_run(hit);
    }
}
