//! Obstacle integration
//!
//! Falling obstacles accelerate under gravity and drift forward at a fraction
//! of the scroll speed. On touching the ground they clamp to their resting
//! height, switch to Landed and from then on slide at the full scroll speed.

use super::state::{ObstaclePhase, ObstacleSet};
use crate::consts::IMPACT_FLASH_DECAY;
use crate::tuning::Tuning;

/// What happened to the obstacle set during one integration step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicsReport {
    /// Obstacles that landed this step (impact cues)
    pub landed: Vec<u32>,
    /// Obstacles destroyed after scrolling past the player
    pub removed: usize,
}

/// Scroll distance covered this frame
#[inline]
pub fn forward_distance(speed: f32, dt: f32) -> f32 {
    speed * dt
}

/// Advance every obstacle by `dt` at scroll `speed`, then destroy the ones
/// that have passed the removal plane.
pub fn integrate_obstacles(
    obstacles: &mut ObstacleSet,
    dt: f32,
    speed: f32,
    tuning: &Tuning,
) -> PhysicsReport {
    let mut report = PhysicsReport::default();
    let forward = forward_distance(speed, dt);

    for obstacle in obstacles.iter_mut() {
        match obstacle.phase {
            ObstaclePhase::Falling => {
                obstacle.vel_y += tuning.gravity * dt;
                obstacle.pos.y += obstacle.vel_y * dt;
                obstacle.pos.z += forward * tuning.fall_forward_bias;

                let rest = obstacle.resting_y(tuning.ground_y);
                if obstacle.pos.y <= rest {
                    obstacle.pos.y = rest;
                    obstacle.vel_y = 0.0;
                    obstacle.phase = ObstaclePhase::Landed;
                    obstacle.impact_flash = 1.0;
                    report.landed.push(obstacle.id);
                }
            }
            ObstaclePhase::Landed => {
                obstacle.pos.z += forward;
                obstacle.impact_flash = (obstacle.impact_flash - IMPACT_FLASH_DECAY * dt).max(0.0);
            }
        }
    }

    report.removed = obstacles.retain(|o| o.pos.z <= tuning.obstacle_remove_z);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use glam::Vec3;
    use proptest::prelude::*;

    fn falling(id: u32, y: f32, z: f32, height: f32) -> Obstacle {
        Obstacle {
            id,
            lane: 1,
            size: Vec3::new(1.5, height, 1.0),
            pos: Vec3::new(0.0, y, z),
            vel_y: 0.0,
            phase: ObstaclePhase::Falling,
            impact_flash: 0.0,
        }
    }

    #[test]
    fn test_falls_then_lands_once() {
        let tuning = Tuning::default();
        let mut set = ObstacleSet::new();
        set.insert(falling(1, 10.0, -50.0, 2.0));

        let mut landings = 0;
        for _ in 0..120 {
            let report = integrate_obstacles(&mut set, 1.0 / 60.0, 10.0, &tuning);
            landings += report.landed.len();
        }
        assert_eq!(landings, 1);

        let o = set.get(1).unwrap();
        assert_eq!(o.phase, ObstaclePhase::Landed);
        assert_eq!(o.pos.y, 1.0);
        assert_eq!(o.vel_y, 0.0);
    }

    #[test]
    fn test_fall_drift_uses_bias() {
        let tuning = Tuning::default();
        let mut set = ObstacleSet::new();
        set.insert(falling(1, 10.0, -50.0, 1.0));

        integrate_obstacles(&mut set, 0.01, 10.0, &tuning);
        let o = set.get(1).unwrap();
        assert_eq!(o.phase, ObstaclePhase::Falling);
        assert!((o.pos.z - (-50.0 + 0.1 * 0.3)).abs() < 1e-5);
        assert!(o.vel_y < 0.0);
    }

    #[test]
    fn test_landed_slides_at_full_speed() {
        let tuning = Tuning::default();
        let mut set = ObstacleSet::new();
        let mut o = falling(1, 0.5, -20.0, 1.0);
        o.phase = ObstaclePhase::Landed;
        set.insert(o);

        integrate_obstacles(&mut set, 0.05, 10.0, &tuning);
        let o = set.get(1).unwrap();
        assert!((o.pos.z - (-19.5)).abs() < 1e-5);
        assert_eq!(o.pos.y, 0.5);
    }

    #[test]
    fn test_removed_past_player() {
        let tuning = Tuning::default();
        let mut set = ObstacleSet::new();
        let mut o = falling(1, 0.5, tuning.obstacle_remove_z - 0.1, 1.0);
        o.phase = ObstaclePhase::Landed;
        set.insert(o);
        set.insert(falling(2, 10.0, -40.0, 1.0));

        let report = integrate_obstacles(&mut set, 0.05, 10.0, &tuning);
        assert_eq!(report.removed, 1);
        assert!(set.get(1).is_none());
        assert!(set.get(2).is_some());
    }

    #[test]
    fn test_impact_flash_decays() {
        let tuning = Tuning::default();
        let mut set = ObstacleSet::new();
        set.insert(falling(1, 0.52, -30.0, 1.0));

        let report = integrate_obstacles(&mut set, 0.05, 10.0, &tuning);
        assert_eq!(report.landed, vec![1]);
        assert_eq!(set.get(1).unwrap().impact_flash, 1.0);

        for _ in 0..10 {
            integrate_obstacles(&mut set, 0.05, 10.0, &tuning);
        }
        assert_eq!(set.get(1).unwrap().impact_flash, 0.0);
    }

    proptest! {
        #[test]
        fn prop_landed_height_never_changes(
            height in 0.5f32..4.0,
            start_y in 8.0f32..11.0,
            dts in proptest::collection::vec(0.0f32..0.05, 1..200),
            speed in 6.0f32..30.0,
        ) {
            let mut tuning = Tuning::default();
            tuning.obstacle_remove_z = f32::MAX;
            let mut set = ObstacleSet::new();
            set.insert(falling(1, start_y, -60.0, height));

            let mut landed_y = None;
            for dt in dts {
                integrate_obstacles(&mut set, dt, speed, &tuning);
                let o = set.get(1).unwrap();
                match (o.phase, landed_y) {
                    (ObstaclePhase::Landed, None) => landed_y = Some(o.pos.y),
                    (ObstaclePhase::Landed, Some(y)) => prop_assert_eq!(o.pos.y, y),
                    (ObstaclePhase::Falling, Some(_)) => prop_assert!(false, "landed obstacle fell again"),
                    (ObstaclePhase::Falling, None) => {}
                }
            }
        }
    }
}
