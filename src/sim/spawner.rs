//! Obstacle spawner
//!
//! Accumulates running time and emits one obstacle each time the accumulated
//! time exceeds the current spawn interval.

use glam::Vec3;
use rand::Rng;
use serde::Serialize;

use super::state::{Obstacle, ObstaclePhase};
use crate::tuning::Tuning;

/// Spawn timer and per-run spawn count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spawner {
    /// Seconds since the last spawn
    pub timer: f32,
    /// Obstacles spawned since the run started
    pub spawned: u32,
}

/// A freshly spawned obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Spawned {
    pub obstacle: Obstacle,
    /// This spawn lands on the theme rotation period
    pub rotate_theme: bool,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timer by `dt`; emits at most one obstacle.
    ///
    /// `next_id` is only called when an obstacle is actually emitted.
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        difficulty: f32,
        tuning: &Tuning,
        rng: &mut R,
        next_id: impl FnOnce() -> u32,
    ) -> Option<Spawned> {
        self.timer += dt.max(0.0);
        if self.timer <= tuning.difficulty.spawn_interval(difficulty) {
            return None;
        }
        self.timer = 0.0;
        self.spawned += 1;

        let obstacle = spawn_obstacle(next_id(), difficulty, tuning, rng);
        let rotate_theme = self.spawned.is_multiple_of(tuning.theme_rotation_period);
        Some(Spawned {
            obstacle,
            rotate_theme,
        })
    }
}

/// Build a falling obstacle in a random lane, sized for `difficulty`
pub fn spawn_obstacle<R: Rng + ?Sized>(
    id: u32,
    difficulty: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Obstacle {
    let lane = rng.random_range(0..tuning.lane_positions.len());
    let factor = tuning.size_factor(difficulty);

    let base = Vec3::from_array(tuning.obstacle_base_size);
    let range = Vec3::from_array(tuning.obstacle_size_range);
    let roll = Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>());
    let size = base + roll * range * factor;

    let [h_min, h_max] = tuning.spawn_height;
    let [d_min, d_max] = tuning.spawn_distance;
    let height = h_min + rng.random::<f32>() * (h_max - h_min);
    let distance = d_min + rng.random::<f32>() * (d_max - d_min);

    Obstacle {
        id,
        lane,
        size,
        pos: Vec3::new(
            tuning.lane_positions[lane],
            tuning.ground_y + height,
            tuning.player_z - distance,
        ),
        vel_y: 0.0,
        phase: ObstaclePhase::Falling,
        impact_flash: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_no_spawn_before_interval() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new();
        let mut id = 0;
        for _ in 0..60 {
            let out = spawner.try_spawn(0.016, 1.0, &tuning, &mut rng, || {
                id += 1;
                id
            });
            assert!(out.is_none());
        }
        assert_eq!(id, 0);
    }

    #[test]
    fn test_spawn_resets_timer() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new();
        let out = spawner.try_spawn(1.2, 1.0, &tuning, &mut rng, || 7);
        let spawned = out.expect("interval exceeded");
        assert_eq!(spawned.obstacle.id, 7);
        assert_eq!(spawner.timer, 0.0);
        assert_eq!(spawner.spawned, 1);
        assert!(!spawned.rotate_theme);
    }

    #[test]
    fn test_every_tenth_spawn_rotates_theme() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new();
        let rotations: Vec<bool> = (0..20)
            .map(|i| {
                spawner
                    .try_spawn(2.0, 1.0, &tuning, &mut rng, || i)
                    .map(|s| s.rotate_theme)
                    .unwrap_or(false)
            })
            .collect();
        let hits: Vec<usize> = rotations
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.then_some(i + 1))
            .collect();
        assert_eq!(hits, vec![10, 20]);
    }

    #[test]
    fn test_spawned_obstacle_within_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        for i in 0..500 {
            let difficulty = 1.0 + i as f32 * 0.1;
            let o = spawn_obstacle(i, difficulty, &tuning, &mut rng);
            assert!(o.lane < 3);
            assert_eq!(o.pos.x, tuning.lane_positions[o.lane]);
            assert!(o.pos.y >= 8.0 && o.pos.y <= 11.0);
            assert!(o.pos.z <= -40.0 && o.pos.z >= -60.0);
            assert_eq!(o.phase, ObstaclePhase::Falling);

            let base = Vec3::from_array(tuning.obstacle_base_size);
            let max = base + Vec3::from_array(tuning.obstacle_size_range) * 2.0;
            assert!(o.size.cmpge(base).all());
            assert!(o.size.cmple(max).all());
        }
    }

    #[test]
    fn test_lanes_are_all_reachable() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut seen = [false; 3];
        for i in 0..200 {
            seen[spawn_obstacle(i, 1.0, &tuning, &mut rng).lane] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_seeded_sequence_repeats() {
        let tuning = Tuning::default();
        let mut a = Pcg32::seed_from_u64(1234);
        let mut b = Pcg32::seed_from_u64(1234);
        for i in 0..20 {
            assert_eq!(
                spawn_obstacle(i, 2.0, &tuning, &mut a),
                spawn_obstacle(i, 2.0, &tuning, &mut b)
            );
        }
    }
}
