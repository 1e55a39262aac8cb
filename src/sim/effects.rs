//! Ambient effects: speed lines and rain streaks
//!
//! Purely visual. The coordinator decides when to emit (lane-change bursts,
//! a steady trickle at high speed, continuous rain); integration moves and
//! expires what is alive. Nothing in gameplay reads these.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

/// Particle balance knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    /// Speed line lifetime, `[min, max]` seconds
    pub speed_line_life: [f32; 2],
    /// Speed lines travel this multiple of the scroll distance
    pub speed_line_stretch: f32,
    pub speed_line_burst: u32,
    /// Scroll speed above which lines trickle continuously
    pub speed_line_fast_threshold: f32,
    pub speed_line_trickle_interval: f32,
    pub rain_spawn_interval: f32,
    /// Rain streak speed, `[min, max]`
    pub rain_speed: [f32; 2],
    pub rain_spawn_z: f32,
    pub rain_remove_z: f32,
    /// Half-width of the rain band around the track
    pub rain_spread_x: f32,
    pub rain_height: [f32; 2],
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            speed_line_life: [SPEED_LINE_LIFE_MIN, SPEED_LINE_LIFE_MAX],
            speed_line_stretch: SPEED_LINE_STRETCH,
            speed_line_burst: SPEED_LINE_BURST,
            speed_line_fast_threshold: SPEED_LINE_FAST_THRESHOLD,
            speed_line_trickle_interval: SPEED_LINE_TRICKLE_INTERVAL,
            rain_spawn_interval: RAIN_SPAWN_INTERVAL,
            rain_speed: [RAIN_SPEED_MIN, RAIN_SPEED_MAX],
            rain_spawn_z: RAIN_SPAWN_Z,
            rain_remove_z: RAIN_REMOVE_Z,
            rain_spread_x: RAIN_SPREAD_X,
            rain_height: [RAIN_HEIGHT_MIN, RAIN_HEIGHT_MAX],
        }
    }
}

impl EffectsTuning {
    pub fn sanitized(mut self) -> Self {
        for range in [
            &mut self.speed_line_life,
            &mut self.rain_speed,
            &mut self.rain_height,
        ] {
            if range[0] > range[1] {
                range.swap(0, 1);
            }
        }
        self.speed_line_life[0] = self.speed_line_life[0].max(1e-3);
        self.speed_line_trickle_interval = self.speed_line_trickle_interval.max(1e-3);
        self.rain_spawn_interval = self.rain_spawn_interval.max(1e-3);
        self
    }
}

/// A streak that rushes past the player and fades out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedLine {
    pub pos: Vec3,
    pub length: f32,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
}

impl SpeedLine {
    /// Linear fade, 1 at birth and 0 at expiry
    #[inline]
    pub fn opacity(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// A background rain streak with its own speed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainStreak {
    pub pos: Vec3,
    pub speed: f32,
}

/// Live particles plus the coordinator's timers
#[derive(Debug, Clone, Default)]
pub struct EffectsState {
    pub speed_lines: Vec<SpeedLine>,
    pub rain: Vec<RainStreak>,
    /// Lane-change bursts waiting for the next update
    pending_bursts: u32,
    trickle_timer: f32,
    rain_timer: f32,
}

impl EffectsState {
    /// Ask for a speed-line burst on the next update
    pub fn queue_burst(&mut self) {
        self.pending_bursts += 1;
    }

    pub fn particle_count(&self) -> usize {
        self.speed_lines.len() + self.rain.len()
    }

    /// Drop speed lines and pending bursts (run reset)
    pub fn clear_speed_lines(&mut self) {
        self.speed_lines.clear();
        self.pending_bursts = 0;
        self.trickle_timer = 0.0;
    }

    /// Emit what the coordinator decides on, then integrate and expire.
    ///
    /// Speed lines are only emitted while `running`; rain whenever enabled.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speed: f32,
        running: bool,
        player_x: f32,
        tuning: &EffectsTuning,
        settings: &Settings,
        rng: &mut R,
    ) {
        let cap = settings.max_particles();

        // --- Speed lines ---
        if running && settings.effective_speed_lines() {
            let mut emit = self.pending_bursts * tuning.speed_line_burst;

            if speed > tuning.speed_line_fast_threshold {
                self.trickle_timer += dt;
                while self.trickle_timer >= tuning.speed_line_trickle_interval {
                    self.trickle_timer -= tuning.speed_line_trickle_interval;
                    emit += 1;
                }
            } else {
                self.trickle_timer = 0.0;
            }

            for _ in 0..emit {
                if self.particle_count() >= cap {
                    break;
                }
                self.speed_lines.push(spawn_speed_line(player_x, speed, tuning, rng));
            }
        }
        self.pending_bursts = 0;

        // --- Rain ---
        if settings.effective_rain() {
            self.rain_timer += dt;
            while self.rain_timer >= tuning.rain_spawn_interval {
                self.rain_timer -= tuning.rain_spawn_interval;
                if self.particle_count() < cap {
                    self.rain.push(spawn_rain(tuning, rng));
                }
            }
        } else {
            self.rain.clear();
            self.rain_timer = 0.0;
        }

        self.integrate(dt, speed, tuning);
    }

    /// Move and expire every live particle
    pub fn integrate(&mut self, dt: f32, speed: f32, tuning: &EffectsTuning) {
        let forward = speed * dt * tuning.speed_line_stretch;
        for line in &mut self.speed_lines {
            line.pos.z += forward;
            line.life -= dt;
        }
        self.speed_lines.retain(|l| l.life > 0.0);

        for streak in &mut self.rain {
            streak.pos.z += streak.speed * dt;
        }
        self.rain.retain(|r| r.pos.z <= tuning.rain_remove_z);
    }
}

fn spawn_speed_line<R: Rng + ?Sized>(
    player_x: f32,
    speed: f32,
    tuning: &EffectsTuning,
    rng: &mut R,
) -> SpeedLine {
    let [life_min, life_max] = tuning.speed_line_life;
    let life = life_min + rng.random::<f32>() * (life_max - life_min);
    SpeedLine {
        pos: Vec3::new(
            player_x + rng.random_range(-4.0f32..4.0),
            rng.random_range(0.2f32..3.5),
            -rng.random_range(4.0f32..20.0),
        ),
        length: 0.6 + speed * 0.08,
        life,
        max_life: life,
    }
}

fn spawn_rain<R: Rng + ?Sized>(tuning: &EffectsTuning, rng: &mut R) -> RainStreak {
    let [speed_min, speed_max] = tuning.rain_speed;
    let [h_min, h_max] = tuning.rain_height;
    RainStreak {
        pos: Vec3::new(
            (rng.random::<f32>() * 2.0 - 1.0) * tuning.rain_spread_x,
            h_min + rng.random::<f32>() * (h_max - h_min),
            tuning.rain_spawn_z,
        ),
        speed: speed_min + rng.random::<f32>() * (speed_max - speed_min),
    }
}
