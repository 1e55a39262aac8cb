//! Game state and core simulation types
//!
//! One `GameState` per session. Everything a frame step reads or writes lives
//! here; the renderer and HUD only ever see snapshots (see `crate::view`).

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyParams;
use super::effects::EffectsState;
use super::lane::{LaneDir, LaneState};
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Stream id mixed into the seed for the ambient effects RNG
const EFFECTS_STREAM: u64 = 0x5eed_e77e_c700_0001;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first run; waiting for start
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Run ended by a collision
    GameOver,
}

/// Obstacle motion phase. Falling becomes Landed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstaclePhase {
    Falling,
    Landed,
}

/// A box obstacle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: usize,
    /// Width, height, depth
    pub size: Vec3,
    /// Box center
    pub pos: Vec3,
    pub vel_y: f32,
    pub phase: ObstaclePhase,
    /// Landing flash intensity (1 at impact, decays to 0)
    pub impact_flash: f32,
}

impl Obstacle {
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.pos - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.pos + self.half_extents()
    }

    /// Center height at which the box sits on the ground
    #[inline]
    pub fn resting_y(&self, ground_y: f32) -> f32 {
        ground_y + self.size.y * 0.5
    }
}

/// Active obstacles keyed by a stable, increasing id
#[derive(Debug, Clone)]
pub struct ObstacleSet {
    entries: Vec<Obstacle>,
    /// Next id to hand out; never reused within a session
    next_id: u32,
}

impl Default for ObstacleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a new obstacle. Ids are allocated increasing, so pushing keeps
    /// the set ordered by id.
    pub fn insert(&mut self, obstacle: Obstacle) {
        debug_assert!(self.entries.last().is_none_or(|o| o.id < obstacle.id));
        self.entries.push(obstacle);
    }

    /// Remove one obstacle by id
    pub fn destroy(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.entries.binary_search_by_key(&id, |o| o.id).ok()?;
        Some(self.entries.remove(idx))
    }

    /// Destroy every obstacle the predicate rejects, returning how many went
    pub fn retain(&mut self, keep: impl FnMut(&Obstacle) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(keep);
        before - self.entries.len()
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.entries
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.entries.iter_mut()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Discrete intents delivered by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLane(LaneDir),
    TogglePause,
    /// Dedicated resume trigger (resume button); only acts while paused
    Resume,
    StartOrRestart,
}

/// Things that happened during a step, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    RunStarted,
    Paused,
    Resumed,
    LaneChanged { lane: usize },
    ObstacleSpawned { id: u32, lane: usize },
    /// One-shot impact cue
    ObstacleLanded { id: u32 },
    ThemeRotated { theme: u32 },
    GameOver { score: u64, hit: u32 },
    /// New top score; the driver persists it
    NewTopScore { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Continuous, play-time weighted score
    pub score: f32,
    /// Best floored score, persisted by the driver
    pub top_score: u64,
    /// Running seconds this run (frozen while paused)
    pub elapsed_difficulty_time: f32,
    /// Parameters in effect for the last step
    pub difficulty: DifficultyParams,
    pub lane: LaneState,
    pub spawner: Spawner,
    pub obstacles: ObstacleSet,
    /// Ambient particles, never read by gameplay
    pub effects: EffectsState,
    /// Lane colour theme index, advanced by the spawner
    pub theme: u32,
    /// Events since the driver last drained them
    pub events: Vec<GameEvent>,
    /// Obstacle spawn RNG
    pub rng: Pcg32,
    /// Ambient effects RNG (separate stream so effects never perturb spawns)
    pub effects_rng: Pcg32,
}

impl GameState {
    /// Create an idle session with the given seed and stored top score
    pub fn new(seed: u64, top_score: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0.0,
            top_score,
            elapsed_difficulty_time: 0.0,
            difficulty: tuning.difficulty.params(0.0),
            lane: LaneState::centered(tuning),
            spawner: Spawner::new(),
            obstacles: ObstacleSet::new(),
            effects: EffectsState::default(),
            theme: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            effects_rng: Pcg32::seed_from_u64(seed ^ EFFECTS_STREAM),
        }
    }

    /// Score as shown and stored
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Player sphere center
    #[inline]
    pub fn player_pos(&self, tuning: &Tuning) -> Vec3 {
        Vec3::new(self.lane.position_x, tuning.player_y, tuning.player_z)
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
