//! Run state machine
//!
//! Every phase change goes through here:
//!
//! | From            | Intent / cause        | To       |
//! |-----------------|-----------------------|----------|
//! | Idle, GameOver  | StartOrRestart        | Running  |
//! | Running         | TogglePause           | Paused   |
//! | Paused          | TogglePause, Resume   | Running  |
//! | Running         | collision             | GameOver |
//!
//! Anything else is a no-op. Intents are edge-triggered: one intent, one
//! transition attempt.

use super::lane::LaneState;
use super::spawner::Spawner;
use super::state::{GameEvent, GamePhase, GameState, Intent};
use crate::tuning::Tuning;

impl GameState {
    /// Apply one input intent
    pub fn apply(&mut self, intent: Intent, tuning: &Tuning) {
        match (intent, self.phase) {
            (Intent::StartOrRestart, GamePhase::Idle | GamePhase::GameOver) => {
                self.start_run(tuning);
            }
            (Intent::TogglePause, GamePhase::Running) => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            (Intent::TogglePause | Intent::Resume, GamePhase::Paused) => {
                self.phase = GamePhase::Running;
                self.events.push(GameEvent::Resumed);
            }
            (Intent::MoveLane(dir), GamePhase::Running) => {
                if self.lane.request_move(dir, tuning) {
                    self.effects.queue_burst();
                    self.events.push(GameEvent::LaneChanged {
                        lane: self.lane.current_index,
                    });
                } else {
                    log::trace!("Lane move {:?} ignored at lane {}", dir, self.lane.current_index);
                }
            }
            (intent, phase) => {
                log::trace!("Intent {:?} ignored in {:?}", intent, phase);
            }
        }
    }

    /// Reset per-run state and enter Running
    pub fn start_run(&mut self, tuning: &Tuning) {
        self.score = 0.0;
        self.elapsed_difficulty_time = 0.0;
        self.difficulty = tuning.difficulty.params(0.0);
        self.lane = LaneState::centered(tuning);
        self.spawner = Spawner::new();
        self.obstacles.clear();
        self.effects.clear_speed_lines();
        self.theme = 0;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run started (top score {})", self.top_score);
    }

    /// End the run after the player touched obstacle `hit`
    pub fn end_run(&mut self, hit: u32) {
        if self.phase != GamePhase::Running {
            return;
        }

        let score = self.display_score();
        self.phase = GamePhase::GameOver;
        self.obstacles.clear();
        self.events.push(GameEvent::GameOver { score, hit });
        log::info!("Game over: score {} (hit obstacle {})", score, hit);

        if score > self.top_score {
            self.top_score = score;
            self.events.push(GameEvent::NewTopScore { score });
            log::info!("New top score: {}", score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::LaneDir;

    fn running() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, 0, &tuning);
        state.apply(Intent::StartOrRestart, &tuning);
        state.drain_events();
        (state, tuning)
    }

    #[test]
    fn test_idle_start() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, 0, &tuning);
        state.apply(Intent::StartOrRestart, &tuning);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_idle_ignores_move_and_pause() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, 0, &tuning);
        state.apply(Intent::MoveLane(LaneDir::Left), &tuning);
        state.apply(Intent::TogglePause, &tuning);
        state.apply(Intent::Resume, &tuning);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.lane.current_index, 1);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_game_over_ignores_move_and_pause() {
        let (mut state, tuning) = running();
        state.end_run(1);
        state.drain_events();

        state.apply(Intent::MoveLane(LaneDir::Right), &tuning);
        state.apply(Intent::TogglePause, &tuning);
        state.apply(Intent::Resume, &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lane.current_index, 1);
        assert!(state.events.is_empty());

        // Only start leaves GameOver
        state.apply(Intent::StartOrRestart, &tuning);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_pause_toggle_and_resume() {
        let (mut state, tuning) = running();

        state.apply(Intent::TogglePause, &tuning);
        assert_eq!(state.phase, GamePhase::Paused);
        state.apply(Intent::TogglePause, &tuning);
        assert_eq!(state.phase, GamePhase::Running);

        state.apply(Intent::TogglePause, &tuning);
        state.apply(Intent::Resume, &tuning);
        assert_eq!(state.phase, GamePhase::Running);

        // Resume while running does nothing
        state.apply(Intent::Resume, &tuning);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_moves_ignored_while_paused() {
        let (mut state, tuning) = running();
        state.apply(Intent::TogglePause, &tuning);
        state.apply(Intent::MoveLane(LaneDir::Right), &tuning);
        assert_eq!(state.lane.current_index, 1);
    }

    #[test]
    fn test_start_ignored_while_running_or_paused() {
        let (mut state, tuning) = running();
        state.score = 50.0;
        state.apply(Intent::StartOrRestart, &tuning);
        assert_eq!(state.score, 50.0);
        state.apply(Intent::TogglePause, &tuning);
        state.apply(Intent::StartOrRestart, &tuning);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.score, 50.0);
    }

    #[test]
    fn test_game_over_records_top_score_once() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, 100, &tuning);
        state.apply(Intent::StartOrRestart, &tuning);
        state.drain_events();
        state.score = 120.7;

        state.end_run(3);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.top_score, 120);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::GameOver { score: 120, hit: 3 },
                GameEvent::NewTopScore { score: 120 },
            ]
        );

        // A second end in GameOver is a no-op
        state.end_run(4);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_game_over_below_top_keeps_top() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, 500, &tuning);
        state.apply(Intent::StartOrRestart, &tuning);
        state.score = 499.9;
        state.end_run(1);
        assert_eq!(state.top_score, 500);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::NewTopScore { .. })));
    }

    #[test]
    fn test_restart_resets_run() {
        let (mut state, tuning) = running();
        state.apply(Intent::MoveLane(LaneDir::Left), &tuning);
        state.score = 33.0;
        state.elapsed_difficulty_time = 12.0;
        state.theme = 4;
        state.end_run(1);

        state.apply(Intent::MoveLane(LaneDir::Right), &tuning);
        assert_eq!(state.lane.current_index, 0);

        state.apply(Intent::StartOrRestart, &tuning);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.elapsed_difficulty_time, 0.0);
        assert_eq!(state.difficulty.level, 1.0);
        assert_eq!(state.lane.current_index, 1);
        assert_eq!(state.lane.position_x, 0.0);
        assert_eq!(state.spawner.spawned, 0);
        assert_eq!(state.theme, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.top_score, 33);
    }

    #[test]
    fn test_lane_change_queues_event() {
        let (mut state, tuning) = running();
        state.apply(Intent::MoveLane(LaneDir::Left), &tuning);
        state.apply(Intent::MoveLane(LaneDir::Left), &tuning);
        assert_eq!(state.lane.current_index, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::LaneChanged { lane: 0 }]);
    }
}
