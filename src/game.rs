//! Host-agnostic game driver
//!
//! Owns the session state, the frame clock and the top-score store. The host
//! calls `frame` once per scheduled frame callback and `handle` or `queue`
//! from its input handlers; both run on the same thread, so a frame always
//! sees a consistent state.

use crate::clock::FrameClock;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Intent, tick};
use crate::topscore::TopScoreStore;
use crate::tuning::Tuning;
use crate::view::{FrameView, HudSnapshot};

pub struct Game<S: TopScoreStore> {
    state: GameState,
    clock: FrameClock,
    store: S,
    tuning: Tuning,
    settings: Settings,
    /// Intents to apply at the start of the next frame
    pending: Vec<Intent>,
    alive: bool,
}

impl<S: TopScoreStore> Game<S> {
    /// Start an idle session, reading the stored top score once
    pub fn new(seed: u64, store: S, tuning: Tuning, settings: Settings) -> Self {
        let top_score = store.load_top_score();
        log::info!("Game initialized with seed {} (top score {})", seed, top_score);
        Self {
            state: GameState::new(seed, top_score, &tuning),
            clock: FrameClock::new(tuning.max_frame_dt),
            store,
            tuning,
            settings,
            pending: Vec::new(),
            alive: true,
        }
    }

    /// Apply an intent right away (input handlers)
    pub fn handle(&mut self, intent: Intent) {
        if !self.alive {
            return;
        }
        let before = self.state.phase;
        self.state.apply(intent, &self.tuning);
        if before == GamePhase::Paused && self.state.phase == GamePhase::Running {
            self.clock.reanchor();
        }
    }

    /// Defer an intent to the start of the next frame
    pub fn queue(&mut self, intent: Intent) {
        if self.alive {
            self.pending.push(intent);
        }
    }

    /// Run one frame at host timestamp `now_ms` and return what happened
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if !self.alive {
            return Vec::new();
        }

        // The clock reference stays frozen while paused
        let dt = if self.state.phase == GamePhase::Paused {
            self.clock.reanchor();
            0.0
        } else {
            self.clock.tick(now_ms)
        };

        let intents = std::mem::take(&mut self.pending);
        tick(&mut self.state, &intents, dt, &self.tuning, &self.settings);

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::NewTopScore { score } = event {
                self.persist_top_score(*score);
            }
        }
        events
    }

    fn persist_top_score(&mut self, score: u64) {
        if let Err(e) = self.store.save_top_score(score) {
            log::warn!("Failed to save top score {}: {}", score, e);
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state)
    }

    pub fn view(&self) -> FrameView {
        FrameView::capture(&self.state, &self.tuning, &self.settings)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the effect settings; gameplay is unaffected
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Frame snapshot as JSON for a script-side renderer
    pub fn view_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.view())
    }

    /// The page is being hidden. A page kept for back/forward navigation
    /// (`persisted`) only pauses and can be resumed; otherwise the session
    /// shuts down. Returns true when the session was shut down.
    pub fn page_hidden(&mut self, persisted: bool) -> bool {
        if persisted {
            if self.state.phase == GamePhase::Running {
                self.handle(Intent::TogglePause);
                log::info!("Paused for back/forward cache");
            }
            false
        } else {
            self.shutdown();
            true
        }
    }

    /// Stop the session. Further frames and intents are ignored.
    pub fn shutdown(&mut self) {
        if self.alive {
            self.alive = false;
            self.pending.clear();
            log::info!("Game shut down");
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}
