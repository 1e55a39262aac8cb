//! Lane Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, EventTarget, KeyboardEvent, PageTransitionEvent, PointerEvent, TouchEvent};

    use lane_dash::input::{intent_for_key, pointer_starts_run, touch_intent};
    use lane_dash::sim::{GamePhase, Intent};
    use lane_dash::topscore::LocalStorageStore;
    use lane_dash::view::HudSnapshot;
    use lane_dash::{Game, Settings, Tuning};

    /// Global JS function the page installs to draw a frame
    const RENDER_HOOK: &str = "laneDashRender";

    /// Browser session: the game plus the touch in progress
    struct App {
        game: Game<LocalStorageStore>,
        touch_start: Option<(f64, f64)>,
        /// Last HUD pushed to the DOM
        hud: Option<HudSnapshot>,
    }

    type Shared = Rc<RefCell<App>>;

    /// A registered DOM listener, removed again on drop
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn detach(&self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }

        fn attach(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
                log::warn!("Failed to add {} listener: {:?}", kind, e);
            }
            Self {
                target: target.clone(),
                kind,
                closure,
            }
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            self.detach();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Game::new(seed, LocalStorageStore, Tuning::default(), settings);
        let app: Shared = Rc::new(RefCell::new(App {
            game,
            touch_start: None,
            hud: None,
        }));

        let listeners: Rc<RefCell<Vec<Listener>>> = Rc::new(RefCell::new(Vec::new()));
        listeners.borrow_mut().extend(setup_input_handlers(&app));
        listeners.borrow_mut().extend(setup_buttons(&app));
        listeners.borrow_mut().extend(setup_auto_pause(&app));
        setup_teardown(app.clone(), listeners);

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(app);

        log::info!("Lane Dash running!");
    }

    fn setup_input_handlers(app: &Shared) -> Vec<Listener> {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let mut listeners = Vec::new();

        // Keyboard
        {
            let app = app.clone();
            listeners.push(Listener::attach(&window, "keydown", move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                // Edge-triggered: held keys do not repeat intents
                if event.repeat() {
                    return;
                }
                let key = event.key();
                if let Some(intent) = intent_for_key(&key) {
                    event.prevent_default();
                    app.borrow_mut().game.handle(intent);
                } else if key.eq_ignore_ascii_case("q") {
                    cycle_quality(&app);
                }
            }));
        }

        // Touch start: remember where the swipe began
        {
            let app = app.clone();
            listeners.push(Listener::attach(&document, "touchstart", move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut().touch_start = Some((touch.client_x() as f64, touch.client_y() as f64));
                }
            }));
        }

        // Touch end: swipe changes lane, tap starts or restarts
        {
            let app = app.clone();
            listeners.push(Listener::attach(&document, "touchend", move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                let Some((x0, y0)) = a.touch_start.take() else {
                    return;
                };
                if let Some(touch) = event.changed_touches().get(0) {
                    let dx = touch.client_x() as f64 - x0;
                    let dy = touch.client_y() as f64 - y0;
                    if let Some(intent) = touch_intent(dx, dy) {
                        a.game.handle(intent);
                    }
                }
            }));
        }

        // Mouse or pen press starts or restarts; touches go through the gesture
        {
            let app = app.clone();
            listeners.push(Listener::attach(&document, "pointerdown", move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if pointer_starts_run(&event.pointer_type()) {
                    app.borrow_mut().game.handle(Intent::StartOrRestart);
                }
            }));
        }

        listeners
    }

    /// Step to the next quality preset and remember it
    fn cycle_quality(app: &Shared) {
        let mut a = app.borrow_mut();
        let mut settings = a.game.settings().clone();
        settings.apply_preset(settings.quality.next());
        log::info!("Quality preset: {}", settings.quality.as_str());
        if let Err(e) = settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }
        a.game.set_settings(settings);
    }

    fn setup_buttons(app: &Shared) -> Vec<Listener> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        let mut listeners = Vec::new();

        for (id, intent) in [
            ("resume-btn", Intent::Resume),
            ("pause-btn", Intent::TogglePause),
            ("restart-btn", Intent::StartOrRestart),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                listeners.push(Listener::attach(&btn, "click", move |_event: Event| {
                    app.borrow_mut().game.handle(intent);
                }));
            }
        }

        listeners
    }

    fn setup_auto_pause(app: &Shared) -> Vec<Listener> {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let mut listeners = Vec::new();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            listeners.push(Listener::attach(&document, "visibilitychange", move |_event: Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&app, "tab hidden");
                }
            }));
        }

        // Window blur (click outside)
        {
            let app = app.clone();
            listeners.push(Listener::attach(&window, "blur", move |_event: Event| {
                auto_pause(&app, "window blur");
            }));
        }

        listeners
    }

    fn auto_pause(app: &Shared, reason: &str) {
        let mut a = app.borrow_mut();
        if a.game.state().phase == GamePhase::Running {
            a.game.handle(Intent::TogglePause);
            log::info!("Auto-paused ({})", reason);
        }
    }

    /// On `pagehide`: a page entering the back/forward cache only pauses.
    /// A page being unloaded stops the loop and detaches every listener,
    /// this one included.
    fn setup_teardown(app: Shared, listeners: Rc<RefCell<Vec<Listener>>>) {
        let window = web_sys::window().expect("no window");
        let own: Rc<RefCell<Option<Listener>>> = Rc::new(RefCell::new(None));
        let own_handle = own.clone();

        let pagehide = Listener::attach(&window, "pagehide", move |event: Event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|e| e.persisted());
            if !app.borrow_mut().game.page_hidden(persisted) {
                return;
            }

            let detached = std::mem::take(&mut *listeners.borrow_mut());
            // The running closure is only unregistered here; it is freed with the page
            if let Some(listener) = own_handle.borrow().as_ref() {
                listener.detach();
            }
            log::info!("Detached {} listeners", detached.len() + 1);
        });
        *own.borrow_mut() = Some(pagehide);
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Shared, time: f64) {
        let frame_json = {
            let mut a = app.borrow_mut();
            if !a.game.is_alive() {
                log::info!("Frame loop stopped");
                return;
            }

            a.game.frame(time);
            update_hud(&mut a);
            a.game.view_json()
        };

        // The hook runs page script, which may dispatch events our listeners
        // handle; the app must not be borrowed while it runs
        match frame_json {
            Ok(json) => render(&json),
            Err(e) => log::warn!("Frame view not serialized: {}", e),
        }

        request_animation_frame(app);
    }

    /// Hand the frame snapshot to the page's renderer, if one is installed
    fn render(json: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(hook) = js_sys::Reflect::get(&window, &JsValue::from_str(RENDER_HOOK)) else {
            return;
        };
        let Some(hook) = hook.dyn_ref::<js_sys::Function>() else {
            return;
        };

        if let Err(e) = hook.call1(&JsValue::NULL, &JsValue::from_str(json)) {
            log::warn!("Render hook failed: {:?}", e);
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(app: &mut App) {
        let hud = app.game.hud();
        if app.hud.as_ref() == Some(&hud) {
            return;
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&hud.score.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-top .hud-value").ok().flatten() {
            el.set_text_content(Some(&hud.top_score.to_string()));
        }

        if let Some(el) = document.get_element_by_id("overlay") {
            match &hud.overlay_message {
                Some(message) => {
                    el.set_text_content(Some(message));
                    let _ = el.set_attribute("class", "");
                }
                None => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        if let Some(el) = document.get_element_by_id("pause-menu") {
            let class = if hud.phase == GamePhase::Paused { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }

        app.hud = Some(hud);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_dash::consts::HEADLESS_DT;
    use lane_dash::sim::{GameEvent, GamePhase, GameState, Intent, LaneDir};
    use lane_dash::{Game, MemoryStore, Settings, Tuning};

    /// Stop after this much simulated time even if the autopilot survives
    const MAX_RUN_SECS: f32 = 300.0;
    /// How far ahead (world units) the autopilot looks for boxes
    const LOOKAHEAD: f32 = 12.0;

    /// Is anything in `lane` about to reach the player?
    fn lane_blocked(state: &GameState, tuning: &Tuning, lane: usize) -> bool {
        let near = tuning.player_z + tuning.player_radius;
        state
            .obstacles
            .iter()
            .any(|o| o.lane == lane && o.max().z > tuning.player_z - LOOKAHEAD && o.min().z < near)
    }

    /// Dodge into a free neighbouring lane when the current one is blocked
    fn autopilot(state: &GameState, tuning: &Tuning) -> Option<Intent> {
        if state.lane.is_moving() {
            return None;
        }
        let current = state.lane.current_index;
        if !lane_blocked(state, tuning, current) {
            return None;
        }

        [LaneDir::Left, LaneDir::Right].into_iter().find_map(|dir| {
            let lane = current.checked_add_signed(dir.delta())?;
            (lane < tuning.lane_positions.len() && !lane_blocked(state, tuning, lane))
                .then_some(Intent::MoveLane(dir))
        })
    }

    pub fn run(seed: u64, tuning: Tuning) {
        let mut game = Game::new(seed, MemoryStore::new(), tuning, Settings::default());
        game.handle(Intent::StartOrRestart);

        let frame_ms = HEADLESS_DT as f64 * 1000.0;
        let max_frames = (MAX_RUN_SECS / HEADLESS_DT) as u64;
        let mut spawned = 0u32;
        let mut frames = 0u64;

        while frames < max_frames && game.state().phase == GamePhase::Running {
            if let Some(intent) = autopilot(game.state(), game.tuning()) {
                game.queue(intent);
            }
            for event in game.frame(frames as f64 * frame_ms) {
                if let GameEvent::ObstacleSpawned { .. } = event {
                    spawned += 1;
                }
            }
            frames += 1;
        }

        let hud = game.hud();
        log::info!(
            "Run finished after {:.1}s: score {}, {} obstacles, phase {:?}",
            frames as f32 * HEADLESS_DT,
            hud.score,
            spawned,
            hud.phase
        );
        println!("seed {seed}: score {} ({} obstacles spawned)", hud.score, spawned);
        game.shutdown();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Dash (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    // Usage: lane-dash [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Invalid seed {:?} ({}), using 1", raw, e);
            1
        }),
        None => 1,
    };
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => lane_dash::Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Cannot read tuning file {} ({}), using defaults", path, e);
                lane_dash::Tuning::default()
            }
        },
        None => lane_dash::Tuning::default(),
    };

    headless::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
