//! Raw input to intents
//!
//! Device wiring lives in the host; this maps what it reads (key names,
//! swipe deltas) onto the discrete intents the simulation accepts.

use crate::sim::{Intent, LaneDir};

/// Minimum horizontal travel (CSS pixels) for a touch to count as a swipe
pub const SWIPE_MIN_DISTANCE: f64 = 30.0;

/// Intent for a `KeyboardEvent.key` value
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Intent::MoveLane(LaneDir::Left)),
        "ArrowRight" | "d" | "D" => Some(Intent::MoveLane(LaneDir::Right)),
        "Escape" | "p" | "P" => Some(Intent::TogglePause),
        " " | "Enter" => Some(Intent::StartOrRestart),
        _ => None,
    }
}

/// Intent for a finished touch that travelled `(dx, dy)`.
/// Mostly-horizontal swipes past the threshold move a lane.
pub fn swipe_intent(dx: f64, dy: f64) -> Option<Intent> {
    if dx.abs() < SWIPE_MIN_DISTANCE || dx.abs() <= dy.abs() {
        return None;
    }
    let dir = if dx < 0.0 { LaneDir::Left } else { LaneDir::Right };
    Some(Intent::MoveLane(dir))
}

/// Intent for a whole touch gesture: a swipe moves a lane, a touch that
/// barely moved is a tap (start or restart), anything else is ignored.
/// A swipe never doubles as a tap.
pub fn touch_intent(dx: f64, dy: f64) -> Option<Intent> {
    if let Some(intent) = swipe_intent(dx, dy) {
        return Some(intent);
    }
    (dx.hypot(dy) < SWIPE_MIN_DISTANCE).then_some(Intent::StartOrRestart)
}

/// Whether a pointer press should start a run. Touch presses are left to
/// the touch gesture handler so a swipe cannot restart.
pub fn pointer_starts_run(pointer_type: &str) -> bool {
    pointer_type != "touch"
}
