//! Frame driver clock
//!
//! Turns the host's monotonically increasing frame timestamps (milliseconds)
//! into a clamped `dt` in seconds.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous frame, `None` until anchored
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]`.
    /// The first frame after (re)anchoring yields 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);

        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Drop the reference so the next frame starts from zero
    pub fn reanchor(&mut self) {
        self.last_ms = None;
    }

    pub fn is_anchored(&self) -> bool {
        self.last_ms.is_some()
    }
}
