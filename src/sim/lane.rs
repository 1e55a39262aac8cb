//! Lane model: which lane the player is in and where it is drawn
//!
//! The lane index is authoritative. The world X is eased between the offset
//! captured when the move was requested and the target lane's fixed position.

use serde::{Deserialize, Serialize};

use crate::consts::CENTER_LANE;
use crate::smoothstep;
use crate::tuning::Tuning;

/// Direction of a lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneDir {
    Left,
    Right,
}

impl LaneDir {
    #[inline]
    pub fn delta(self) -> isize {
        match self {
            LaneDir::Left => -1,
            LaneDir::Right => 1,
        }
    }
}

/// Lane index plus the in-flight interpolation between two lanes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneState {
    pub current_index: usize,
    /// Player X when the current move began
    pub start_offset: f32,
    /// Fixed X of `current_index`
    pub target_offset: f32,
    pub elapsed: f32,
    pub duration: f32,
    /// Interpolated player X
    pub position_x: f32,
}

impl LaneState {
    /// Player at rest in the center lane
    pub fn centered(tuning: &Tuning) -> Self {
        let x = tuning.lane_positions[CENTER_LANE];
        Self {
            current_index: CENTER_LANE,
            start_offset: x,
            target_offset: x,
            elapsed: tuning.lane_change_duration,
            duration: tuning.lane_change_duration,
            position_x: x,
        }
    }

    /// Whether an interpolation is still in flight
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Request a one-lane move. Returns false (and changes nothing) if the
    /// move would leave the lane table.
    ///
    /// A request while a previous move is still easing restarts the ease from
    /// the player's live position.
    pub fn request_move(&mut self, dir: LaneDir, tuning: &Tuning) -> bool {
        let Some(next) = self.current_index.checked_add_signed(dir.delta()) else {
            return false;
        };
        let Some(target) = tuning.lane_x(next) else {
            return false;
        };

        self.current_index = next;
        self.start_offset = self.position_x;
        self.target_offset = target;
        self.elapsed = 0.0;
        self.duration = tuning.lane_change_duration;
        true
    }

    /// Advance the ease by `dt`
    pub fn advance(&mut self, dt: f32) {
        if self.elapsed < self.duration {
            self.elapsed += dt.max(0.0);
        }

        if self.elapsed >= self.duration {
            self.position_x = self.target_offset;
        } else {
            let t = (self.elapsed / self.duration).min(1.0);
            let eased = smoothstep(t);
            self.position_x = self.start_offset + (self.target_offset - self.start_offset) * eased;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_centered_at_rest() {
        let tuning = Tuning::default();
        let lane = LaneState::centered(&tuning);
        assert_eq!(lane.current_index, 1);
        assert_eq!(lane.position_x, 0.0);
        assert!(!lane.is_moving());
    }

    #[test]
    fn test_move_eases_and_snaps() {
        let tuning = Tuning::default();
        let mut lane = LaneState::centered(&tuning);

        assert!(lane.request_move(LaneDir::Right, &tuning));
        assert_eq!(lane.current_index, 2);
        assert_eq!(lane.start_offset, 0.0);
        assert_eq!(lane.target_offset, 2.5);

        lane.advance(0.05);
        assert!(lane.position_x > 0.0 && lane.position_x < 2.5);

        for _ in 0..10 {
            lane.advance(0.05);
        }
        assert_eq!(lane.position_x, 2.5);
    }

    #[test]
    fn test_move_off_table_ignored() {
        let tuning = Tuning::default();
        let mut lane = LaneState::centered(&tuning);
        assert!(lane.request_move(LaneDir::Left, &tuning));
        let before = lane.clone();
        assert!(!lane.request_move(LaneDir::Left, &tuning));
        assert_eq!(lane, before);
        assert_eq!(lane.current_index, 0);
    }

    #[test]
    fn test_second_request_starts_from_live_position() {
        let tuning = Tuning::default();
        let mut lane = LaneState::centered(&tuning);
        lane.request_move(LaneDir::Right, &tuning);
        for _ in 0..20 {
            lane.advance(0.05);
        }
        assert_eq!(lane.current_index, 2);

        assert!(lane.request_move(LaneDir::Left, &tuning));
        lane.advance(0.05);
        let mid = lane.position_x;
        assert!(mid < 2.5 && mid > 0.0);

        assert!(lane.request_move(LaneDir::Left, &tuning));
        assert_eq!(lane.current_index, 0);
        assert_eq!(lane.start_offset, mid);
        assert_ne!(lane.start_offset, tuning.lane_positions[1]);
        assert_eq!(lane.target_offset, -2.5);
    }

    #[test]
    fn test_reverse_mid_move_has_no_jump() {
        let tuning = Tuning::default();
        let mut lane = LaneState::centered(&tuning);
        lane.request_move(LaneDir::Right, &tuning);
        lane.advance(0.07);
        let x = lane.position_x;

        lane.request_move(LaneDir::Left, &tuning);
        lane.advance(0.0);
        assert_eq!(lane.position_x, x);
    }

    proptest! {
        #[test]
        fn prop_idempotent_at_rest(steps in proptest::collection::vec(0.0f32..0.05, 1..40)) {
            let tuning = Tuning::default();
            let mut lane = LaneState::centered(&tuning);
            lane.request_move(LaneDir::Left, &tuning);
            lane.advance(tuning.lane_change_duration);
            prop_assert_eq!(lane.position_x, lane.target_offset);
            for dt in steps {
                lane.advance(dt);
                prop_assert_eq!(lane.position_x, lane.target_offset);
            }
        }
    }
}
