//! Jump admission: ground-buffer and air-buffer windows

use crate::config::JumpConfig;
use crate::motion::MotionState;

/// A forgiveness window measured from a recorded timestamp
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpWindow {
    pub duration: f64,
}

impl JumpWindow {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }

    /// True when `since` is recorded and less than `duration` ago
    pub fn contains(&self, since: Option<f64>, now: f64) -> bool {
        since.is_some_and(|t| now - t < self.duration)
    }
}

/// What to do with a jump press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpDecision {
    /// Start the jump this tick
    Fire,
    /// Remember the press for the air-buffer window
    Buffer,
}

/// The two independent jump windows.
///
/// The ground buffer forgives a late press after walking off an edge; the air
/// buffer forgives an early press before touching down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpBuffer {
    pub ground: JumpWindow,
    pub air: JumpWindow,
}

impl JumpBuffer {
    pub fn new(ground_buffer: f64, air_buffer: f64) -> Self {
        Self {
            ground: JumpWindow::new(ground_buffer),
            air: JumpWindow::new(air_buffer),
        }
    }

    pub fn from_config(config: &JumpConfig) -> Self {
        Self::new(config.ground_buffer, config.air_buffer)
    }

    /// Grounded, or recently walked off an edge.
    ///
    /// A departure caused by jumping earns no grace, so a second press during
    /// the ascent cannot double-fire.
    pub fn can_jump(&self, motion: &MotionState, now: f64) -> bool {
        motion.grounded
            || (self.ground.contains(motion.left_ground_at, now) && !motion.left_ground_via_jump)
    }

    pub fn on_press(&self, motion: &MotionState, now: f64) -> JumpDecision {
        if self.can_jump(motion, now) {
            JumpDecision::Fire
        } else {
            JumpDecision::Buffer
        }
    }

    /// On landing: take the buffered press if it is still inside the air window.
    ///
    /// The stored press is cleared either way; an expired press is dropped.
    pub fn take_landing_jump(&self, motion: &mut MotionState, now: f64) -> bool {
        let pressed_at = motion.buffered_jump_at.take();
        self.air.contains(pressed_at, now)
    }
}
