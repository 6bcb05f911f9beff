//! Per-character motion bookkeeping

use gravflip_core::Vec3;

/// Velocity and the jump/ground timestamps the buffers compare against.
///
/// Timestamps are simulation seconds; `None` means "never".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionState {
    /// Per-tick displacement submitted to the motor
    pub velocity: Vec3,
    pub grounded: bool,
    /// When the character last left the ground
    pub left_ground_at: Option<f64>,
    /// Whether that departure was a jump (jumps earn no ground-buffer grace)
    pub left_ground_via_jump: bool,
    /// Jump button state on the previous tick, for press-edge detection
    pub jump_held: bool,
    /// A press that could not fire, waiting for a landing
    pub buffered_jump_at: Option<f64>,
}

impl MotionState {
    /// Seconds airborne, `0` when no departure is recorded
    pub fn airborne_for(&self, now: f64) -> f64 {
        self.left_ground_at.map(|t| now - t).unwrap_or(0.0)
    }

    /// Landing clears the departure bookkeeping
    pub fn land(&mut self) {
        self.left_ground_at = None;
        self.left_ground_via_jump = false;
    }
}
