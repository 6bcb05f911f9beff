//! Capsule height transition between standing and crouched

use crate::collab::{ShapeCastProbe, SweepQuery};
use crate::config::CrouchConfig;
use gravflip_core::Vec3;
use tracing::{trace, warn};

const HEIGHT_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStatus {
    Done,
    InProgress,
}

/// Result of advancing the transition by one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrouchStep {
    pub status: TransitionStatus,
    /// Height lost this tick (negative while growing).
    ///
    /// Translating the body along gravity by half of this keeps the feet
    /// plane fixed while the capsule resizes about its centre.
    pub height_shift: f32,
}

/// Drives the capsule between two height presets.
///
/// The transition is a plain state object advanced once per fixed tick. The
/// target is re-read every tick, so flipping intent mid-transition retargets
/// from the current height instead of restarting.
#[derive(Clone, Debug)]
pub struct CrouchAnimator {
    standing_height: f32,
    crouched_height: f32,
    rate: f32,
    uncrouch_margin: f32,
    /// Probe reach when standing (half height plus skin)
    standing_reach: f32,
    height: f32,
    wants_crouched: bool,
    transitioning: bool,
}

impl CrouchAnimator {
    pub fn new(config: &CrouchConfig, skin_width: f32) -> Self {
        Self {
            standing_height: config.standing_height,
            crouched_height: config.crouched_height,
            rate: config.rate,
            uncrouch_margin: config.uncrouch_margin,
            standing_reach: config.standing_height * 0.5 + skin_width,
            height: config.standing_height,
            wants_crouched: false,
            transitioning: false,
        }
    }

    pub fn is_crouched(&self) -> bool {
        self.wants_crouched
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Current full capsule height
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn target_height(&self) -> f32 {
        if self.wants_crouched {
            self.crouched_height
        } else {
            self.standing_height
        }
    }

    /// Crouching needs no clearance check.
    pub fn set_crouched(&mut self) {
        self.wants_crouched = true;
        self.start_transition();
    }

    /// Stand up if nothing is overhead; `false` leaves the character crouched.
    ///
    /// The sweep runs opposite `gravity` from `origin` for the standing reach
    /// minus the radius plus the configured margin. A probe failure counts as
    /// obstructed.
    pub fn try_uncrouch<P: ShapeCastProbe + ?Sized>(
        &mut self,
        probe: &P,
        origin: Vec3,
        gravity: Vec3,
        radius: f32,
        layers: u32,
    ) -> bool {
        let query = SweepQuery {
            origin,
            radius,
            direction: -gravity,
            max_distance: self.standing_reach - radius + self.uncrouch_margin,
            layers,
        };

        match probe.sweep(&query) {
            Ok(None) => {}
            Ok(Some(hit)) => {
                trace!(distance = hit.distance, "uncrouch blocked");
                return false;
            }
            Err(e) => {
                warn!("overhead probe failed, staying crouched: {e}");
                return false;
            }
        }

        self.wants_crouched = false;
        self.start_transition();
        true
    }

    /// Starting while already running is a no-op.
    fn start_transition(&mut self) {
        if !self.transitioning {
            self.transitioning = true;
        }
    }

    /// Move the height toward the current target by `rate * dt`.
    pub fn advance(&mut self, dt: f32) -> CrouchStep {
        if !self.transitioning {
            return CrouchStep {
                status: TransitionStatus::Done,
                height_shift: 0.0,
            };
        }

        let target = self.target_height();
        let start = self.height;
        let remaining = target - start;

        if remaining.abs() <= HEIGHT_EPSILON {
            self.height = target;
            self.transitioning = false;
            return CrouchStep {
                status: TransitionStatus::Done,
                height_shift: start - self.height,
            };
        }

        if dt <= 0.0 {
            return CrouchStep {
                status: TransitionStatus::InProgress,
                height_shift: 0.0,
            };
        }

        let step = remaining.signum() * self.rate * dt;
        let status = if step.abs() >= remaining.abs() {
            self.height = target;
            self.transitioning = false;
            TransitionStatus::Done
        } else {
            self.height = start + step;
            TransitionStatus::InProgress
        };
        self.height = self
            .height
            .clamp(self.crouched_height, self.standing_height);

        CrouchStep {
            status,
            height_shift: start - self.height,
        }
    }
}
