//! Gravflip Controller - first-person movement under runtime-reorientable gravity
//!
//! - `MovementController` - per-tick orchestration of look, crouch, ground probing,
//!   vertical integration, jump buffering, and motion submission
//! - `GravityState` / `OrientationSync` / `CameraRig` - gravity direction and the
//!   body/camera reorientation that follows a flip
//! - `VerticalIntegrator` - rise/fall response-curve velocity model
//! - `JumpBuffer` - ground-buffer and air-buffer admission windows
//! - `CrouchAnimator` - resumable capsule-height transition
//! - `GravityInversionZone` - trigger-volume arm/fire protocol
//!
//! Collision queries and motion are consumed through the `ShapeCastProbe` and
//! `CharacterMotor` traits; `gravflip-physics` provides the rapier binding.

pub mod collab;
pub mod config;
pub mod crouch;
pub mod gravity;
pub mod inversion;
pub mod jump;
pub mod motion;
pub mod movement;
pub mod orientation;
pub mod vertical;

#[cfg(test)]
pub(crate) mod testing;

pub use collab::{CharacterEnv, CharacterMotor, ShapeCastProbe, SweepHit, SweepQuery};
pub use config::ControllerConfig;
pub use crouch::{CrouchAnimator, CrouchStep, TransitionStatus};
pub use gravity::{GravityChange, GravityState};
pub use inversion::{
    FloorSurface, GravityInversionZone, GravityReceiver, InversionOccupant, ZoneOutcome, ZoneState,
};
pub use jump::{JumpBuffer, JumpDecision, JumpWindow};
pub use motion::MotionState;
pub use movement::{Gait, MovementController};
pub use orientation::{CameraRig, FlipCorrection, OrientationSync};
pub use vertical::{CurvePhase, VerticalIntegrator};
