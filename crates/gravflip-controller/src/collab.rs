//! Collaborator contracts the controller is driven through
//!
//! The controller never touches a physics engine directly. It asks a
//! `ShapeCastProbe` whether a sweep hits anything and hands a per-tick
//! displacement to a `CharacterMotor`, which owns collision response.

use gravflip_core::{Quat, Result, Vec3};

/// A sphere sweep request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepQuery {
    pub origin: Vec3,
    pub radius: f32,
    /// Unit sweep direction
    pub direction: Vec3,
    pub max_distance: f32,
    /// Collision layers to test against
    pub layers: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    pub distance: f32,
    pub normal: Vec3,
}

/// Opaque shape-cast query used for ground and overhead detection
pub trait ShapeCastProbe {
    /// `Ok(None)` is a clean miss; `Err` means the query could not run.
    fn sweep(&self, query: &SweepQuery) -> Result<Option<SweepHit>>;
}

/// Opaque collision-resolving mover for the character body
pub trait CharacterMotor {
    /// Current body origin (capsule centre)
    fn position(&self) -> Vec3;

    /// Translate by `displacement`, resolving collisions
    fn move_by(&mut self, displacement: Vec3);

    /// Body orientation changed (look yaw or gravity flip)
    fn set_rotation(&mut self, _rotation: Quat) {}

    /// Capsule full height changed during a crouch transition
    fn set_capsule_height(&mut self, _height: f32) {}
}

/// Everything one tick needs from the world
pub trait CharacterEnv: ShapeCastProbe + CharacterMotor {}

impl<T: ShapeCastProbe + CharacterMotor + ?Sized> CharacterEnv for T {}
