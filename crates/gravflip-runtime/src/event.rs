//! Typed game events

use gravflip_core::{EntityId, Vec3};

/// Events emitted by the controller and the physics layer for presentation,
/// audio, and debugging collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A character started overlapping a trigger volume
    TriggerEntered { entity: EntityId, trigger: EntityId },
    /// A character stopped overlapping a trigger volume
    TriggerExited { entity: EntityId, trigger: EntityId },
    /// An inversion zone disabled its floor for an eligible occupant
    ZoneArmed { zone: EntityId, occupant: EntityId },
    /// An inversion zone fired and handed a new gravity direction over
    ZoneFired { zone: EntityId, occupant: EntityId, direction: Vec3 },
    /// A character's gravity direction changed
    GravityFlipped { entity: EntityId, direction: Vec3 },
    /// A jump started; `buffered` when a stored press fired on landing
    JumpStarted { entity: EntityId, buffered: bool },
    LeftGround { entity: EntityId },
    Landed { entity: EntityId },
    CrouchChanged { entity: EntityId, crouched: bool },
}
