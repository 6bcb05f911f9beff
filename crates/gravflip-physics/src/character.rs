//! Character probe and motor on a kinematic Rapier capsule

use crate::world::{capsule_shape, from_na, quat_from_na, quat_to_na, to_na, PhysicsWorld};
use gravflip_controller::{CharacterMotor, ShapeCastProbe, SweepHit, SweepQuery};
use gravflip_core::{GravflipError, Quat, Result, Vec3, UP};
use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::na;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;
use tracing::warn;

/// Handles of the character's body and capsule, plus Rapier's collide-and-slide
/// mover. Resolved once; per tick it lends out a [`RapierCharacter`].
pub struct CharacterBinding {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    mover: KinematicCharacterController,
    radius: f32,
}

impl CharacterBinding {
    /// Fails with `MissingCollaborator` if either handle is unknown to `world`.
    pub fn new(
        world: &PhysicsWorld,
        body: RigidBodyHandle,
        collider: ColliderHandle,
        radius: f32,
    ) -> Result<Self> {
        if world.get_rigid_body(body).is_none() {
            return Err(GravflipError::MissingCollaborator(format!(
                "character body {body:?}"
            )));
        }
        if world.collider_set.get(collider).is_none() {
            return Err(GravflipError::MissingCollaborator(format!(
                "character collider {collider:?}"
            )));
        }

        // Ground handling lives in the controller, so no snapping or stepping here
        let mover = KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            autostep: None,
            snap_to_ground: None,
            ..KinematicCharacterController::default()
        };

        Ok(Self {
            body,
            collider,
            mover,
            radius,
        })
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    /// Borrow the world as this character's probe + motor for one tick
    pub fn env<'a>(&'a mut self, world: &'a mut PhysicsWorld, dt: f32) -> Result<RapierCharacter<'a>> {
        let body = world.get_rigid_body(self.body).ok_or_else(|| {
            GravflipError::MissingCollaborator(format!("character body {:?}", self.body))
        })?;
        let position = from_na(body.translation());
        let rotation = *body.rotation();

        Ok(RapierCharacter {
            world,
            binding: self,
            dt,
            position,
            rotation,
        })
    }
}

/// Tick-scoped view implementing the controller's collaborator traits.
///
/// Motion is written as the body's next kinematic position; the world step
/// applies it.
pub struct RapierCharacter<'a> {
    world: &'a mut PhysicsWorld,
    binding: &'a mut CharacterBinding,
    dt: f32,
    position: Vec3,
    rotation: Rotation<Real>,
}

fn is_enabled(_handle: ColliderHandle, collider: &Collider) -> bool {
    collider.is_enabled()
}

impl RapierCharacter<'_> {
    pub fn rotation(&self) -> Quat {
        quat_from_na(&self.rotation)
    }

    fn write_pose(&mut self) {
        let pose = Isometry::from_parts(to_na(self.position).into(), self.rotation);
        match self.world.get_rigid_body_mut(self.binding.body) {
            Some(body) => body.set_next_kinematic_position(pose),
            None => warn!("character body vanished mid-tick"),
        }
    }
}

impl ShapeCastProbe for RapierCharacter<'_> {
    fn sweep(&self, query: &SweepQuery) -> Result<Option<SweepHit>> {
        if !(query.radius > 0.0 && query.direction.is_normalized() && query.origin.is_finite()) {
            return Err(GravflipError::ProbeError(format!(
                "malformed sweep {query:?}"
            )));
        }

        let shape = Ball::new(query.radius);
        let pose = Isometry::translation(query.origin.x, query.origin.y, query.origin.z);
        let groups = InteractionGroups::new(Group::ALL, Group::from_bits_truncate(query.layers));
        let filter = QueryFilter::default()
            .exclude_rigid_body(self.binding.body)
            .exclude_sensors()
            .groups(groups)
            .predicate(&is_enabled);

        let hit = self.world.query_pipeline.cast_shape(
            &self.world.rigid_body_set,
            &self.world.collider_set,
            &pose,
            &to_na(query.direction),
            &shape,
            ShapeCastOptions::with_max_time_of_impact(query.max_distance),
            filter,
        );

        Ok(hit.map(|(_, hit)| SweepHit {
            distance: hit.time_of_impact,
            normal: from_na(&hit.normal1),
        }))
    }
}

impl CharacterMotor for RapierCharacter<'_> {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn move_by(&mut self, displacement: Vec3) {
        let Some(collider) = self.world.collider_set.get(self.binding.collider) else {
            warn!("character collider missing, motion dropped");
            return;
        };
        let pose = Isometry::from_parts(to_na(self.position).into(), self.rotation);
        let filter = QueryFilter::default()
            .exclude_rigid_body(self.binding.body)
            .exclude_sensors()
            .predicate(&is_enabled);

        let corrected = self.binding.mover.move_shape(
            self.dt,
            &self.world.rigid_body_set,
            &self.world.collider_set,
            &self.world.query_pipeline,
            collider.shape(),
            &pose,
            to_na(displacement),
            filter,
            |_| {},
        );

        self.position += from_na(&corrected.translation);
        self.write_pose();
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = quat_to_na(rotation);
        self.binding.mover.up = na::Unit::new_normalize(to_na(rotation * UP));
        self.write_pose();
    }

    fn set_capsule_height(&mut self, height: f32) {
        let radius = self.binding.radius;
        match self.world.collider_set.get_mut(self.binding.collider) {
            Some(collider) => collider.set_shape(capsule_shape(radius, height)),
            None => warn!("character collider missing, resize dropped"),
        }
    }
}
