//! Gravflip Physics - Rapier 3D integration
//!
//! Binds the movement controller to a Rapier scene:
//! - `PhysicsWorld` - wraps Rapier pipeline, body/collider sets, level-building helpers
//! - `CharacterBinding` / `RapierCharacter` - shape-cast probe and collide-and-slide motor
//!   on a kinematic capsule
//! - `InversionZones` - sensor overlaps feeding the gravity inversion zones
//! - `PhysicsSystem` - implements `RuntimeSystem` for integration into the game loop

pub mod character;
pub mod world;
pub mod zones;

pub use rapier3d;

use character::CharacterBinding;
use gravflip_controller::{ControllerConfig, GravityInversionZone, MovementController};
use gravflip_core::{EntityId, GravflipError, Result, Vec3};
use gravflip_runtime::{ControlInput, EventBus, RuntimeSystem};
use rapier3d::prelude::ColliderHandle;
use tracing::{debug, info};
use world::{from_na, PhysicsWorld};
use zones::InversionZones;

/// Physics system implementing RuntimeSystem for the game loop
pub struct PhysicsSystem {
    pub physics_world: PhysicsWorld,
    pub controller: MovementController,
    pub zones: InversionZones,
    pub event_bus: EventBus,
    character: Option<CharacterBinding>,
}

impl PhysicsSystem {
    pub fn new(config: ControllerConfig) -> Result<Self> {
        Ok(Self {
            physics_world: PhysicsWorld::new(),
            controller: MovementController::new(config)?,
            zones: InversionZones::new(),
            event_bus: EventBus::new(),
            character: None,
        })
    }

    /// Create the kinematic capsule for the controller at `position`
    pub fn spawn_character(&mut self, position: Vec3) -> Result<()> {
        let radius = self.controller.config().body.radius;
        let height = self.controller.config().crouch.standing_height;

        let (body, collider) = self
            .physics_world
            .spawn_character(position, radius, height);
        self.attach_character(body, collider)
    }

    /// Drive an existing body/collider pair with the controller
    pub fn attach_character(
        &mut self,
        body: rapier3d::prelude::RigidBodyHandle,
        collider: ColliderHandle,
    ) -> Result<()> {
        let radius = self.controller.config().body.radius;
        self.character = Some(CharacterBinding::new(
            &self.physics_world,
            body,
            collider,
            radius,
        )?);
        Ok(())
    }

    /// Add a sensor box around `floor` that inverts gravity along `up`
    pub fn add_inversion_zone(
        &mut self,
        center: Vec3,
        up: Vec3,
        half_extents: Vec3,
        floor: ColliderHandle,
    ) -> Result<EntityId> {
        let zone = GravityInversionZone::new(center, up)?;
        let sensor = self.physics_world.add_sensor_box(center, half_extents);
        Ok(self.zones.add(zone, sensor, floor))
    }

    pub fn character_position(&self) -> Option<Vec3> {
        let binding = self.character.as_ref()?;
        self.physics_world
            .get_rigid_body(binding.body())
            .map(|body| from_na(body.translation()))
    }

    fn binding_mut(&mut self) -> Result<&mut CharacterBinding> {
        self.character
            .as_mut()
            .ok_or_else(|| GravflipError::MissingCollaborator("no character attached".into()))
    }
}

impl RuntimeSystem for PhysicsSystem {
    fn initialize(&mut self) -> Result<()> {
        self.binding_mut()?;
        self.physics_world.update_query_pipeline();
        info!(
            bodies = self.physics_world.rigid_body_set.len(),
            zones = self.zones.len(),
            "physics initialized"
        );
        Ok(())
    }

    fn fixed_update(&mut self, input: &ControlInput, now: f64, dt: f64) -> Result<()> {
        let binding = self
            .character
            .as_mut()
            .ok_or_else(|| GravflipError::MissingCollaborator("no character attached".into()))?;
        let character_collider = binding.collider();

        {
            let mut env = binding.env(&mut self.physics_world, dt as f32)?;
            self.controller.fixed_update(input, &mut env, now, dt);
        }
        for event in self.controller.drain_events() {
            self.event_bus.push(event);
        }

        if dt <= 0.0 {
            return Ok(());
        }

        self.physics_world.step(dt as f32);

        let collisions = self.physics_world.drain_collision_events();
        if !collisions.is_empty() {
            debug!(count = collisions.len(), "collision events");
        }
        self.zones.process(
            &collisions,
            character_collider,
            &mut self.controller,
            &mut self.physics_world.collider_set,
            &mut self.event_bus,
        );
        for event in self.controller.drain_events() {
            self.event_bus.push(event);
        }

        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        self.controller.update(dt);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "physics"
    }
}
