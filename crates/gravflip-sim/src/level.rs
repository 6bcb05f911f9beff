//! Demo level: a thin slab wrapped in an inversion zone

use gravflip_core::{EntityId, Result, Vec3};
use gravflip_physics::rapier3d::prelude::ColliderHandle;
use gravflip_physics::PhysicsSystem;

/// Layout of the demo scene, all in world units
#[derive(Debug, Clone)]
pub struct DemoLevel {
    pub slab_half_extents: Vec3,
    /// Half height of the trigger volume around the slab
    pub zone_half_height: f32,
    /// Where the character capsule is centred at start
    pub spawn: Vec3,
}

impl Default for DemoLevel {
    fn default() -> Self {
        Self {
            slab_half_extents: Vec3::new(30.0, 0.05, 30.0),
            zone_half_height: 2.5,
            spawn: Vec3::new(0.0, 6.0, 0.0),
        }
    }
}

/// Handles into the built scene
#[derive(Debug, Clone, Copy)]
pub struct LevelHandles {
    pub slab: ColliderHandle,
    pub zone: EntityId,
}

impl DemoLevel {
    pub fn build(&self, system: &mut PhysicsSystem) -> Result<LevelHandles> {
        let slab = system
            .physics_world
            .add_fixed_box(Vec3::ZERO, self.slab_half_extents);
        let zone_extents = Vec3::new(
            self.slab_half_extents.x,
            self.zone_half_height,
            self.slab_half_extents.z,
        );
        let zone = system.add_inversion_zone(Vec3::ZERO, Vec3::Y, zone_extents, slab)?;
        system.spawn_character(self.spawn)?;

        Ok(LevelHandles { slab, zone })
    }
}
