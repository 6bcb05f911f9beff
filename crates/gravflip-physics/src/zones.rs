//! Sensor overlaps driving gravity inversion zones

use gravflip_controller::{FloorSurface, GravityInversionZone, InversionOccupant, ZoneOutcome};
use gravflip_core::EntityId;
use gravflip_runtime::{EventBus, GameEvent};
use rapier3d::prelude::*;
use tracing::{trace, warn};

/// A floor collider toggled through the zone protocol
pub struct RapierFloor<'a> {
    colliders: &'a mut ColliderSet,
    handle: ColliderHandle,
}

impl<'a> RapierFloor<'a> {
    pub fn new(colliders: &'a mut ColliderSet, handle: ColliderHandle) -> Self {
        Self { colliders, handle }
    }
}

impl FloorSurface for RapierFloor<'_> {
    fn set_enabled(&mut self, enabled: bool) {
        match self.colliders.get_mut(self.handle) {
            Some(collider) => collider.set_enabled(enabled),
            None => warn!(floor = ?self.handle, "floor collider missing"),
        }
    }
}

/// One zone with its trigger sensor and the floor it suppresses
pub struct ZoneBinding {
    pub zone: GravityInversionZone,
    pub sensor: ColliderHandle,
    pub floor: ColliderHandle,
    occupied: bool,
    entered_this_tick: bool,
}

impl ZoneBinding {
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}

/// All inversion zones in the level.
///
/// Rapier reports only overlap start and stop, so a per-tick stay is
/// synthesized for every zone still occupied.
#[derive(Default)]
pub struct InversionZones {
    zones: Vec<ZoneBinding>,
}

impl InversionZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        zone: GravityInversionZone,
        sensor: ColliderHandle,
        floor: ColliderHandle,
    ) -> EntityId {
        let id = zone.id();
        self.zones.push(ZoneBinding {
            zone,
            sensor,
            floor,
            occupied: false,
            entered_this_tick: false,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&ZoneBinding> {
        self.zones.iter().find(|binding| binding.zone.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneBinding> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Feed one step's collision events for the occupant's collider, then
    /// run stays for zones it remains inside.
    pub fn process<O: InversionOccupant + ?Sized>(
        &mut self,
        collisions: &[CollisionEvent],
        occupant_collider: ColliderHandle,
        occupant: &mut O,
        colliders: &mut ColliderSet,
        events: &mut EventBus,
    ) {
        for collision in collisions {
            let (a, b) = (collision.collider1(), collision.collider2());
            let sensor = if a == occupant_collider {
                b
            } else if b == occupant_collider {
                a
            } else {
                continue;
            };
            let Some(binding) = self.zones.iter_mut().find(|z| z.sensor == sensor) else {
                continue;
            };

            let mut floor = RapierFloor::new(colliders, binding.floor);
            let trigger = binding.zone.id();
            let entity = occupant.occupant_id();

            let outcome = if collision.started() {
                binding.occupied = true;
                binding.entered_this_tick = true;
                events.push(GameEvent::TriggerEntered { entity, trigger });
                binding.zone.on_enter(occupant, &mut floor)
            } else {
                binding.occupied = false;
                events.push(GameEvent::TriggerExited { entity, trigger });
                binding.zone.on_exit(occupant, &mut floor)
            };
            report(&binding.zone, entity, outcome, events);
        }

        for binding in &mut self.zones {
            if binding.occupied && !binding.entered_this_tick {
                let mut floor = RapierFloor::new(colliders, binding.floor);
                let outcome = binding.zone.on_stay(occupant, &mut floor);
                report(&binding.zone, occupant.occupant_id(), outcome, events);
            }
            binding.entered_this_tick = false;
        }
    }
}

fn report(zone: &GravityInversionZone, occupant: EntityId, outcome: ZoneOutcome, events: &mut EventBus) {
    match outcome {
        ZoneOutcome::Armed => events.push(GameEvent::ZoneArmed {
            zone: zone.id(),
            occupant,
        }),
        ZoneOutcome::Fired { direction } => events.push(GameEvent::ZoneFired {
            zone: zone.id(),
            occupant,
            direction,
        }),
        ZoneOutcome::None => {}
        other => trace!(zone = %zone.id(), ?other, "zone outcome"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::PhysicsWorld;
    use gravflip_controller::GravityReceiver;
    use gravflip_core::{Result, Vec3};

    struct Faller {
        id: EntityId,
        position: Vec3,
        flips: Vec<Vec3>,
    }

    impl GravityReceiver for Faller {
        fn update_gravity_direction(&mut self, direction: Vec3) -> Result<()> {
            self.flips.push(direction);
            Ok(())
        }
    }

    impl InversionOccupant for Faller {
        fn occupant_id(&self) -> EntityId {
            self.id
        }
        fn position(&self) -> Vec3 {
            self.position
        }
        fn velocity(&self) -> Vec3 {
            Vec3::new(0.0, -0.5, 0.0)
        }
        fn height(&self) -> f32 {
            1.0
        }
        fn can_invert(&self) -> bool {
            self.flips.is_empty()
        }
    }

    fn setup() -> (PhysicsWorld, InversionZones, EntityId, ColliderHandle, ColliderHandle, ColliderHandle) {
        let mut world = PhysicsWorld::new();
        let floor = world.add_fixed_box(Vec3::ZERO, Vec3::new(5.0, 0.25, 5.0));
        let sensor = world.add_sensor_box(Vec3::ZERO, Vec3::new(5.0, 2.5, 5.0));
        let (_, character) = world.spawn_character(Vec3::new(0.0, 8.0, 0.0), 0.5, 2.0);

        let mut zones = InversionZones::new();
        let zone = GravityInversionZone::new(Vec3::ZERO, Vec3::Y).unwrap();
        let id = zones.add(zone, sensor, floor);
        (world, zones, id, floor, sensor, character)
    }

    fn faller(y: f32) -> Faller {
        Faller {
            id: EntityId::new(),
            position: Vec3::new(0.0, y, 0.0),
            flips: Vec::new(),
        }
    }

    #[test]
    fn enter_stay_exit_drive_zone() {
        let (mut world, mut zones, id, floor, sensor, character) = setup();
        let mut occupant = faller(2.0);
        let mut events = EventBus::new();

        let started = [CollisionEvent::Started(sensor, character, CollisionEventFlags::SENSOR)];
        zones.process(&started, character, &mut occupant, &mut world.collider_set, &mut events);
        assert!(zones.get(id).unwrap().is_occupied());
        assert!(!world.is_collider_enabled(floor));

        // Still above the fire line
        zones.process(&[], character, &mut occupant, &mut world.collider_set, &mut events);
        assert!(occupant.flips.is_empty());

        occupant.position.y = -1.5;
        zones.process(&[], character, &mut occupant, &mut world.collider_set, &mut events);
        assert_eq!(occupant.flips.len(), 1);
        assert!(world.is_collider_enabled(floor));

        let stopped = [CollisionEvent::Stopped(sensor, character, CollisionEventFlags::SENSOR)];
        zones.process(&stopped, character, &mut occupant, &mut world.collider_set, &mut events);
        assert!(!zones.get(id).unwrap().is_occupied());

        let kinds: Vec<_> = events
            .drain()
            .into_iter()
            .map(|e| match e {
                GameEvent::TriggerEntered { .. } => "enter",
                GameEvent::ZoneArmed { .. } => "armed",
                GameEvent::ZoneFired { .. } => "fired",
                GameEvent::TriggerExited { .. } => "exit",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["enter", "armed", "fired", "exit"]);
    }

    #[test]
    fn unrelated_collisions_ignored() {
        let (mut world, mut zones, id, floor, sensor, character) = setup();
        let mut occupant = faller(2.0);
        let mut events = EventBus::new();

        let other = [CollisionEvent::Started(sensor, floor, CollisionEventFlags::SENSOR)];
        zones.process(&other, character, &mut occupant, &mut world.collider_set, &mut events);

        assert!(!zones.get(id).unwrap().is_occupied());
        assert!(world.is_collider_enabled(floor));
        assert!(events.is_empty());
    }
}
