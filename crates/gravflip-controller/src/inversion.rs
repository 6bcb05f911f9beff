//! Gravity inversion trigger volumes
//!
//! A zone arms when an eligible occupant enters (disabling its floor so the
//! occupant falls through), then fires once the occupant has passed the zone
//! centre by at least its own height, handing the occupant a new gravity
//! direction that points back the way it came.

use gravflip_core::{EntityId, GravflipError, Result, Vec3};
use tracing::{debug, warn};

/// Anything whose gravity direction can be replaced
pub trait GravityReceiver {
    /// Replace the gravity direction. Degenerate directions are rejected and
    /// leave the previous gravity in place.
    fn update_gravity_direction(&mut self, direction: Vec3) -> Result<()>;
}

/// What an inversion zone needs to know about a character overlapping it
pub trait InversionOccupant: GravityReceiver {
    fn occupant_id(&self) -> EntityId;
    fn position(&self) -> Vec3;
    /// Per-tick displacement
    fn velocity(&self) -> Vec3;
    /// Distance the occupant must clear past the zone centre before a flip
    fn height(&self) -> f32;
    fn can_invert(&self) -> bool;
}

/// The collidable floor a zone suppresses while armed
pub trait FloorSurface {
    fn set_enabled(&mut self, enabled: bool);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneState {
    #[default]
    Idle,
    Armed { occupant: EntityId },
}

/// Result of feeding one overlap callback to a zone
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoneOutcome {
    None,
    /// Floor disabled, waiting for the occupant to pass through
    Armed,
    /// Floor restored and the occupant accepted the new gravity
    Fired { direction: Vec3 },
    /// Floor restored but the occupant refused the direction
    Rejected,
    /// Occupant left while ineligible; floor restored without a flip
    Disarmed,
}

#[derive(Clone, Debug)]
pub struct GravityInversionZone {
    id: EntityId,
    center: Vec3,
    up: Vec3,
    state: ZoneState,
}

impl GravityInversionZone {
    /// `up` is the zone's axis; the flip direction is always parallel to it.
    pub fn new(center: Vec3, up: Vec3) -> Result<Self> {
        if !up.is_finite() || up.length_squared() < 1e-12 {
            return Err(GravflipError::InvalidConfig(format!(
                "inversion zone axis must be non-zero, got {up}"
            )));
        }
        Ok(Self {
            id: EntityId::new(),
            center,
            up: up.normalize(),
            state: ZoneState::Idle,
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn state(&self) -> ZoneState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, ZoneState::Armed { .. })
    }

    fn armed_for(&self, occupant: EntityId) -> bool {
        self.state == ZoneState::Armed { occupant }
    }

    pub fn on_enter<O, F>(&mut self, occupant: &mut O, floor: &mut F) -> ZoneOutcome
    where
        O: InversionOccupant + ?Sized,
        F: FloorSurface + ?Sized,
    {
        if self.state == ZoneState::Idle && occupant.can_invert() {
            self.arm(occupant.occupant_id(), floor)
        } else {
            ZoneOutcome::None
        }
    }

    /// Called every tick the occupant still overlaps the zone
    pub fn on_stay<O, F>(&mut self, occupant: &mut O, floor: &mut F) -> ZoneOutcome
    where
        O: InversionOccupant + ?Sized,
        F: FloorSurface + ?Sized,
    {
        match self.state {
            ZoneState::Idle if occupant.can_invert() => self.arm(occupant.occupant_id(), floor),
            ZoneState::Armed { occupant: id } if id == occupant.occupant_id() => {
                if !occupant.can_invert() {
                    return ZoneOutcome::None;
                }
                let (offset, direction) = self.flip_geometry(occupant);
                let h = occupant.height();
                if offset.dot(direction) < 0.0 && offset.length_squared() >= h * h {
                    self.fire(occupant, floor, direction)
                } else {
                    ZoneOutcome::None
                }
            }
            _ => ZoneOutcome::None,
        }
    }

    pub fn on_exit<O, F>(&mut self, occupant: &mut O, floor: &mut F) -> ZoneOutcome
    where
        O: InversionOccupant + ?Sized,
        F: FloorSurface + ?Sized,
    {
        if !self.armed_for(occupant.occupant_id()) {
            return ZoneOutcome::None;
        }
        if occupant.can_invert() {
            let (_, direction) = self.flip_geometry(occupant);
            self.fire(occupant, floor, direction)
        } else {
            debug!(zone = %self.id, "occupant left ineligible, disarming");
            floor.set_enabled(true);
            self.state = ZoneState::Idle;
            ZoneOutcome::Disarmed
        }
    }

    /// Occupant offset from the centre along the zone axis, and the axis
    /// direction opposing the occupant's motion.
    fn flip_geometry<O: InversionOccupant + ?Sized>(&self, occupant: &O) -> (Vec3, Vec3) {
        let offset = self.up * (occupant.position() - self.center).dot(self.up);
        let direction = (-self.up * occupant.velocity().dot(self.up)).normalize_or_zero();
        (offset, direction)
    }

    fn arm<F: FloorSurface + ?Sized>(&mut self, occupant: EntityId, floor: &mut F) -> ZoneOutcome {
        debug!(zone = %self.id, %occupant, "armed");
        floor.set_enabled(false);
        self.state = ZoneState::Armed { occupant };
        ZoneOutcome::Armed
    }

    fn fire<O, F>(&mut self, occupant: &mut O, floor: &mut F, direction: Vec3) -> ZoneOutcome
    where
        O: InversionOccupant + ?Sized,
        F: FloorSurface + ?Sized,
    {
        floor.set_enabled(true);
        self.state = ZoneState::Idle;

        match occupant.update_gravity_direction(direction) {
            Ok(()) => {
                debug!(zone = %self.id, ?direction, "fired");
                ZoneOutcome::Fired { direction }
            }
            Err(e) => {
                warn!(zone = %self.id, "occupant rejected inversion: {e}");
                ZoneOutcome::Rejected
            }
        }
    }
}
