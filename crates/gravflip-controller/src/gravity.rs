//! Current gravity direction and its derived quantities

use gravflip_core::{
    component_along, orthogonal_mask, without_component, GravflipError, Quat, Result, Vec3, DOWN,
};

/// Holds the unit gravity direction, the rotation taking canonical down onto
/// it, the orthogonal mask, and when it last changed.
///
/// The direction only changes through [`GravityState::set_direction`], which
/// rejects degenerate requests and keeps the previous value.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityState {
    direction: Vec3,
    rotation: Quat,
    orthogonal_mask: Vec3,
    last_flip: Option<f64>,
}

/// What a successful gravity update changed, for reorientation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityChange {
    pub previous_direction: Vec3,
    pub previous_rotation: Quat,
    pub direction: Vec3,
    pub rotation: Quat,
}

impl GravityChange {
    /// Rotation taking the old gravity frame onto the new one
    pub fn delta(&self) -> Quat {
        (self.rotation * self.previous_rotation.inverse()).normalize()
    }
}

impl Default for GravityState {
    fn default() -> Self {
        Self {
            direction: DOWN,
            rotation: Quat::IDENTITY,
            orthogonal_mask: orthogonal_mask(DOWN),
            last_flip: None,
        }
    }
}

impl GravityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Opposite of gravity
    pub fn up(&self) -> Vec3 {
        -self.direction
    }

    /// Shortest rotation from canonical down to the current direction
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn orthogonal_mask(&self) -> Vec3 {
        self.orthogonal_mask
    }

    pub fn last_flip(&self) -> Option<f64> {
        self.last_flip
    }

    /// Seconds since the last flip, `None` if gravity never changed
    pub fn seconds_since_flip(&self, now: f64) -> Option<f64> {
        self.last_flip.map(|t| now - t)
    }

    /// Signed speed of `v` along gravity (positive = falling)
    pub fn speed_along(&self, v: Vec3) -> f32 {
        v.dot(self.direction)
    }

    /// Gravity-aligned component of `v`
    pub fn along(&self, v: Vec3) -> Vec3 {
        component_along(v, self.direction)
    }

    /// `v` with the gravity-aligned component removed
    pub fn across(&self, v: Vec3) -> Vec3 {
        without_component(v, self.direction)
    }

    /// Zero the gravity axes of `v` while leaving lateral axes untouched
    pub fn mask(&self, v: Vec3) -> Vec3 {
        v * self.orthogonal_mask
    }

    /// Replace the gravity direction with the normalized `requested` vector.
    pub fn set_direction(&mut self, requested: Vec3, now: f64) -> Result<GravityChange> {
        let degenerate = || GravflipError::DegenerateGravity {
            x: requested.x,
            y: requested.y,
            z: requested.z,
        };
        let scale = requested.abs().max_element();
        if !requested.is_finite() || scale < 1e-6 {
            return Err(degenerate());
        }

        // Pre-scaled so huge components cannot overflow the length
        let direction = (requested / scale).try_normalize().ok_or_else(degenerate)?;
        let change = GravityChange {
            previous_direction: self.direction,
            previous_rotation: self.rotation,
            direction,
            rotation: Quat::from_rotation_arc(DOWN, direction),
        };

        self.direction = direction;
        self.rotation = change.rotation;
        self.orthogonal_mask = orthogonal_mask(direction);
        self.last_flip = Some(now);

        Ok(change)
    }
}
