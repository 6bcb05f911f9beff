//! Spatial types and vector helpers

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Canonical world "down" (default gravity direction)
pub const DOWN: Vec3 = Vec3::NEG_Y;
/// Canonical world "up"
pub const UP: Vec3 = Vec3::Y;
/// Local forward axis of a body (right-handed, -Z forward)
pub const FORWARD: Vec3 = Vec3::NEG_Z;
/// Local right axis of a body
pub const RIGHT: Vec3 = Vec3::X;

/// A rigid transform: position and orientation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * RIGHT
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * UP
    }

    /// Rotate about the transform's own up axis
    pub fn rotate_local_y(&mut self, angle_rad: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle_rad)).normalize();
    }
}

/// Component of `v` along the unit direction `axis`
pub fn component_along(v: Vec3, axis: Vec3) -> Vec3 {
    axis * v.dot(axis)
}

/// `v` with its component along the unit direction `axis` removed
pub fn without_component(v: Vec3, axis: Vec3) -> Vec3 {
    v - component_along(v, axis)
}

/// Clamp each axis of `v` into `[-max, max]`
pub fn clamp_per_axis(v: Vec3, max: f32) -> Vec3 {
    v.clamp(Vec3::splat(-max), Vec3::splat(max))
}

/// Per-axis weight `1 - |axis component|` of a unit direction.
///
/// Multiplying a velocity by this mask zeroes the axes the direction lies on
/// and keeps the others untouched. Exact for axis-aligned directions.
pub fn orthogonal_mask(dir: Vec3) -> Vec3 {
    Vec3::ONE - dir.abs()
}
