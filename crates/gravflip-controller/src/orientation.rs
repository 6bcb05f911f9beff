//! Body and camera reorientation across gravity flips

use crate::gravity::GravityChange;
use gravflip_core::{Mat3, Quat, Transform, Vec3, FORWARD};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// How the body's heading is fixed up after a flip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipCorrection {
    /// New up is opposite the new gravity; forward is the old forward
    /// projected onto the new horizontal plane. Valid for any gravity axis.
    #[default]
    PreserveHeading,
    /// Compose the gravity delta in the body frame and add a half turn about
    /// up. Only correct when flipping between straight up and straight down.
    HalfTurn,
}

/// Computes the body orientation after a gravity change
#[derive(Clone, Copy, Debug, Default)]
pub struct OrientationSync {
    pub correction: FlipCorrection,
}

impl OrientationSync {
    pub fn new(correction: FlipCorrection) -> Self {
        Self { correction }
    }

    pub fn reorient(&self, body: Quat, change: &GravityChange) -> Quat {
        match self.correction {
            FlipCorrection::HalfTurn => {
                (body * change.delta() * Quat::from_rotation_y(PI)).normalize()
            }
            FlipCorrection::PreserveHeading => preserve_heading(body, change),
        }
    }
}

fn preserve_heading(body: Quat, change: &GravityChange) -> Quat {
    let up = -change.direction;
    let forward = body * FORWARD;
    let planar = forward - up * forward.dot(up);

    if planar.length_squared() < 1e-6 {
        // Looking straight along the new gravity axis: no heading to keep
        return (change.delta() * body).normalize();
    }

    let forward = planar.normalize();
    let right = forward.cross(up);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}

/// First-person camera mounted on the body.
///
/// Pitch is an absolute angle clamped to [-90°, 90°]. After a flip the camera
/// carries a correction rotation that keeps its world view exactly where it
/// was at the flip instant, then eases it out on the presentation tick.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pitch_deg: f32,
    flip_correction: Quat,
    settle_time: f32,
    settle_remaining: f32,
    eye_height: f32,
}

impl CameraRig {
    pub fn new(settle_time: f32, eye_height: f32) -> Self {
        Self {
            pitch_deg: 0.0,
            flip_correction: Quat::IDENTITY,
            settle_time,
            settle_remaining: 0.0,
            eye_height,
        }
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    pub fn flip_correction(&self) -> Quat {
        self.flip_correction
    }

    pub fn is_settling(&self) -> bool {
        self.settle_remaining > 0.0
    }

    /// Positive looks up
    pub fn apply_pitch(&mut self, delta_deg: f32) {
        self.pitch_deg = (self.pitch_deg + delta_deg).clamp(-90.0, 90.0);
    }

    /// The body just turned from `old_body` to `new_body`; absorb the change
    /// so the rendered view does not snap.
    pub fn on_body_flip(&mut self, old_body: Quat, new_body: Quat) {
        self.flip_correction = (new_body.inverse() * old_body * self.flip_correction).normalize();
        if self.settle_time > 0.0 {
            self.settle_remaining = self.settle_time;
        } else {
            self.flip_correction = Quat::IDENTITY;
        }
    }

    /// Presentation tick: ease the flip correction toward identity so it is
    /// gone exactly `settle_time` after the flip.
    pub fn update(&mut self, dt: f32) {
        if self.settle_remaining <= 0.0 || dt <= 0.0 {
            return;
        }
        if dt >= self.settle_remaining - 1e-6 {
            self.flip_correction = Quat::IDENTITY;
            self.settle_remaining = 0.0;
            return;
        }
        let t = dt / self.settle_remaining;
        self.flip_correction = self.flip_correction.slerp(Quat::IDENTITY, t).normalize();
        self.settle_remaining -= dt;
    }

    /// Rotation relative to the body
    pub fn local_rotation(&self) -> Quat {
        self.flip_correction * Quat::from_rotation_x(self.pitch_deg.to_radians())
    }

    pub fn view_rotation(&self, body: Quat) -> Quat {
        (body * self.local_rotation()).normalize()
    }

    pub fn view_forward(&self, body: Quat) -> Vec3 {
        self.view_rotation(body) * FORWARD
    }

    /// Eye position above the body origin along body up
    pub fn eye_position(&self, body: &Transform, half_height: f32) -> Vec3 {
        body.position + body.up() * half_height * self.eye_height
    }
}
