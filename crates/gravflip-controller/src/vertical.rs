//! Response-curve vertical velocity model

use crate::config::VerticalConfig;
use gravflip_core::{clamp_per_axis, without_component, ResponseCurve, Vec3};

/// Which curve drives this tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurvePhase {
    Rise,
    Fall,
}

impl CurvePhase {
    /// Rise only while airborne from a jump with the button still held
    pub fn select(left_ground_via_jump: bool, jump_held: bool) -> Self {
        if left_ground_via_jump && jump_held {
            CurvePhase::Rise
        } else {
            CurvePhase::Fall
        }
    }
}

/// Integrates velocity against gravity from two authored curves.
///
/// Curve values are signed contributions opposite gravity: positive pushes
/// up, negative pulls along gravity. Curves are sampled over `[0, 1]` seconds
/// of airtime.
#[derive(Clone, Debug)]
pub struct VerticalIntegrator {
    rise: ResponseCurve,
    fall: ResponseCurve,
    max_directional_velocity: f32,
}

impl VerticalIntegrator {
    pub fn new(rise: ResponseCurve, fall: ResponseCurve, max_directional_velocity: f32) -> Self {
        Self {
            rise,
            fall,
            max_directional_velocity,
        }
    }

    pub fn from_config(config: &VerticalConfig) -> Self {
        Self::new(
            config.rise.clone(),
            config.fall.clone(),
            config.max_directional_velocity,
        )
    }

    pub fn max_directional_velocity(&self) -> f32 {
        self.max_directional_velocity
    }

    fn curve(&self, phase: CurvePhase) -> &ResponseCurve {
        match phase {
            CurvePhase::Rise => &self.rise,
            CurvePhase::Fall => &self.fall,
        }
    }

    /// One airborne tick: sample the curve at the clamped airtime, accumulate
    /// opposite `gravity`, clamp per axis.
    pub fn integrate(
        &self,
        velocity: Vec3,
        gravity: Vec3,
        airborne_for: f32,
        phase: CurvePhase,
        dt: f32,
    ) -> Vec3 {
        let jt = airborne_for.clamp(0.0, 1.0);
        let v = self.curve(phase).evaluate(jt);
        self.clamp(velocity - gravity * v * dt)
    }

    /// Jump launch: drop the gravity-aligned component, then push opposite
    /// gravity by `rise(0) * dt`.
    ///
    /// Not clamped here; the tick's composition step clamps.
    pub fn launch(&self, velocity: Vec3, gravity: Vec3, dt: f32) -> Vec3 {
        without_component(velocity, gravity) - gravity * self.rise.evaluate(0.0) * dt
    }

    pub fn clamp(&self, velocity: Vec3) -> Vec3 {
        clamp_per_axis(velocity, self.max_directional_velocity)
    }
}
