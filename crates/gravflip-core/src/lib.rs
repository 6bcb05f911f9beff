//! Gravflip Core - Foundational types for the gravflip character controller
//!
//! This crate provides the types every other gravflip crate depends on:
//! - `EntityId` - Stable identifiers for characters and trigger volumes
//! - `Transform` and vector helpers (projection, per-axis clamp, orthogonal mask)
//! - `ResponseCurve` - keyframed feel curves for rise/fall integration
//! - Error types and Result alias

mod curve;
mod error;
mod id;
mod types;

pub use curve::{lerp_f32, CurveInterpolation, CurveKey, ResponseCurve};
pub use error::{GravflipError, Result};
pub use glam::{Mat3, Quat, Vec2, Vec3};
pub use id::EntityId;
pub use types::{
    clamp_per_axis, component_along, orthogonal_mask, without_component, Transform, DOWN, FORWARD,
    RIGHT, UP,
};
