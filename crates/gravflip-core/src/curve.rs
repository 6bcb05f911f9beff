//! Keyframed response curves - binary search + interpolation
//!
//! A `ResponseCurve` maps an elapsed duration to a scalar. Designers author
//! rise/fall feel as curves instead of physical constants; evaluation clamps
//! to the first/last key outside the authored range.

use crate::error::{GravflipError, Result};
use serde::{Deserialize, Serialize};

/// A single (time, value) key
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// How values between two keys are blended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveInterpolation {
    /// Hold the previous key's value
    Step,
    #[default]
    Linear,
    /// Cubic Hermite with flat tangents (ease in/out at every key)
    Smooth,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    pub keys: Vec<CurveKey>,
    #[serde(default)]
    pub interpolation: CurveInterpolation,
}

impl ResponseCurve {
    pub fn new(keys: Vec<CurveKey>, interpolation: CurveInterpolation) -> Result<Self> {
        let curve = Self { keys, interpolation };
        curve.validate()?;
        Ok(curve)
    }

    /// A curve that evaluates to `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
            interpolation: CurveInterpolation::Step,
        }
    }

    /// Linear curve from `(0, start)` to `(1, end)`
    pub fn linear(start: f32, end: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, start), CurveKey::new(1.0, end)],
            interpolation: CurveInterpolation::Linear,
        }
    }

    /// Keys must be non-empty, finite, and sorted by time.
    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(GravflipError::InvalidCurve("curve has no keys".into()));
        }
        for key in &self.keys {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(GravflipError::InvalidCurve(format!(
                    "non-finite key ({}, {})",
                    key.time, key.value
                )));
            }
        }
        if self.keys.windows(2).any(|w| w[1].time < w[0].time) {
            return Err(GravflipError::InvalidCurve(
                "keys must be sorted by time".into(),
            ));
        }
        Ok(())
    }

    /// Sample the curve at `time`.
    pub fn evaluate(&self, time: f32) -> f32 {
        let keys = &self.keys;

        if keys.is_empty() {
            return 0.0;
        }

        if !time.is_finite() || time <= keys[0].time {
            return keys[0].value;
        }

        let last = &keys[keys.len() - 1];
        if time >= last.time {
            return last.value;
        }

        let idx = match keys.binary_search_by(|k| k.time.total_cmp(&time)) {
            Ok(i) => return keys[i].value,
            Err(i) => i,
        };

        let prev = &keys[idx - 1];
        let next = &keys[idx];

        let span = next.time - prev.time;
        if span <= 0.0 {
            return prev.value;
        }
        let t = (time - prev.time) / span;

        match self.interpolation {
            CurveInterpolation::Step => prev.value,
            CurveInterpolation::Linear => lerp_f32(prev.value, next.value, t),
            CurveInterpolation::Smooth => {
                let s = t * t * (3.0 - 2.0 * t);
                lerp_f32(prev.value, next.value, s)
            }
        }
    }
}

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
