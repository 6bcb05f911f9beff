//! Controller tunables
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Velocities are per-tick displacements (the motor receives them
//! as-is), which is why the directional clamp is small.

use crate::orientation::FlipCorrection;
use gravflip_core::{CurveInterpolation, CurveKey, GravflipError, ResponseCurve, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mouse/stick look scaling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub x_sensitivity: f32,
    pub y_sensitivity: f32,
    /// Nominal fixed step look deltas are scaled by.
    ///
    /// Look does not use the tick's `dt`, so a paused (zero-dt) tick still turns.
    pub nominal_timestep: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            x_sensitivity: 10.0,
            y_sensitivity: 10.0,
            nominal_timestep: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub sprint: f32,
    pub walk: f32,
    pub crouched: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            sprint: 8.0,
            walk: 6.0,
            crouched: 4.0,
        }
    }
}

/// Rise/fall curves and the per-axis velocity clamp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalConfig {
    /// Maximum per-tick displacement along any single world axis
    pub max_directional_velocity: f32,
    /// Sampled while airborne via a jump with jump held; `rise(0)` is the launch impulse
    pub rise: ResponseCurve,
    /// Sampled otherwise
    pub fall: ResponseCurve,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            max_directional_velocity: 0.8,
            rise: ResponseCurve {
                keys: vec![
                    CurveKey::new(0.0, 5.0),
                    CurveKey::new(0.06, 0.0),
                    CurveKey::new(0.4, -0.25),
                    CurveKey::new(1.0, -0.5),
                ],
                interpolation: CurveInterpolation::Linear,
            },
            fall: ResponseCurve {
                keys: vec![CurveKey::new(0.0, -0.35), CurveKey::new(1.0, -0.7)],
                interpolation: CurveInterpolation::Smooth,
            },
        }
    }
}

/// Jump forgiveness windows, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// How long after walking off an edge a press still counts as grounded
    pub ground_buffer: f64,
    /// How long before landing a press is remembered
    pub air_buffer: f64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            ground_buffer: 0.1,
            air_buffer: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub radius: f32,
    pub skin_width: f32,
    /// Collision layers the ground and ceiling probes test against
    pub probe_layers: u32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            skin_width: 0.08,
            probe_layers: u32::MAX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrouchConfig {
    /// Full capsule height when standing
    pub standing_height: f32,
    /// Full capsule height when crouched
    pub crouched_height: f32,
    /// Height change per second during a transition
    pub rate: f32,
    /// Extra clearance required overhead before standing back up
    pub uncrouch_margin: f32,
}

impl Default for CrouchConfig {
    fn default() -> Self {
        Self {
            standing_height: 2.0,
            crouched_height: 1.0,
            rate: 10.0,
            uncrouch_margin: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InversionConfig {
    /// Minimum per-tick speed along gravity before a zone may flip the character
    pub min_speed: f32,
    /// Seconds after a flip during which no further flip is allowed
    pub cooldown: f64,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.2,
            cooldown: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Seconds for the post-flip roll correction to ease out
    pub settle_time: f32,
    /// Eye height as a fraction of the capsule half-height, above the body origin
    pub eye_height: f32,
    pub flip_correction: FlipCorrection,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            settle_time: 0.25,
            eye_height: 0.85,
            flip_correction: FlipCorrection::default(),
        }
    }
}

/// Top-level controller configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub look: LookConfig,
    pub speed: SpeedConfig,
    pub vertical: VerticalConfig,
    pub jump: JumpConfig,
    pub body: BodyConfig,
    pub crouch: CrouchConfig,
    pub inversion: InversionConfig,
    pub camera: CameraConfig,
}

impl ControllerConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ControllerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every tunable against its documented range
    pub fn validate(&self) -> Result<()> {
        check_range("look.x_sensitivity", self.look.x_sensitivity, 1.0, 20.0)?;
        check_range("look.y_sensitivity", self.look.y_sensitivity, 1.0, 20.0)?;
        check_positive("look.nominal_timestep", self.look.nominal_timestep as f64)?;

        check_range("speed.sprint", self.speed.sprint, 1.0, 20.0)?;
        check_range("speed.walk", self.speed.walk, 1.0, 20.0)?;
        check_range("speed.crouched", self.speed.crouched, 1.0, 20.0)?;

        check_range(
            "vertical.max_directional_velocity",
            self.vertical.max_directional_velocity,
            0.1,
            2.0,
        )?;
        self.vertical.rise.validate()?;
        self.vertical.fall.validate()?;

        check_positive("jump.ground_buffer", self.jump.ground_buffer)?;
        check_positive("jump.air_buffer", self.jump.air_buffer)?;

        check_positive("body.radius", self.body.radius as f64)?;
        if !(self.body.skin_width >= 0.0 && self.body.skin_width.is_finite()) {
            return Err(GravflipError::InvalidConfig(format!(
                "body.skin_width must be non-negative, got {}",
                self.body.skin_width
            )));
        }

        check_positive("crouch.crouched_height", self.crouch.crouched_height as f64)?;
        check_positive("crouch.rate", self.crouch.rate as f64)?;
        if self.crouch.standing_height <= self.crouch.crouched_height {
            return Err(GravflipError::InvalidConfig(format!(
                "crouch.standing_height ({}) must exceed crouch.crouched_height ({})",
                self.crouch.standing_height, self.crouch.crouched_height
            )));
        }
        if self.body.radius * 2.0 > self.crouch.crouched_height {
            return Err(GravflipError::InvalidConfig(format!(
                "body.radius ({}) does not fit a crouched capsule of height {}",
                self.body.radius, self.crouch.crouched_height
            )));
        }
        if self.crouch.uncrouch_margin < 0.0 {
            return Err(GravflipError::InvalidConfig(
                "crouch.uncrouch_margin must be non-negative".into(),
            ));
        }

        if self.inversion.min_speed < 0.0 || self.inversion.cooldown < 0.0 {
            return Err(GravflipError::InvalidConfig(
                "inversion thresholds must be non-negative".into(),
            ));
        }
        if self.camera.settle_time < 0.0 {
            return Err(GravflipError::InvalidConfig(
                "camera.settle_time must be non-negative".into(),
            ));
        }

        Ok(())
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(GravflipError::out_of_range(
            field,
            min as f64,
            max as f64,
            value as f64,
        ))
    }
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GravflipError::InvalidConfig(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}
