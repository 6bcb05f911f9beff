//! Scripted input timelines

use gravflip_core::{GravflipError, Result, Vec2};
use gravflip_runtime::ControlInput;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Held inputs over a `[start, end)` window of wall time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedInput {
    pub start: f64,
    pub end: f64,
    pub movement: [f32; 2],
    pub look: [f32; 2],
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub torch: bool,
    /// Freeze simulation time; look still applies
    pub paused: bool,
}

impl ScriptedInput {
    fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    fn control_input(&self) -> ControlInput {
        ControlInput {
            look: Vec2::from(self.look),
            movement: Vec2::from(self.movement),
            jump: self.jump,
            sprint: self.sprint,
            crouch: self.crouch,
            torch: self.torch,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(rename = "step", default)]
    pub steps: Vec<ScriptedInput>,
}

/// What the script asks for at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub input: ControlInput,
    pub paused: bool,
}

impl Scenario {
    /// The bundled walkthrough of the demo level
    pub fn demo() -> Result<Self> {
        Self::from_toml_str(include_str!("../scenarios/demo.toml"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        for (i, step) in scenario.steps.iter().enumerate() {
            if !(step.start >= 0.0 && step.end > step.start) {
                return Err(GravflipError::InvalidConfig(format!(
                    "step {i}: window [{}, {}) is empty or negative",
                    step.start, step.end
                )));
            }
            let in_unit_range = |v: [f32; 2]| v.iter().all(|a| (-1.0..=1.0).contains(a));
            if !in_unit_range(step.movement) {
                return Err(GravflipError::InvalidConfig(format!(
                    "step {i}: movement axes must lie in [-1, 1]"
                )));
            }
        }
        Ok(scenario)
    }

    /// Last step covering `t` wins; no step means idle
    pub fn frame_at(&self, t: f64) -> Frame {
        self.steps
            .iter()
            .rev()
            .find(|step| step.contains(t))
            .map(|step| Frame {
                input: step.control_input(),
                paused: step.paused,
            })
            .unwrap_or_default()
    }

    /// Wall time at which the last step ends
    pub fn duration(&self) -> f64 {
        self.steps.iter().map(|s| s.end).fold(0.0, f64::max)
    }
}
