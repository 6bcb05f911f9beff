//! Stub collaborators for unit tests

use crate::collab::{CharacterMotor, ShapeCastProbe, SweepHit, SweepQuery};
use crate::inversion::FloorSurface;
use gravflip_core::{GravflipError, Quat, Result, Vec3, DOWN};
use std::cell::RefCell;

/// A probe + motor with scripted hits that records what it was asked.
///
/// Sweeps pointing along `down` report `ground`; sweeps pointing away from it
/// report `overhead`.
#[derive(Debug)]
pub struct ScriptedEnv {
    pub position: Vec3,
    pub rotation: Quat,
    pub capsule_height: Option<f32>,
    pub down: Vec3,
    pub ground: bool,
    pub overhead: bool,
    pub probe_fails: bool,
    pub moves: Vec<Vec3>,
    pub queries: RefCell<Vec<SweepQuery>>,
}

impl Default for ScriptedEnv {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            capsule_height: None,
            down: DOWN,
            ground: false,
            overhead: false,
            probe_fails: false,
            moves: Vec::new(),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedEnv {
    pub fn grounded() -> Self {
        Self {
            ground: true,
            ..Self::default()
        }
    }

    pub fn last_move(&self) -> Vec3 {
        self.moves.last().copied().unwrap_or(Vec3::ZERO)
    }
}

impl ShapeCastProbe for ScriptedEnv {
    fn sweep(&self, query: &SweepQuery) -> Result<Option<SweepHit>> {
        self.queries.borrow_mut().push(*query);
        if self.probe_fails {
            return Err(GravflipError::ProbeError("scripted failure".into()));
        }
        let hit = if query.direction.dot(self.down) > 0.0 {
            self.ground
        } else {
            self.overhead
        };
        Ok(hit.then_some(SweepHit {
            distance: query.max_distance * 0.5,
            normal: -query.direction,
        }))
    }
}

impl CharacterMotor for ScriptedEnv {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.position += displacement;
        self.moves.push(displacement);
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn set_capsule_height(&mut self, height: f32) {
        self.capsule_height = Some(height);
    }
}

/// Floor collider stand-in that counts toggles
#[derive(Debug)]
pub struct StubFloor {
    pub enabled: bool,
    pub toggles: usize,
}

impl Default for StubFloor {
    fn default() -> Self {
        Self {
            enabled: true,
            toggles: 0,
        }
    }
}

impl FloorSurface for StubFloor {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.toggles += 1;
    }
}
