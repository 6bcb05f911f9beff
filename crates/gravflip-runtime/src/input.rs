//! Per-tick control input

use gravflip_core::Vec2;

/// One fixed tick's worth of player intent.
///
/// Buttons carry held state only; press edges are derived by the controller
/// from consecutive ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlInput {
    /// Look delta (x = yaw, y = pitch), device units
    pub look: Vec2,
    /// Move intent (x = strafe right, y = forward), each axis in [-1, 1]
    pub movement: Vec2,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub torch: bool,
}

impl ControlInput {
    pub fn with_movement(mut self, x: f32, y: f32) -> Self {
        self.movement = Vec2::new(x, y);
        self
    }

    pub fn with_look(mut self, x: f32, y: f32) -> Self {
        self.look = Vec2::new(x, y);
        self
    }

    pub fn with_jump(mut self, held: bool) -> Self {
        self.jump = held;
        self
    }

    pub fn with_sprint(mut self, held: bool) -> Self {
        self.sprint = held;
        self
    }

    pub fn with_crouch(mut self, held: bool) -> Self {
        self.crouch = held;
        self
    }

    pub fn with_torch(mut self, held: bool) -> Self {
        self.torch = held;
        self
    }
}
