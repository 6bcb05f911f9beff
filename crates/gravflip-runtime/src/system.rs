//! Runtime system trait

use gravflip_core::Result;

/// A system that can be ticked by the game loop
///
/// Fixed update runs at a constant rate (controller + physics), while update
/// runs once per frame for presentation-only state such as camera settling.
pub trait RuntimeSystem {
    /// Called once before the first tick
    fn initialize(&mut self) -> Result<()>;

    /// Called at a fixed rate with this tick's input
    fn fixed_update(&mut self, input: &crate::ControlInput, now: f64, dt: f64) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
