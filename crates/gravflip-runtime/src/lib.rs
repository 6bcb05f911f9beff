//! Gravflip Runtime - Game loop infrastructure
//!
//! Provides the building blocks the controller is ticked by:
//! - `GameClock` - fixed-timestep accumulator with a monotonic fixed-step time
//! - `ControlInput` - one fixed tick's held buttons and axes
//! - `GameEvent` / `EventBus` - typed event queue for presentation collaborators
//! - `RuntimeSystem` - trait for systems ticked by the game loop

mod clock;
mod event;
mod event_bus;
mod input;
mod system;

pub use clock::GameClock;
pub use event::GameEvent;
pub use event_bus::EventBus;
pub use input::ControlInput;
pub use system::RuntimeSystem;
