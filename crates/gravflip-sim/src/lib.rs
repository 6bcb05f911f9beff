//! Gravflip Sim - headless runs of the character controller
//!
//! Builds the demo level, replays a scripted input timeline through the
//! fixed-step clock, and reports the character's final state and events.

pub mod level;
pub mod runner;
pub mod scenario;

pub use level::{DemoLevel, LevelHandles};
pub use runner::{LoggedEvent, Report, SimRunner};
pub use scenario::{Frame, Scenario, ScriptedInput};
