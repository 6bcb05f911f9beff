//! Game clock with fixed-timestep accumulator

/// Tracks frame time and hands out fixed simulation steps.
///
/// `fixed_time` is the monotonic clock the controller stamps jump and flip
/// timestamps with: it advances by exactly one `fixed_timestep` per consumed
/// step, so buffered-jump windows are deterministic regardless of frame rate.
pub struct GameClock {
    /// Total elapsed frame time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/50 second)
    pub fixed_timestep: f64,
    /// Simulation time at the start of the current fixed step
    pub fixed_time: f64,
    /// When true, frames add no time and fixed steps report a zero dt
    pub paused: bool,
    accumulator: f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / 50.0,
            fixed_time: 0.0,
            paused: false,
            accumulator: 0.0,
        }
    }
}

impl GameClock {
    /// Create a new game clock with the default 50Hz fixed timestep
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game clock with a custom fixed timestep
    pub fn with_fixed_timestep(hz: f64) -> Self {
        Self {
            fixed_timestep: 1.0 / hz,
            ..Self::default()
        }
    }

    /// Advance the clock by one frame of `elapsed` seconds
    pub fn advance(&mut self, elapsed: f64) {
        if self.paused {
            self.delta_time = 0.0;
            return;
        }
        // Clamp to avoid spiral of death (max 250ms frame time)
        self.delta_time = elapsed.clamp(0.0, 0.25);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
    }

    /// Returns true if there's enough accumulated time for a fixed update step
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    /// Consume one fixed step, returning `(now, dt)` for the controller.
    pub fn consume_fixed_step(&mut self) -> (f64, f64) {
        self.accumulator -= self.fixed_timestep;
        self.fixed_time += self.fixed_timestep;
        (self.fixed_time, self.fixed_timestep)
    }

    /// Step reported while paused: time stands still and dt is zero.
    ///
    /// The controller still applies look rotation on such a step.
    pub fn paused_step(&self) -> (f64, f64) {
        (self.fixed_time, 0.0)
    }
}
