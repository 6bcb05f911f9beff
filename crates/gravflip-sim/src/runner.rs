//! Headless frame loop driving the physics system from a scenario

use crate::scenario::Scenario;
use gravflip_core::{Result, Vec3};
use gravflip_physics::PhysicsSystem;
use gravflip_runtime::{GameClock, GameEvent, RuntimeSystem};
use tracing::{debug, info};

/// An event stamped with the simulation time it was drained at
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub time: f64,
    pub event: GameEvent,
}

/// End-of-run snapshot
#[derive(Debug, Clone)]
pub struct Report {
    pub fixed_steps: u64,
    pub frames: u64,
    pub simulated_time: f64,
    pub position: Vec3,
    pub gravity: Vec3,
    pub grounded: bool,
    pub crouched: bool,
    pub pitch_deg: f32,
    pub events: Vec<LoggedEvent>,
}

pub struct SimRunner {
    pub system: PhysicsSystem,
    pub clock: GameClock,
    scenario: Scenario,
    wall_time: f64,
    frames: u64,
    fixed_steps: u64,
    log: Vec<LoggedEvent>,
}

impl SimRunner {
    /// `system` must already hold a character; it is initialized here.
    pub fn new(mut system: PhysicsSystem, scenario: Scenario, fixed_hz: f64) -> Result<Self> {
        system.initialize()?;
        Ok(Self {
            system,
            clock: GameClock::with_fixed_timestep(fixed_hz),
            scenario,
            wall_time: 0.0,
            frames: 0,
            fixed_steps: 0,
            log: Vec::new(),
        })
    }

    /// Run one presentation frame of `frame_dt` wall seconds
    pub fn frame(&mut self, frame_dt: f64) -> Result<()> {
        let frame = self.scenario.frame_at(self.wall_time);
        self.clock.paused = frame.paused;
        self.clock.advance(frame_dt);

        if frame.paused {
            let (now, dt) = self.clock.paused_step();
            self.system.fixed_update(&frame.input, now, dt)?;
        } else {
            while self.clock.should_fixed_update() {
                let (now, dt) = self.clock.consume_fixed_step();
                self.system.fixed_update(&frame.input, now, dt)?;
                self.fixed_steps += 1;
            }
        }
        self.system.update(self.clock.delta_time)?;

        let time = self.clock.fixed_time;
        for event in self.system.event_bus.drain() {
            debug!(time, ?event, "event");
            self.log.push(LoggedEvent { time, event });
        }

        self.wall_time += frame_dt;
        self.frames += 1;
        Ok(())
    }

    /// Run frames until `seconds` of wall time have passed
    pub fn run_for(&mut self, seconds: f64, frame_dt: f64) -> Result<()> {
        let frames = (seconds / frame_dt).round() as u64;
        for _ in 0..frames {
            self.frame(frame_dt)?;
        }
        Ok(())
    }

    pub fn report(&self) -> Report {
        let controller = &self.system.controller;
        Report {
            fixed_steps: self.fixed_steps,
            frames: self.frames,
            simulated_time: self.clock.fixed_time,
            position: self.system.character_position().unwrap_or(Vec3::ZERO),
            gravity: controller.gravity().direction(),
            grounded: controller.is_grounded(),
            crouched: controller.crouch().is_crouched(),
            pitch_deg: controller.camera().pitch_deg(),
            events: self.log.clone(),
        }
    }

    pub fn finish(mut self) -> Result<Report> {
        self.system.shutdown()?;
        let report = self.report();
        info!(
            steps = report.fixed_steps,
            time = report.simulated_time,
            "run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DemoLevel;
    use gravflip_controller::ControllerConfig;

    fn runner(scenario: Scenario) -> SimRunner {
        let mut system = PhysicsSystem::new(ControllerConfig::default()).unwrap();
        DemoLevel::default().build(&mut system).unwrap();
        SimRunner::new(system, scenario, 50.0).unwrap()
    }

    #[test]
    fn one_fixed_step_per_matching_frame() {
        let mut runner = runner(Scenario::default());
        runner.run_for(1.0, 0.02).unwrap();
        let report = runner.finish().unwrap();
        assert_eq!(report.frames, 50);
        assert_eq!(report.fixed_steps, 50);
        assert!((report.simulated_time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn paused_frames_hold_time_but_turn_the_camera() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[step]]
            start = 0.0
            end = 0.5
            look = [0.0, 2.0]
            paused = true
            "#,
        )
        .unwrap();
        let mut runner = runner(scenario);
        let start = runner.system.character_position().unwrap();

        runner.run_for(0.2, 0.02).unwrap();
        let report = runner.report();

        assert_eq!(report.fixed_steps, 0);
        assert_eq!(report.simulated_time, 0.0);
        assert_eq!(report.position, start);
        // 10 frames of 2 * 10 * 0.02 degrees
        assert!((report.pitch_deg - 4.0).abs() < 1e-4);
    }

    #[test]
    fn sample_controller_config_runs_the_demo_level() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/controller.toml");
        let config = ControllerConfig::load(path).unwrap();
        assert_eq!(config.speed.walk, 6.0);
        assert_eq!(config.inversion.cooldown, 2.0);
        assert_eq!(
            config.camera.flip_correction,
            gravflip_controller::FlipCorrection::PreserveHeading
        );

        let mut system = PhysicsSystem::new(config).unwrap();
        DemoLevel::default().build(&mut system).unwrap();
        let mut runner = SimRunner::new(system, Scenario::default(), 50.0).unwrap();
        runner.run_for(0.5, 0.02).unwrap();
        assert_eq!(runner.report().fixed_steps, 25);
    }

    #[test]
    fn demo_flips_gravity() {
        let mut runner = runner(Scenario::demo().unwrap());
        runner.run_for(3.0, 0.02).unwrap();
        let report = runner.finish().unwrap();

        assert!(report.gravity.abs_diff_eq(Vec3::Y, 1e-5));
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e.event, GameEvent::ZoneFired { .. })));
        assert!(report.position.y < 0.0);
    }
}
