//! Per-tick movement orchestration

use crate::collab::{CharacterEnv, ShapeCastProbe, SweepQuery};
use crate::config::ControllerConfig;
use crate::crouch::CrouchAnimator;
use crate::gravity::GravityState;
use crate::inversion::{GravityReceiver, InversionOccupant};
use crate::jump::{JumpBuffer, JumpDecision};
use crate::motion::MotionState;
use crate::orientation::{CameraRig, OrientationSync};
use crate::vertical::{CurvePhase, VerticalIntegrator};
use gravflip_core::{EntityId, Result, Transform, Vec3};
use gravflip_runtime::{ControlInput, EventBus, GameEvent};
use tracing::{debug, trace, warn};

/// Movement mode, in the order speed selection checks them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gait {
    Crouched,
    /// Torch extended: forced to walking pace
    Torch,
    Sprint,
    Walk,
}

/// First match wins; `Walk` always matches.
const GAIT_PRIORITY: [Gait; 4] = [Gait::Crouched, Gait::Torch, Gait::Sprint, Gait::Walk];

/// First-person character controller under runtime-reorientable gravity.
///
/// Owns the motion, crouch, gravity, and camera state. The world is reached
/// only through the `CharacterEnv` passed to each tick.
pub struct MovementController {
    id: EntityId,
    config: ControllerConfig,
    transform: Transform,
    gravity: GravityState,
    motion: MotionState,
    vertical: VerticalIntegrator,
    jump: JumpBuffer,
    crouch: CrouchAnimator,
    orientation: OrientationSync,
    camera: CameraRig,
    ground_velocity: Vec3,
    now: f64,
    events: EventBus,
}

impl MovementController {
    /// Build a controller from a validated config
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            id: EntityId::new(),
            transform: Transform::IDENTITY,
            gravity: GravityState::new(),
            motion: MotionState::default(),
            vertical: VerticalIntegrator::from_config(&config.vertical),
            jump: JumpBuffer::from_config(&config.jump),
            crouch: CrouchAnimator::new(&config.crouch, config.body.skin_width),
            orientation: OrientationSync::new(config.camera.flip_correction),
            camera: CameraRig::new(config.camera.settle_time, config.camera.eye_height),
            ground_velocity: Vec3::ZERO,
            now: 0.0,
            events: EventBus::new(),
            config,
        })
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Body transform; the position is the last one read from the motor
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn gravity(&self) -> &GravityState {
        &self.gravity
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn crouch(&self) -> &CrouchAnimator {
        &self.crouch
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn is_grounded(&self) -> bool {
        self.motion.grounded
    }

    pub fn velocity(&self) -> Vec3 {
        self.motion.velocity
    }

    /// Lateral displacement requested by move input on the last tick
    pub fn ground_velocity(&self) -> Vec3 {
        self.ground_velocity
    }

    /// Simulation time of the last tick
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Capsule half height plus skin: the ground probe distance and the
    /// character "height" inversion zones measure against.
    pub fn reach(&self) -> f32 {
        self.crouch.height() * 0.5 + self.config.body.skin_width
    }

    pub fn eye_position(&self) -> Vec3 {
        self.camera
            .eye_position(&self.transform, self.crouch.height() * 0.5)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Presentation tick (variable rate): camera settling only
    pub fn update(&mut self, dt: f64) {
        self.camera.update(dt as f32);
    }

    /// One fixed simulation step.
    ///
    /// Order: look, crouch, ground probe, vertical integration, jump edge,
    /// composition + clamp, motion. A non-positive or non-finite `dt` applies
    /// look only.
    pub fn fixed_update<E: CharacterEnv + ?Sized>(
        &mut self,
        input: &ControlInput,
        env: &mut E,
        now: f64,
        dt: f64,
    ) {
        self.now = now;
        self.transform.position = env.position();

        self.apply_look(input);
        env.set_rotation(self.transform.rotation);

        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "non-positive or non-finite dt, skipping integration");
            return;
        }
        let dt_f = dt as f32;

        self.resolve_crouch(input, env);
        self.advance_crouch(env, dt_f);

        let speed = self.gait_speed(self.gait(input));
        let scaled = input.movement * dt_f * speed;
        let horizontal = self.transform.forward() * scaled.y + self.transform.right() * scaled.x;
        self.ground_velocity = horizontal;

        let was_grounded = self.motion.grounded;
        let mut jumped = false;
        self.motion.grounded = self.probe_ground(env);

        if !self.motion.grounded {
            if was_grounded {
                // Credit the whole tick as airborne
                self.motion.left_ground_at = Some(now - dt);
                self.events.push(GameEvent::LeftGround { entity: self.id });
            }
            self.apply_vertical_velocity(input.jump, dt_f);
        } else {
            self.motion.velocity = self.gravity.mask(self.motion.velocity);
            if !was_grounded {
                self.motion.land();
                self.events.push(GameEvent::Landed { entity: self.id });
                if self.jump.take_landing_jump(&mut self.motion, now) {
                    self.start_jump(dt_f, true);
                    jumped = true;
                }
            }
        }

        let jump_pressed = input.jump;
        if jump_pressed && !self.motion.jump_held && !jumped {
            match self.jump.on_press(&self.motion, now) {
                JumpDecision::Fire => self.start_jump(dt_f, false),
                JumpDecision::Buffer => {
                    trace!(now, "jump press buffered");
                    self.motion.buffered_jump_at = Some(now);
                }
            }
        }
        self.motion.jump_held = jump_pressed;

        let composed = self.gravity.across(horizontal) + self.gravity.along(self.motion.velocity);
        self.motion.velocity = self.vertical.clamp(composed);

        env.move_by(self.motion.velocity);
        self.transform.position = env.position();
    }

    fn apply_look(&mut self, input: &ControlInput) {
        let step = self.config.look.nominal_timestep;
        let yaw_deg = input.look.x * self.config.look.x_sensitivity * step;
        // Positive look-x turns right, which is a negative turn about up
        self.transform.rotate_local_y(-yaw_deg.to_radians());
        self.camera
            .apply_pitch(input.look.y * self.config.look.y_sensitivity * step);
    }

    fn resolve_crouch<E: CharacterEnv + ?Sized>(&mut self, input: &ControlInput, env: &mut E) {
        if self.crouch.is_crouched() {
            if !input.crouch {
                let stood = self.crouch.try_uncrouch(
                    &*env,
                    self.transform.position,
                    self.gravity.direction(),
                    self.config.body.radius,
                    self.config.body.probe_layers,
                );
                if stood {
                    self.events.push(GameEvent::CrouchChanged {
                        entity: self.id,
                        crouched: false,
                    });
                }
            }
        } else if input.crouch {
            self.crouch.set_crouched();
            self.events.push(GameEvent::CrouchChanged {
                entity: self.id,
                crouched: true,
            });
        }
    }

    fn advance_crouch<E: CharacterEnv + ?Sized>(&mut self, env: &mut E, dt: f32) {
        let step = self.crouch.advance(dt);
        if step.height_shift != 0.0 {
            env.set_capsule_height(self.crouch.height());
            env.move_by(self.gravity.direction() * step.height_shift * 0.5);
            self.transform.position = env.position();
        }
    }

    /// Highest-priority gait that applies this tick
    pub fn gait(&self, input: &ControlInput) -> Gait {
        GAIT_PRIORITY
            .into_iter()
            .find(|gait| match gait {
                Gait::Crouched => self.crouch.is_crouched(),
                Gait::Torch => input.torch,
                Gait::Sprint => input.sprint,
                Gait::Walk => true,
            })
            .unwrap_or(Gait::Walk)
    }

    fn gait_speed(&self, gait: Gait) -> f32 {
        let speed = &self.config.speed;
        match gait {
            Gait::Crouched => speed.crouched,
            Gait::Torch | Gait::Walk => speed.walk,
            Gait::Sprint => speed.sprint,
        }
    }

    /// Sphere sweep along gravity whose leading surface stops at `reach`
    /// from the body origin.
    fn probe_ground<P: ShapeCastProbe + ?Sized>(&self, probe: &P) -> bool {
        let radius = self.config.body.radius;
        let query = SweepQuery {
            origin: self.transform.position,
            radius,
            direction: self.gravity.direction(),
            max_distance: (self.reach() - radius).max(0.0),
            layers: self.config.body.probe_layers,
        };
        match probe.sweep(&query) {
            Ok(hit) => hit.is_some(),
            Err(e) => {
                warn!("ground probe failed, treating as airborne: {e}");
                false
            }
        }
    }

    fn apply_vertical_velocity(&mut self, jump_held: bool, dt: f32) {
        let airborne_for = self.motion.airborne_for(self.now) as f32;
        let phase = CurvePhase::select(self.motion.left_ground_via_jump, jump_held);
        self.motion.velocity = self.vertical.integrate(
            self.motion.velocity,
            self.gravity.direction(),
            airborne_for,
            phase,
            dt,
        );
    }

    fn start_jump(&mut self, dt: f32, buffered: bool) {
        debug!(now = self.now, buffered, "jump");
        self.motion.left_ground_via_jump = true;
        self.motion.left_ground_at = Some(self.now);
        self.motion.velocity =
            self.vertical
                .launch(self.motion.velocity, self.gravity.direction(), dt);
        self.events.push(GameEvent::JumpStarted {
            entity: self.id,
            buffered,
        });
    }

    /// Eligible for a gravity inversion: airborne, moving with gravity faster
    /// than the configured threshold, and past the flip cooldown.
    pub fn can_invert(&self) -> bool {
        let inversion = &self.config.inversion;
        !self.motion.grounded
            && self.gravity.speed_along(self.motion.velocity) > inversion.min_speed
            && self
                .gravity
                .seconds_since_flip(self.now)
                .map_or(true, |since| since > inversion.cooldown)
    }
}

impl GravityReceiver for MovementController {
    fn update_gravity_direction(&mut self, direction: Vec3) -> Result<()> {
        let change = match self.gravity.set_direction(direction, self.now) {
            Ok(change) => change,
            Err(e) => {
                warn!("rejected gravity update: {e}");
                return Err(e);
            }
        };
        debug!(direction = ?change.direction, "updating gravity");

        let old_body = self.transform.rotation;
        self.transform.rotation = self.orientation.reorient(old_body, &change);
        self.camera.on_body_flip(old_body, self.transform.rotation);

        self.events.push(GameEvent::GravityFlipped {
            entity: self.id,
            direction: change.direction,
        });
        Ok(())
    }
}

impl InversionOccupant for MovementController {
    fn occupant_id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn velocity(&self) -> Vec3 {
        self.motion.velocity
    }

    fn height(&self) -> f32 {
        self.reach()
    }

    fn can_invert(&self) -> bool {
        MovementController::can_invert(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEnv;
    use gravflip_core::{Quat, ResponseCurve, DOWN, FORWARD};

    const DT: f64 = 0.02;

    fn config() -> ControllerConfig {
        let mut config = ControllerConfig::default();
        config.vertical.rise = ResponseCurve::constant(5.0);
        config.vertical.fall = ResponseCurve::constant(-1.0);
        config
    }

    fn controller() -> MovementController {
        MovementController::new(config()).unwrap()
    }

    fn t(tick: u32) -> f64 {
        tick as f64 * DT
    }

    fn idle() -> ControlInput {
        ControlInput::default()
    }

    fn jump() -> ControlInput {
        ControlInput::default().with_jump(true)
    }

    fn jumps_started(events: &[GameEvent]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::JumpStarted { buffered, .. } => Some(*buffered),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ground_jump_launches_opposite_gravity() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();

        c.fixed_update(&idle(), &mut env, t(1), DT);
        assert!(c.is_grounded());

        c.fixed_update(&jump(), &mut env, t(2), DT);
        let along = c.gravity().speed_along(c.velocity());
        assert!((along + 5.0 * DT as f32).abs() < 1e-6, "along gravity {along}");
        assert!((env.last_move().y - 0.1).abs() < 1e-6);
        assert_eq!(jumps_started(&c.drain_events()), vec![false]);

        env.ground = false;
        c.fixed_update(&jump(), &mut env, t(3), DT);
        assert!(!c.is_grounded());
        assert!(c.motion().left_ground_via_jump);
    }

    #[test]
    fn ground_buffer_grace_after_walking_off() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&idle(), &mut env, t(1), DT);

        env.ground = false;
        c.fixed_update(&idle(), &mut env, t(2), DT);
        assert_eq!(c.motion().left_ground_at, Some(t(2) - DT));
        c.fixed_update(&idle(), &mut env, t(3), DT);
        c.drain_events();

        // 0.08s since leaving ground, inside the 0.1s grace
        c.fixed_update(&jump(), &mut env, t(5), DT);
        assert_eq!(jumps_started(&c.drain_events()), vec![false]);
        assert!(c.gravity().speed_along(c.velocity()) < 0.0);
    }

    #[test]
    fn press_after_ground_buffer_is_buffered() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&idle(), &mut env, t(1), DT);

        env.ground = false;
        for tick in 2..7 {
            c.fixed_update(&idle(), &mut env, t(tick), DT);
        }
        c.drain_events();

        // 0.12s since leaving ground
        c.fixed_update(&jump(), &mut env, t(7), DT);
        assert!(jumps_started(&c.drain_events()).is_empty());
        assert_eq!(c.motion().buffered_jump_at, Some(t(7)));
    }

    #[test]
    fn no_double_grace_after_jump_departure() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&idle(), &mut env, t(1), DT);
        c.fixed_update(&jump(), &mut env, t(2), DT);

        env.ground = false;
        c.fixed_update(&idle(), &mut env, t(3), DT);
        // Second press 0.04s after departure, well inside the ground window
        c.fixed_update(&jump(), &mut env, t(4), DT);

        assert_eq!(jumps_started(&c.drain_events()), vec![false]);
        assert_eq!(c.motion().buffered_jump_at, Some(t(4)));
    }

    #[test]
    fn air_buffered_press_fires_on_landing() {
        let mut c = controller();
        let mut env = ScriptedEnv::default();

        c.fixed_update(&jump(), &mut env, t(1), DT);
        assert_eq!(c.motion().buffered_jump_at, Some(t(1)));
        for tick in 2..8 {
            c.fixed_update(&idle(), &mut env, t(tick), DT);
        }

        // Lands 0.14s after the press
        env.ground = true;
        c.fixed_update(&idle(), &mut env, t(8), DT);

        assert_eq!(jumps_started(&c.drain_events()), vec![true]);
        assert!((c.gravity().speed_along(c.velocity()) + 0.1).abs() < 1e-6);
        assert_eq!(c.motion().buffered_jump_at, None);
        assert!(c.motion().left_ground_via_jump);
    }

    #[test]
    fn fresh_press_on_landing_tick_jumps_once() {
        let mut c = controller();
        let mut env = ScriptedEnv::default();

        c.fixed_update(&jump(), &mut env, t(1), DT);
        for tick in 2..8 {
            c.fixed_update(&idle(), &mut env, t(tick), DT);
        }

        // Buffered press lands and the player presses again the same tick
        env.ground = true;
        c.fixed_update(&jump(), &mut env, t(8), DT);

        assert_eq!(jumps_started(&c.drain_events()), vec![true]);
        assert!((c.gravity().speed_along(c.velocity()) + 0.1).abs() < 1e-6);
        assert!(c.motion().jump_held);
    }

    #[test]
    fn stale_air_press_does_not_fire() {
        let mut c = controller();
        let mut env = ScriptedEnv::default();

        c.fixed_update(&jump(), &mut env, t(1), DT);
        for tick in 2..16 {
            c.fixed_update(&idle(), &mut env, t(tick), DT);
        }

        // Lands 0.3s after the press
        env.ground = true;
        c.fixed_update(&idle(), &mut env, t(16), DT);

        assert!(jumps_started(&c.drain_events()).is_empty());
        assert_eq!(c.velocity(), Vec3::ZERO);
    }

    #[test]
    fn holding_jump_does_not_refire() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&jump(), &mut env, t(1), DT);
        c.fixed_update(&jump(), &mut env, t(2), DT);
        c.fixed_update(&jump(), &mut env, t(3), DT);
        assert_eq!(jumps_started(&c.drain_events()), vec![false]);
    }

    #[test]
    fn launch_is_clamped_same_tick() {
        let mut config = config();
        config.vertical.rise = ResponseCurve::constant(100.0);
        let mut c = MovementController::new(config).unwrap();
        let mut env = ScriptedEnv::grounded();

        c.fixed_update(&jump(), &mut env, t(1), DT);
        assert!((c.velocity().y - 0.8).abs() < 1e-6);
        assert!((env.last_move().y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn falling_velocity_stays_clamped() {
        let mut config = config();
        config.vertical.fall = ResponseCurve::constant(-400.0);
        let mut c = MovementController::new(config).unwrap();
        let mut env = ScriptedEnv::default();
        let input = ControlInput::default().with_movement(1.0, 1.0).with_sprint(true);

        for tick in 1..40 {
            c.fixed_update(&input, &mut env, t(tick), DT);
            for axis in c.velocity().to_array() {
                assert!(axis.abs() <= 0.8 + 1e-6);
            }
        }
        assert!((c.velocity().y + 0.8).abs() < 1e-6);
    }

    #[test]
    fn airborne_rise_only_while_held() {
        let mut config = config();
        config.vertical.rise = ResponseCurve::constant(1.0);
        let mut c = MovementController::new(config).unwrap();
        let mut env = ScriptedEnv::grounded();

        c.fixed_update(&jump(), &mut env, t(1), DT);
        env.ground = false;
        c.fixed_update(&jump(), &mut env, t(2), DT);
        let held = c.velocity().y;
        // Rise curve (+1) while held
        assert!((held - (0.02 + 0.02)).abs() < 1e-6);

        c.fixed_update(&idle(), &mut env, t(3), DT);
        // Fall curve (-1) once released
        assert!((c.velocity().y - (held - 0.02)).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_rotates_without_moving() {
        let mut c = controller();
        let mut env = ScriptedEnv::default();
        let input = ControlInput::default()
            .with_look(10.0, 5.0)
            .with_movement(0.0, 1.0)
            .with_jump(true);

        c.fixed_update(&input, &mut env, 0.0, 0.0);

        assert!(env.moves.is_empty());
        assert!(env.queries.borrow().is_empty());
        assert_eq!(c.velocity(), Vec3::ZERO);
        assert!(c.transform().rotation.angle_between(Quat::IDENTITY) > 1e-3);
        assert_eq!(env.rotation, c.transform().rotation);
        assert!((c.camera().pitch_deg() - 1.0).abs() < 1e-5);
        // Held state untouched, so the press edge is still pending
        assert!(!c.motion().jump_held);
    }

    #[test]
    fn nan_dt_is_skipped_and_later_ticks_recover() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&idle(), &mut env, t(1), DT);
        let moves = env.moves.len();

        env.ground = false;
        c.fixed_update(&idle(), &mut env, t(2), f64::NAN);
        assert_eq!(env.moves.len(), moves);
        assert!(c.is_grounded());
        assert_eq!(c.motion().left_ground_at, None);

        c.fixed_update(&idle(), &mut env, t(3), DT);
        c.fixed_update(&idle(), &mut env, t(4), DT);
        assert_eq!(c.motion().left_ground_at, Some(t(3) - DT));
        assert!(c.velocity().is_finite());
        assert!(c.gravity().speed_along(c.velocity()) > 0.0);
    }

    #[test]
    fn look_right_turns_body_right() {
        let mut c = controller();
        let mut env = ScriptedEnv::default();
        // 450 * 10 * 0.02 = 90 degrees
        c.fixed_update(&ControlInput::default().with_look(450.0, 0.0), &mut env, 0.0, 0.0);
        assert!((c.transform().forward() - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn probe_failure_means_airborne() {
        let mut c = controller();
        let mut env = ScriptedEnv {
            probe_fails: true,
            ground: true,
            ..Default::default()
        };
        c.fixed_update(&idle(), &mut env, t(1), DT);
        assert!(!c.is_grounded());
        assert!(c.velocity().y < 0.0);
    }

    #[test]
    fn ground_probe_follows_gravity() {
        let mut c = controller();
        let mut env = ScriptedEnv::default();
        c.fixed_update(&idle(), &mut env, t(1), DT);

        let q = env.queries.borrow()[0];
        assert_eq!(q.direction, DOWN);
        assert_eq!(q.radius, 0.5);
        assert!((q.max_distance - 0.58).abs() < 1e-6);

        c.update_gravity_direction(Vec3::X).unwrap();
        env.queries.borrow_mut().clear();
        c.fixed_update(&idle(), &mut env, t(2), DT);
        assert_eq!(env.queries.borrow()[0].direction, Vec3::X);
    }

    #[test]
    fn speed_priority_table() {
        let mut c = controller();
        let all = ControlInput::default().with_sprint(true).with_torch(true);
        assert_eq!(c.gait(&all), Gait::Torch);
        assert_eq!(c.gait(&ControlInput::default().with_sprint(true)), Gait::Sprint);
        assert_eq!(c.gait(&idle()), Gait::Walk);

        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&all.with_crouch(true), &mut env, t(1), DT);
        assert_eq!(c.gait(&all), Gait::Crouched);
    }

    #[test]
    fn horizontal_speed_by_gait() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        let forward = ControlInput::default().with_movement(0.0, 1.0);

        c.fixed_update(&forward, &mut env, t(1), DT);
        assert!((c.ground_velocity() - FORWARD * 6.0 * 0.02).length() < 1e-6);

        c.fixed_update(&forward.with_sprint(true), &mut env, t(2), DT);
        assert!((c.ground_velocity() - FORWARD * 8.0 * 0.02).length() < 1e-6);

        c.fixed_update(&forward.with_sprint(true).with_torch(true), &mut env, t(3), DT);
        assert!((c.ground_velocity() - FORWARD * 6.0 * 0.02).length() < 1e-6);

        c.fixed_update(&forward.with_crouch(true), &mut env, t(4), DT);
        assert!((c.ground_velocity() - FORWARD * 4.0 * 0.02).length() < 1e-6);
    }

    #[test]
    fn grounded_mask_keeps_lateral_under_sideways_gravity() {
        let mut c = controller();
        c.update_gravity_direction(Vec3::X).unwrap();
        let mut env = ScriptedEnv {
            down: Vec3::X,
            ..Default::default()
        };

        // Fall sideways for a tick, then land on the +X wall
        c.fixed_update(&idle(), &mut env, t(1), DT);
        assert!(c.velocity().x > 0.0);

        env.ground = true;
        let strafe = ControlInput::default().with_movement(1.0, 0.0);
        c.fixed_update(&strafe, &mut env, t(2), DT);

        let v = c.velocity();
        assert_eq!(v.x, 0.0);
        assert!(v.length() > 0.0);
        assert!((v - c.ground_velocity()).length() < 1e-6);
    }

    #[test]
    fn crouch_moves_body_along_gravity() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        let crouch = ControlInput::default().with_crouch(true);

        for tick in 1..10 {
            c.fixed_update(&crouch, &mut env, t(tick), DT);
        }

        assert!(c.crouch().is_crouched());
        assert_eq!(c.crouch().height(), 1.0);
        assert_eq!(env.capsule_height, Some(1.0));
        // Half of the 1.0 height loss, along gravity
        assert!((env.position.y + 0.5).abs() < 1e-4);
        assert!((c.reach() - 0.58).abs() < 1e-6);
    }

    #[test]
    fn uncrouch_blocked_overhead() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        for tick in 1..10 {
            c.fixed_update(&ControlInput::default().with_crouch(true), &mut env, t(tick), DT);
        }

        env.overhead = true;
        c.fixed_update(&idle(), &mut env, t(10), DT);
        assert!(c.crouch().is_crouched());
        assert_eq!(c.crouch().height(), 1.0);

        // Retried on every tick crouch stays released
        env.overhead = false;
        c.fixed_update(&idle(), &mut env, t(11), DT);
        assert!(!c.crouch().is_crouched());
        assert!(c.crouch().height() > 1.0);
    }

    #[test]
    fn can_invert_gate() {
        let mut config = config();
        config.vertical.fall = ResponseCurve::constant(-20.0);
        let mut c = MovementController::new(config).unwrap();
        let mut env = ScriptedEnv::grounded();

        c.fixed_update(&idle(), &mut env, t(1), DT);
        assert!(!c.can_invert(), "grounded");

        env.ground = false;
        c.fixed_update(&idle(), &mut env, t(2), DT);
        assert!(c.can_invert());

        c.update_gravity_direction(Vec3::Y).unwrap();
        assert!(!c.can_invert(), "just flipped");

        // Falling toward the new gravity but still inside the 2s cooldown
        for tick in 3..100 {
            c.fixed_update(&idle(), &mut env, t(tick), DT);
            assert!(!c.can_invert(), "tick {tick}");
        }
        for tick in 100..110 {
            c.fixed_update(&idle(), &mut env, t(tick), DT);
        }
        assert!(c.can_invert());
    }

    #[test]
    fn rejected_gravity_keeps_previous() {
        let mut c = controller();
        c.update_gravity_direction(Vec3::new(0.0, 4.0, 0.0)).unwrap();
        assert_eq!(c.gravity().direction(), Vec3::Y);

        assert!(c.update_gravity_direction(Vec3::ZERO).is_err());
        assert_eq!(c.gravity().direction(), Vec3::Y);
        let flips = c
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GravityFlipped { .. }))
            .count();
        assert_eq!(flips, 1);
    }

    #[test]
    fn flip_reorients_body_and_keeps_heading() {
        let mut c = controller();
        let forward = c.transform().forward();
        c.update_gravity_direction(Vec3::Y).unwrap();
        assert!((c.transform().up() - Vec3::NEG_Y).length() < 1e-4);
        assert!((c.transform().forward() - forward).length() < 1e-4);
        assert!(c.camera().is_settling());
    }

    #[test]
    fn invalid_config_fails_construction() {
        let mut config = ControllerConfig::default();
        config.speed.walk = 0.0;
        assert!(MovementController::new(config).is_err());
    }

    #[test]
    fn landing_and_leaving_events() {
        let mut c = controller();
        let mut env = ScriptedEnv::grounded();
        c.fixed_update(&idle(), &mut env, t(1), DT);
        env.ground = false;
        c.fixed_update(&idle(), &mut env, t(2), DT);

        let events = c.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::Landed { entity: c.id() },
                GameEvent::LeftGround { entity: c.id() },
            ]
        );
    }
}
