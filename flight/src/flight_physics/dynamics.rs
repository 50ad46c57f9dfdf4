use super::forces::{drag_force, gravity_force, thrust_force};
use super::types::{ControlInput, FlightState, FlightStepDebug};
use super::util::{clamp_horizontal, horizontal_len};
use crate::{lerp, wrap_angle, FlightPhysicsConfig, Vec3f};

// Fraction of the gap to the target tilt closed per tick.
const TILT_SMOOTHING: f32 = 0.1;

/// Simplified multirotor model: thrust, quadratic drag and gravity with a
/// horizontal speed cap and a bounded flight volume.
#[derive(Debug, Clone, Default)]
pub struct FlightPhysics {
    config: FlightPhysicsConfig,
    state: FlightState,
    engine_running: bool,
}

impl FlightPhysics {
    pub fn new(config: FlightPhysicsConfig) -> Self {
        Self { config, state: FlightState::default(), engine_running: false }
    }

    pub fn config(&self) -> &FlightPhysicsConfig {
        &self.config
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn start_engine(&mut self) {
        self.engine_running = true;
    }

    pub fn stop_engine(&mut self) {
        self.engine_running = false;
    }

    pub fn is_running(&self) -> bool {
        self.engine_running
    }

    /// Teleport without touching velocity.
    pub fn set_position(&mut self, position: Vec3f) {
        self.state.position = position;
        self.state.refresh_derived();
    }

    /// Overwrite orientation (x = pitch, y = yaw, z = roll).
    pub fn set_rotation(&mut self, rotation: Vec3f) {
        self.state.rotation = rotation;
        self.state.refresh_derived();
    }

    /// Zero the whole state and stop the engine.
    pub fn reset(&mut self) {
        self.state = FlightState::default();
        self.state.refresh_derived();
        self.engine_running = false;
    }

    pub fn distance_to(&self, target: Vec3f) -> f32 {
        self.state.position.distance(target)
    }

    /// Unit vector toward `target`, or zero when already there.
    pub fn direction_to(&self, target: Vec3f) -> Vec3f {
        (target - self.state.position).normalize_or_zero()
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: ControlInput) {
        self.update_dbg(dt, input, None);
    }

    /// Variant of `update` that fills out an optional telemetry struct.
    pub fn update_dbg(&mut self, dt: f32, input: ControlInput, mut dbg: Option<&mut FlightStepDebug>) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        if let Some(d) = dbg.as_deref_mut() {
            *d = FlightStepDebug {
                dt,
                input,
                engine_running: self.engine_running,
                heading: self.state.rotation.y,
                ..Default::default()
            };
        }

        if !self.engine_running {
            self.coast(dt, dbg);
            return;
        }

        let cfg = &self.config;
        let s = &mut self.state;

        let heading = s.rotation.y;
        let thrust = thrust_force(cfg, heading, input);
        let drag = drag_force(cfg, s.velocity);
        let gravity = gravity_force(cfg);
        let net = thrust + drag + gravity;
        let accel = if cfg.mass > 0.0 { net / cfg.mass } else { Vec3f::ZERO };

        s.acceleration = accel;
        s.velocity += accel * dt;
        let speed_clamped = clamp_horizontal(&mut s.velocity, cfg.max_speed);
        s.position += s.velocity * dt;

        s.rotation.y = wrap_angle(s.rotation.y + input.yaw * cfg.rotation_speed * dt);
        s.rotation.x = lerp(s.rotation.x, -input.pitch * cfg.tilt_angle, TILT_SMOOTHING);
        s.rotation.z = lerp(s.rotation.z, -input.roll * cfg.tilt_angle, TILT_SMOOTHING);

        // Flight volume: ground, ceiling, then horizontal radius.
        let hit_ground = s.position.y < 0.0;
        if hit_ground {
            s.position.y = 0.0;
            s.velocity.y = 0.0;
        }
        let hit_ceiling = s.position.y > cfg.max_altitude;
        if hit_ceiling {
            s.position.y = cfg.max_altitude;
            s.velocity.y = s.velocity.y.min(0.0);
        }
        let radial = horizontal_len(s.position);
        let hit_boundary = radial > cfg.boundary_radius;
        if hit_boundary {
            let scale = cfg.boundary_radius / radial;
            s.position.x *= scale;
            s.position.z *= scale;
        }

        s.refresh_derived();

        debug_assert!(
            !s.velocity.is_finite() || horizontal_len(s.velocity) <= cfg.max_speed.max(0.0) * (1.0 + 1e-4) + 1e-4,
            "horizontal speed {} above cap {}",
            horizontal_len(s.velocity),
            cfg.max_speed
        );

        if let Some(d) = dbg {
            d.thrust = thrust;
            d.drag = drag;
            d.gravity = gravity;
            d.net_force = net;
            d.acceleration = accel;
            d.speed_clamped = speed_clamped;
            d.hit_ground = hit_ground;
            d.hit_ceiling = hit_ceiling;
            d.hit_boundary = hit_boundary;
        }
    }

    // Engine off: gravity only, no steering, settles onto the ground.
    fn coast(&mut self, dt: f32, dbg: Option<&mut FlightStepDebug>) {
        let g = self.config.gravity;
        let s = &mut self.state;

        let airborne = s.position.y > 0.0;
        if airborne {
            s.velocity.y -= g * dt;
        } else {
            s.velocity = Vec3f::ZERO;
            s.position.y = 0.0;
        }
        s.position += s.velocity * dt;

        let hit_ground = s.position.y < 0.0;
        if hit_ground {
            s.position.y = 0.0;
            s.velocity.y = 0.0;
        }
        s.refresh_derived();

        if let Some(d) = dbg {
            d.gravity = gravity_force(&self.config);
            d.hit_ground = hit_ground;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut phys = FlightPhysics::default();
        phys.start_engine();
        phys.set_position(Vec3f::new(1.0, 20.0, 3.0));
        let before = *phys.state();
        phys.update(0.0, ControlInput { throttle: 1.0, pitch: 1.0, ..Default::default() });
        phys.update(-0.5, ControlInput { throttle: 1.0, ..Default::default() });
        phys.update(f32::NAN, ControlInput { throttle: 1.0, ..Default::default() });
        assert_eq!(*phys.state(), before);
    }

    #[test]
    fn set_position_refreshes_derived_fields() {
        let mut phys = FlightPhysics::default();
        phys.set_position(Vec3f::new(0.0, 0.05, 0.0));
        assert!(phys.state().is_grounded);
        phys.set_position(Vec3f::new(0.0, 12.0, 0.0));
        assert_eq!(phys.state().altitude, 12.0);
        assert!(!phys.state().is_grounded);
        phys.set_rotation(Vec3f::new(0.0, 1.25, 0.0));
        assert_eq!(phys.state().heading, 1.25);
    }

    #[test]
    fn reset_zeroes_and_stops() {
        let mut phys = FlightPhysics::default();
        phys.start_engine();
        phys.set_position(Vec3f::new(4.0, 30.0, -2.0));
        phys.update(1.0 / 60.0, ControlInput { throttle: 1.0, pitch: 0.5, ..Default::default() });
        phys.reset();
        assert!(!phys.is_running());
        assert_eq!(phys.state().position, Vec3f::ZERO);
        assert_eq!(phys.state().velocity, Vec3f::ZERO);
        assert!(phys.state().is_grounded);
    }

    #[test]
    fn ceiling_caps_climb() {
        let cfg = FlightPhysicsConfig { max_altitude: 50.0, ..Default::default() };
        let mut phys = FlightPhysics::new(cfg);
        phys.start_engine();
        phys.set_position(Vec3f::new(0.0, 49.0, 0.0));
        let mut dbg = FlightStepDebug::default();
        for _ in 0..240 {
            phys.update_dbg(1.0 / 60.0, ControlInput { throttle: 1.0, ..Default::default() }, Some(&mut dbg));
            assert!(phys.state().altitude <= 50.0, "altitude {} above ceiling", phys.state().altitude);
        }
        assert!(dbg.hit_ceiling);
        assert!(phys.state().velocity.y <= 0.0);
    }

    #[test]
    fn boundary_radius_pulls_back_inside() {
        let cfg = FlightPhysicsConfig { boundary_radius: 100.0, ..Default::default() };
        let mut phys = FlightPhysics::new(cfg);
        phys.start_engine();
        phys.set_position(Vec3f::new(99.9, 20.0, 0.0));
        phys.set_rotation(Vec3f::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        for _ in 0..300 {
            phys.update(1.0 / 60.0, ControlInput { pitch: 1.0, ..Default::default() });
            let p = phys.state().position;
            assert!(horizontal_len(p) <= 100.0 + 1e-3, "left the flight volume: {p:?}");
        }
    }

    #[test]
    fn direction_to_degenerate_is_zero() {
        let phys = FlightPhysics::default();
        assert_eq!(phys.direction_to(Vec3f::ZERO), Vec3f::ZERO);
        let d = phys.direction_to(Vec3f::new(0.0, 0.0, 10.0));
        assert!((d - Vec3f::Z).length() < 1e-6);
        assert_eq!(phys.distance_to(Vec3f::new(3.0, 4.0, 0.0)), 5.0);
    }
}
