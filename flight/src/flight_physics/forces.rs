use super::types::ControlInput;
use super::util::{forward_of, right_of};
use crate::{FlightPhysicsConfig, Vec3f};

// Share of max thrust available to each horizontal axis.
const HORIZONTAL_THRUST_SHARE: f32 = 0.3;
// Share of max thrust the throttle adds on top of hover.
const VERTICAL_THRUST_SHARE: f32 = 0.5;
// Below this speed drag is treated as zero.
const DRAG_DEADBAND: f32 = 0.01;

/// World-space thrust for a drone facing `heading`.
///
/// The vertical term centres on hover (`gravity * mass`) so zero throttle
/// holds altitude; it never pulls downward.
pub fn thrust_force(config: &FlightPhysicsConfig, heading: f32, input: ControlInput) -> Vec3f {
    let vertical =
        (config.hover_thrust() + input.throttle * config.max_thrust * VERTICAL_THRUST_SHARE).max(0.0);
    let forward = input.pitch * config.max_thrust * HORIZONTAL_THRUST_SHARE;
    let strafe = input.roll * config.max_thrust * HORIZONTAL_THRUST_SHARE;
    forward_of(heading) * forward + right_of(heading) * strafe + Vec3f::new(0.0, vertical, 0.0)
}

/// Quadratic drag opposing `velocity`.
pub fn drag_force(config: &FlightPhysicsConfig, velocity: Vec3f) -> Vec3f {
    let speed = velocity.length();
    if speed < DRAG_DEADBAND {
        return Vec3f::ZERO;
    }
    -(velocity / speed) * config.drag_coefficient * speed * speed
}

pub fn gravity_force(config: &FlightPhysicsConfig) -> Vec3f {
    Vec3f::new(0.0, -config.hover_thrust(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_throttle_cancels_gravity() {
        let cfg = FlightPhysicsConfig::default();
        let net = thrust_force(&cfg, 0.7, ControlInput::NEUTRAL) + gravity_force(&cfg);
        assert_eq!(net, Vec3f::ZERO);
    }

    #[test]
    fn full_down_throttle_never_pulls_down() {
        let cfg = FlightPhysicsConfig { max_thrust: 400.0, ..Default::default() };
        let t = thrust_force(&cfg, 0.0, ControlInput { throttle: -1.0, ..Default::default() });
        assert_eq!(t.y, 0.0, "vertical thrust clamps at zero, got {}", t.y);
    }

    #[test]
    fn drag_deadband_and_direction() {
        let cfg = FlightPhysicsConfig::default();
        assert_eq!(drag_force(&cfg, Vec3f::new(0.005, 0.0, 0.0)), Vec3f::ZERO);
        let d = drag_force(&cfg, Vec3f::new(0.0, 0.0, 10.0));
        assert!((d.z + 0.3 * 100.0).abs() < 1e-4, "drag.z = {}", d.z);
        assert_eq!(d.x, 0.0);
    }

    #[test]
    fn strafe_is_right_of_heading() {
        let cfg = FlightPhysicsConfig::default();
        let t = thrust_force(&cfg, 0.0, ControlInput { roll: 1.0, ..Default::default() });
        assert!((t.x - 30.0).abs() < 1e-4 && t.z.abs() < 1e-4, "strafe at heading 0 = {t:?}");
    }
}
