use flight::{ControlInput, FlightPhysics, FlightPhysicsConfig, Vec3f};

#[test]
fn unpowered_drone_settles_on_the_ground() {
    let mut phys = FlightPhysics::new(FlightPhysicsConfig::default());
    phys.set_position(Vec3f::new(10.0, 40.0, -5.0));

    // Build up some forward speed first, then cut the motors.
    phys.start_engine();
    let cruise = ControlInput { pitch: 1.0, ..Default::default() };
    for _ in 0..120 {
        phys.update(1.0 / 60.0, cruise);
    }
    assert!(phys.state().horizontal_speed() > 1.0, "expected forward motion before cut-off");
    phys.stop_engine();

    let dt = 1.0 / 60.0;
    let mut landed_at = None;
    for tick in 0..900 {
        // Input is ignored with the engine off.
        phys.update(dt, ControlInput { throttle: 1.0, yaw: 1.0, pitch: 1.0, roll: 1.0 });
        let s = phys.state();
        assert!(s.position.y >= 0.0, "tick {tick}: drone below ground at y = {}", s.position.y);
        if landed_at.is_none() && s.is_grounded {
            landed_at = Some(tick);
        }
    }

    let s = phys.state();
    assert!(landed_at.is_some(), "never touched down");
    assert_eq!(s.position.y, 0.0);
    assert_eq!(s.velocity, Vec3f::ZERO, "velocity should be zero once resting");
    assert_eq!(s.speed, 0.0);
    assert!(s.is_grounded);
}

#[test]
fn unpowered_drone_ignores_yaw_and_tilt() {
    let mut phys = FlightPhysics::default();
    phys.set_position(Vec3f::new(0.0, 5.0, 0.0));
    phys.set_rotation(Vec3f::new(0.0, 0.4, 0.0));
    for _ in 0..60 {
        phys.update(1.0 / 60.0, ControlInput { yaw: 1.0, pitch: 1.0, roll: -1.0, ..Default::default() });
    }
    assert_eq!(phys.state().rotation, Vec3f::new(0.0, 0.4, 0.0));
    assert_eq!(phys.state().heading, 0.4);
}
