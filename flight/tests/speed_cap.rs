use flight::{ControlInput, FlightPhysics, FlightPhysicsConfig, Vec3f};

#[test]
fn horizontal_speed_never_exceeds_the_cap() {
    let cfg = FlightPhysicsConfig { max_speed: 5.0, ..Default::default() };
    let mut phys = FlightPhysics::new(cfg);
    phys.start_engine();
    phys.set_position(Vec3f::new(0.0, 100.0, 0.0));

    let input = ControlInput { pitch: 1.0, roll: 1.0, ..Default::default() };
    for tick in 0..600 {
        phys.update(1.0 / 60.0, input);
        let hs = phys.state().horizontal_speed();
        assert!(hs <= 5.0 + 1e-3, "tick {tick}: horizontal speed {hs} above cap");
    }
    let hs = phys.state().horizontal_speed();
    assert!(hs > 4.9, "full stick should ride the cap, got {hs}");
}

#[test]
fn drag_limits_speed_below_a_loose_cap() {
    // Default airframe: 30 N forward against 0.3·v² drag settles near 10 m/s.
    let mut phys = FlightPhysics::new(FlightPhysicsConfig::default());
    phys.start_engine();
    phys.set_position(Vec3f::new(0.0, 100.0, 0.0));
    for _ in 0..1200 {
        phys.update(1.0 / 60.0, ControlInput { pitch: 1.0, ..Default::default() });
    }
    let hs = phys.state().horizontal_speed();
    assert!((hs - 10.0).abs() < 0.2, "expected drag-limited cruise near 10 m/s, got {hs}");
}
