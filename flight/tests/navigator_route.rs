use flight::{
    FlightPhysics, NavigationPhase, NavigatorConfig, Vec3f, WaypointKind, WaypointNavigator,
    WaypointSpec,
};

fn l_shaped_route() -> WaypointNavigator {
    let mut nav = WaypointNavigator::new(NavigatorConfig::default());
    nav.set_waypoints([
        WaypointSpec::new(Vec3f::new(0.0, 50.0, 0.0), WaypointKind::Start),
        WaypointSpec::new(Vec3f::new(0.0, 50.0, 30.0), WaypointKind::Waypoint),
        WaypointSpec::new(Vec3f::new(40.0, 50.0, 30.0), WaypointKind::Destination),
    ]);
    nav
}

#[test]
fn total_distance_is_the_sum_of_legs() {
    let mut nav = l_shaped_route();
    assert!((nav.total_distance() - 70.0).abs() < 1e-4);
    nav.start_navigation();
    for z in [0.0, 10.0, 20.0, 29.0] {
        nav.update(Vec3f::new(0.0, 50.0, z));
        assert!((nav.total_distance() - 70.0).abs() < 1e-4, "update must not change the total");
    }
}

#[test]
fn completion_is_reported_in_the_arrival_tick() {
    let mut nav = l_shaped_route();
    assert!(nav.start_navigation());

    let s = nav.update(Vec3f::new(0.0, 50.0, 2.0));
    assert_eq!(s.current_waypoint_index, 1, "start reached, cursor on the middle waypoint");
    assert!(s.is_navigating);

    let s = nav.update(Vec3f::new(0.0, 50.0, 27.0));
    assert_eq!(s.current_waypoint_index, 2);
    assert!((nav.covered_distance() - 30.0).abs() < 1e-4);
    assert!((s.distance_remaining - (40.0f32.powi(2) + 9.0).sqrt()).abs() < 1e-3);

    let s = nav.update(Vec3f::new(38.0, 50.0, 30.0));
    assert!(!s.is_navigating, "final arrival must end navigation in the same call");
    assert_eq!(s.progress, 100.0);
    assert_eq!(s.phase, NavigationPhase::Completed);
    assert!((nav.covered_distance() - 70.0).abs() < 1e-4);
    assert!(nav.current_waypoint().is_none());
    assert!(!nav.resume_navigation(), "a finished route cannot be resumed");
}

#[test]
fn arrival_radius_is_strict() {
    let mut nav = l_shaped_route();
    nav.start_navigation();
    let s = nav.update(Vec3f::new(0.0, 50.0, -5.0));
    assert_eq!(s.current_waypoint_index, 0, "exactly on the radius is not an arrival");
    assert!((s.distance_to_next - 5.0).abs() < 1e-6);
}

#[test]
fn steering_flies_the_route() {
    let mut nav = l_shaped_route();
    let mut phys = FlightPhysics::default();
    phys.start_engine();
    phys.set_position(Vec3f::new(0.0, 50.0, -10.0));
    nav.start_navigation();

    let dt = 1.0 / 60.0;
    let mut finished = false;
    for _ in 0..60 * 120 {
        let s = phys.state();
        let state = nav.update(s.position);
        if state.phase == NavigationPhase::Completed {
            finished = true;
            break;
        }
        let input = nav.get_navigation_input(s.position, s.heading).with_throttle(0.0);
        phys.update(dt, input);
    }
    assert!(finished, "route not completed; stuck at {:?}", phys.state().position);
    let end = phys.state().position;
    assert!(end.distance(Vec3f::new(40.0, 50.0, 30.0)) < 5.0);
}

#[test]
fn return_path_climbs_then_lands_at_home() {
    let mut nav = l_shaped_route();
    nav.start_navigation();
    let here = Vec3f::new(120.0, 12.0, -40.0);
    let home = Vec3f::new(0.0, 0.0, 0.0);
    nav.generate_return_path(here, home);

    let wps = nav.waypoints();
    assert_eq!(wps.len(), 3);
    let kinds: Vec<_> = wps.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, [WaypointKind::Start, WaypointKind::Waypoint, WaypointKind::Destination]);
    assert_eq!(wps[0].position, here);
    assert_eq!(wps[1].position, Vec3f::new(0.0, 30.0, 0.0), "transit sits at max(12, 30) above home");
    assert_eq!(wps[2].position, home);
    assert_eq!(nav.phase(), NavigationPhase::Idle, "a new path needs an explicit start");

    // Higher than the floor: keep the current altitude for transit.
    nav.generate_return_path(Vec3f::new(5.0, 80.0, 5.0), home);
    assert_eq!(nav.waypoints()[1].position.y, 80.0);
}

#[test]
fn return_path_keeps_default_cruise_altitude() {
    let mut nav = WaypointNavigator::new(NavigatorConfig::default());
    nav.generate_return_path(Vec3f::new(100.0, 12.0, 0.0), Vec3f::ZERO);
    let altitudes: Vec<_> = nav.waypoints().iter().map(|w| w.altitude).collect();
    assert_eq!(altitudes, [50.0, 50.0, 50.0], "height is carried by position.y only");

    assert!(nav.start_navigation());
    assert_eq!(nav.get_target_altitude(), 50.0);
    nav.update(Vec3f::new(100.0, 12.0, 0.0));
    assert_eq!(nav.current_index(), 1);
    assert_eq!(nav.get_target_altitude(), 50.0);
    assert_eq!(nav.current_waypoint().map(|w| w.position.y), Some(30.0));
}

#[test]
fn reloading_the_same_path_keeps_the_total() {
    let points = [
        WaypointSpec::new(Vec3f::new(0.0, 0.0, 0.0), WaypointKind::Start),
        WaypointSpec::new(Vec3f::new(10.0, 0.0, 0.0), WaypointKind::Waypoint),
        WaypointSpec::new(Vec3f::new(25.0, 0.0, 0.0), WaypointKind::Destination),
    ];
    let mut nav = WaypointNavigator::new(NavigatorConfig::default());
    nav.set_waypoints(points.clone());
    assert!((nav.total_distance() - 25.0).abs() < 1e-5);
    nav.set_waypoints(points);
    assert!((nav.total_distance() - 25.0).abs() < 1e-5, "total is recomputed, not accumulated");
    assert_eq!(nav.waypoints().len(), 3);
}
