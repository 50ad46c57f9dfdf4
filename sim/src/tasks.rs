//! Built-in delivery tasks and the routes the autopilot flies for them.

use flight::{Vec3f, WaypointKind, WaypointSpec};

use crate::mission::{Cargo, DeliveryTask, Difficulty, FlightRequirements, SceneChoice};

fn parcel(name: &str, weight: f32, fragile: bool) -> Cargo {
    Cargo { kind: "parcel".into(), name: name.into(), weight, fragile }
}

pub fn city_easy() -> DeliveryTask {
    DeliveryTask {
        id: "city_easy".into(),
        name: "First delivery".into(),
        description: "Carry a parcel across the plaza to the north-east pad.".into(),
        scene: SceneChoice::City,
        difficulty: Difficulty::Easy,
        cargo: parcel("Books", 1.5, false),
        start: Vec3f::ZERO,
        destination: Vec3f::new(100.0, 0.0, 100.0),
        waypoints: Vec::new(),
        time_limit: Some(300.0),
        requirements: FlightRequirements::default(),
        cruise_altitude: 50.0,
    }
}

pub fn city_multi() -> DeliveryTask {
    DeliveryTask {
        id: "city_multi".into(),
        name: "Two-stop run".into(),
        description: "Follow the checkpoints over the plaza, then drop at the east pad.".into(),
        difficulty: Difficulty::Medium,
        cargo: parcel("Electronics", 2.0, true),
        destination: Vec3f::new(200.0, 0.0, 150.0),
        waypoints: vec![Vec3f::new(50.0, 50.0, 50.0), Vec3f::new(100.0, 50.0, 100.0)],
        time_limit: Some(420.0),
        ..city_easy()
    }
}

pub fn emergency() -> DeliveryTask {
    DeliveryTask {
        id: "emergency".into(),
        name: "Medical emergency".into(),
        description: "Rush medicine up the north avenue. Keep it steady.".into(),
        difficulty: Difficulty::Hard,
        cargo: Cargo { kind: "medical".into(), name: "Medicine".into(), weight: 0.8, fragile: true },
        destination: Vec3f::new(0.0, 0.0, 320.0),
        time_limit: Some(180.0),
        requirements: FlightRequirements { min_altitude: 30.0, max_altitude: 150.0, max_speed: 15.0 },
        ..city_easy()
    }
}

pub fn mountain() -> DeliveryTask {
    DeliveryTask {
        id: "mountain".into(),
        name: "Mountain rescue".into(),
        description: "Supplies for the mesa camp. Stay above the ridge.".into(),
        scene: SceneChoice::Mountain,
        difficulty: Difficulty::Hard,
        cargo: Cargo { kind: "supplies".into(), name: "Rescue kit".into(), weight: 3.0, fragile: false },
        destination: Vec3f::new(250.0, 100.0, 250.0),
        time_limit: Some(600.0),
        requirements: FlightRequirements { min_altitude: 80.0, max_altitude: 300.0, max_speed: 20.0 },
        cruise_altitude: 130.0,
        ..city_easy()
    }
}

pub fn all() -> Vec<DeliveryTask> {
    vec![city_easy(), city_multi(), emergency(), mountain()]
}

pub fn by_id(id: &str) -> Option<DeliveryTask> {
    all().into_iter().find(|t| t.id == id)
}

/// Waypoints for [`DeliveryTask::route_points`]: pickup, climb, checkpoints,
/// approach, drop-off. Each carries its own height as cruise altitude, except
/// the pickup which already asks for cruise so the drone lifts off at once.
pub fn delivery_route(task: &DeliveryTask) -> Vec<WaypointSpec> {
    let points = task.route_points();
    let last = points.len() - 1;
    points
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let (kind, name, altitude) = match i {
                0 => (WaypointKind::Start, "pickup".to_string(), task.cruise_altitude),
                1 => (WaypointKind::Waypoint, "climb".to_string(), p.y),
                i if i == last => (WaypointKind::Destination, "dropoff".to_string(), p.y),
                i if i + 1 == last => (WaypointKind::Waypoint, "approach".to_string(), p.y),
                i => (WaypointKind::Waypoint, format!("checkpoint_{}", i - 1), p.y),
            };
            WaypointSpec::new(p, kind).with_name(name).with_altitude(altitude)
        })
        .collect()
}
