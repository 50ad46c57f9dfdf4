//! Ground traffic moving along fixed road polylines.
//!
//! Vehicles are deterministic: they start where the config puts them and
//! advance at constant speed. Their transforms are what the collision
//! system tracks.

use bevy_ecs::prelude::Resource;
use flight::{lerp, ObjectId, TrackedVehicle, Vec3f, VehicleTransform};
use serde::{Deserialize, Serialize};

// Road surface height.
const ROAD_Y: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
}

impl VehicleClass {
    /// Body size: width, height, length.
    pub fn body_size(self) -> Vec3f {
        match self {
            VehicleClass::Car => Vec3f::new(1.0, 0.8, 2.2),
            VehicleClass::Truck => Vec3f::new(1.2, 1.5, 3.5),
            VehicleClass::Bus => Vec3f::new(1.4, 1.8, 5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadPath {
    pub name: String,
    pub points: Vec<Vec3f>,
}

impl RoadPath {
    fn segment(&self, index: usize) -> Option<(Vec3f, Vec3f)> {
        Some((*self.points.get(index)?, *self.points.get(index + 1)?))
    }

    fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// East-west and north-south arterials plus the ring road.
pub fn default_roads() -> Vec<RoadPath> {
    let ring_radius = 80.0;
    let ring: Vec<Vec3f> = (0..=16)
        .map(|i| {
            let a = i as f32 * std::f32::consts::PI / 8.0;
            Vec3f::new(a.cos() * ring_radius, ROAD_Y, a.sin() * ring_radius)
        })
        .collect();
    vec![
        RoadPath {
            name: "east_west".into(),
            points: vec![Vec3f::new(-150.0, ROAD_Y, 0.0), Vec3f::new(150.0, ROAD_Y, 0.0)],
        },
        RoadPath {
            name: "north_south".into(),
            points: vec![Vec3f::new(0.0, ROAD_Y, -150.0), Vec3f::new(0.0, ROAD_Y, 150.0)],
        },
        RoadPath { name: "ring".into(), points: ring },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub id: String,
    pub class: VehicleClass,
    /// Index into the road list.
    pub road: usize,
    /// m/s
    pub speed: f32,
    #[serde(default)]
    pub segment: usize,
    /// Fraction of the starting segment already covered.
    #[serde(default)]
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub enabled: bool,
    pub roads: Vec<RoadPath>,
    pub vehicles: Vec<VehicleSpec>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        let v = |id: &str, class, road, speed, segment, progress| VehicleSpec {
            id: id.into(),
            class,
            road,
            speed,
            segment,
            progress,
        };
        Self {
            enabled: true,
            roads: default_roads(),
            vehicles: vec![
                v("car_0", VehicleClass::Car, 0, 12.0, 0, 0.0),
                v("truck_0", VehicleClass::Truck, 0, 8.0, 0, 0.5),
                v("car_1", VehicleClass::Car, 1, 10.0, 0, 0.2),
                v("truck_1", VehicleClass::Truck, 1, 9.0, 0, 0.7),
                v("bus_0", VehicleClass::Bus, 2, 7.0, 0, 0.0),
                v("car_2", VehicleClass::Car, 2, 11.0, 8, 0.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: ObjectId,
    pub class: VehicleClass,
    pub road: usize,
    pub segment: usize,
    pub progress: f32,
    pub speed: f32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Traffic {
    roads: Vec<RoadPath>,
    vehicles: Vec<Vehicle>,
}

impl Traffic {
    /// Vehicles pointing at a missing road or a road with fewer than two
    /// points are dropped.
    pub fn new(cfg: &TrafficConfig) -> Self {
        if !cfg.enabled {
            return Self::default();
        }
        let vehicles = cfg
            .vehicles
            .iter()
            .filter(|spec| cfg.roads.get(spec.road).is_some_and(|r| r.segment_count() > 0))
            .map(|spec| {
                let segs = cfg.roads[spec.road].segment_count();
                Vehicle {
                    id: ObjectId::from(spec.id.as_str()),
                    class: spec.class,
                    road: spec.road,
                    segment: spec.segment % segs,
                    progress: spec.progress.clamp(0.0, 1.0),
                    speed: spec.speed.max(0.0),
                }
            })
            .collect();
        Self { roads: cfg.roads.clone(), vehicles }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn roads(&self) -> &[RoadPath] {
        &self.roads
    }

    /// Move every vehicle `speed * dt` metres along its road, wrapping back
    /// to the first segment after the last.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for v in &mut self.vehicles {
            let Some(road) = self.roads.get(v.road) else { continue };
            let segs = road.segment_count();
            let mut travel = v.speed * dt;
            // One pass over the whole road at most; longer jumps are truncated.
            for _ in 0..=segs {
                let Some((a, b)) = road.segment(v.segment) else {
                    v.segment = 0;
                    break;
                };
                let len = a.distance(b);
                let left = (1.0 - v.progress) * len;
                if travel < left {
                    if len > 0.0 {
                        v.progress += travel / len;
                    }
                    break;
                }
                travel -= left;
                v.progress = 0.0;
                v.segment = (v.segment + 1) % segs;
            }
        }
    }

    pub fn transform_of(&self, v: &Vehicle) -> Option<VehicleTransform> {
        let (a, b) = self.roads.get(v.road)?.segment(v.segment)?;
        let position = Vec3f::new(
            lerp(a.x, b.x, v.progress),
            lerp(a.y, b.y, v.progress),
            lerp(a.z, b.z, v.progress),
        );
        let dir = b - a;
        Some(VehicleTransform { position, heading: dir.x.atan2(dir.z) })
    }

    pub fn transforms(&self) -> impl Iterator<Item = (ObjectId, VehicleTransform)> + '_ {
        self.vehicles
            .iter()
            .filter_map(|v| self.transform_of(v).map(|t| (v.id.clone(), t)))
    }

    /// Collision records for registering the current fleet.
    pub fn tracked_vehicles(&self) -> Vec<TrackedVehicle> {
        self.vehicles
            .iter()
            .filter_map(|v| {
                let t = self.transform_of(v)?;
                Some(TrackedVehicle::new(v.id.clone(), v.class.body_size() * 0.5, t))
            })
            .collect()
    }
}
