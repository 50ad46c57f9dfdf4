//! Delivery task bookkeeping and scoring.

use std::time::Duration;

use bevy_ecs::prelude::Resource;
use flight::{builtins, horizontal_distance, SceneObject, Vec3f};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissionError {
    #[error("no active task")]
    NoActiveTask,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneChoice {
    #[default]
    City,
    Mountain,
    Open,
}

impl SceneChoice {
    pub fn build(self) -> SceneObject {
        match self {
            SceneChoice::City => builtins::city_block_scene(),
            SceneChoice::Mountain => builtins::mountain_scene(),
            SceneChoice::Open => builtins::open_field_scene(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub kind: String,
    pub name: String,
    /// kg
    pub weight: f32,
    pub fragile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightRequirements {
    pub min_altitude: f32,
    pub max_altitude: f32,
    pub max_speed: f32,
}

impl Default for FlightRequirements {
    fn default() -> Self {
        Self { min_altitude: 20.0, max_altitude: 120.0, max_speed: 20.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scene: SceneChoice,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub cargo: Cargo,
    pub start: Vec3f,
    pub destination: Vec3f,
    /// Intermediate points, flown in order at their own height.
    #[serde(default)]
    pub waypoints: Vec<Vec3f>,
    /// Seconds.
    #[serde(default)]
    pub time_limit: Option<f32>,
    #[serde(default)]
    pub requirements: FlightRequirements,
    pub cruise_altitude: f32,
}

// Used for the time score when a task has no explicit limit.
const DEFAULT_TIME_LIMIT_S: f32 = 300.0;
// Horizontal speed above which a progress sample counts as cruise.
const CRUISE_SAMPLE_SPEED: f32 = 2.0;

impl DeliveryTask {
    pub fn time_limit_or_default(&self) -> f32 {
        self.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_S)
    }

    /// Planned flight profile: pickup, straight up to cruise, the
    /// checkpoints, cruise to above the drop-off, straight down.
    pub fn route_points(&self) -> Vec<Vec3f> {
        let above = |p: Vec3f| Vec3f::new(p.x, self.cruise_altitude.max(p.y), p.z);
        let mut points = vec![self.start, above(self.start)];
        points.extend(self.waypoints.iter().copied());
        points.push(above(self.destination));
        points.push(self.destination);
        points
    }

    /// Length of the planned profile; the yardstick for path efficiency.
    pub fn planned_distance(&self) -> f32 {
        self.route_points().windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoStatus {
    #[default]
    Safe,
    Damaged,
    Lost,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskProgress {
    pub task_id: String,
    pub status: TaskStatus,
    pub elapsed: Duration,
    /// Metres flown.
    pub distance: f32,
    pub max_altitude: f32,
    pub avg_speed: f32,
    pub collisions: u32,
    pub cargo_status: CargoStatus,
    cruise_samples: u32,
    altitude_ok: u32,
    speed_ok: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub height: u32,
    pub heading: u32,
    pub speed: u32,
    pub obstacle: u32,
    pub time: u32,
    pub landing: u32,
    pub cargo: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.height + self.heading + self.speed + self.obstacle + self.time + self.landing + self.cargo
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub task_id: String,
    pub success: bool,
    pub status: TaskStatus,
    pub scores: ScoreBreakdown,
    pub total_score: u32,
    pub stars: u8,
    pub elapsed_secs: f32,
    pub flight_distance_km: f32,
    pub collisions: u32,
    pub cargo_status: CargoStatus,
    pub failure_reason: Option<String>,
}

pub fn stars_for(total: u32) -> u8 {
    if total >= 90 {
        5
    } else if total >= 80 {
        4
    } else if total >= 70 {
        3
    } else if total >= 60 {
        2
    } else {
        1
    }
}

fn time_score(elapsed_s: f32, limit_s: f32) -> u32 {
    if elapsed_s <= limit_s * 0.6 {
        20
    } else if elapsed_s <= limit_s * 0.8 {
        16
    } else if elapsed_s <= limit_s {
        12
    } else {
        5
    }
}

fn share(part: u32, whole: u32, out_of: f32) -> u32 {
    if whole == 0 {
        return out_of as u32;
    }
    (part as f32 / whole as f32 * out_of).round() as u32
}

#[derive(Debug, Clone)]
struct ActiveTask {
    task: DeliveryTask,
    progress: TaskProgress,
    last_position: Option<Vec3f>,
}

#[derive(Resource, Debug, Default)]
pub struct MissionManager {
    active: Option<ActiveTask>,
    history: Vec<TaskResult>,
}

impl MissionManager {
    pub fn start_task(&mut self, task: DeliveryTask) -> &TaskProgress {
        info!(task = %task.id, name = %task.name, "task started");
        let progress = TaskProgress {
            task_id: task.id.clone(),
            status: TaskStatus::InProgress,
            ..Default::default()
        };
        let active = self.active.insert(ActiveTask { task, progress, last_position: None });
        &active.progress
    }

    pub fn active_task(&self) -> Option<&DeliveryTask> {
        self.active.as_ref().map(|a| &a.task)
    }

    pub fn progress(&self) -> Option<&TaskProgress> {
        self.active.as_ref().map(|a| &a.progress)
    }

    pub fn history(&self) -> &[TaskResult] {
        &self.history
    }

    /// Fold one tick of flight into the running totals. Returns the final
    /// result when this tick pushed the task past its time limit.
    pub fn update_progress(
        &mut self,
        position: Vec3f,
        velocity: Vec3f,
        elapsed: Duration,
    ) -> Result<Option<TaskResult>, MissionError> {
        let active = self.active.as_mut().ok_or(MissionError::NoActiveTask)?;
        let req = &active.task.requirements;
        let p = &mut active.progress;

        if let Some(last) = active.last_position {
            p.distance += last.distance(position);
        }
        active.last_position = Some(position);
        p.elapsed = elapsed;
        p.max_altitude = p.max_altitude.max(position.y);
        let secs = elapsed.as_secs_f32();
        if secs > 0.0 {
            p.avg_speed = p.distance / secs;
        }

        let ground_speed = (velocity.x * velocity.x + velocity.z * velocity.z).sqrt();
        if ground_speed > CRUISE_SAMPLE_SPEED {
            p.cruise_samples += 1;
            if (req.min_altitude..=req.max_altitude).contains(&position.y) {
                p.altitude_ok += 1;
            }
            if ground_speed <= req.max_speed {
                p.speed_ok += 1;
            }
        }

        let limit = active.task.time_limit;
        match limit {
            Some(limit) if secs > limit => self.fail_task("time limit exceeded").map(Some),
            _ => Ok(None),
        }
    }

    /// Returns the running collision count.
    pub fn record_collision(&mut self) -> Result<u32, MissionError> {
        let active = self.active.as_mut().ok_or(MissionError::NoActiveTask)?;
        let p = &mut active.progress;
        p.collisions += 1;
        if active.task.cargo.fragile && p.cargo_status == CargoStatus::Safe {
            p.cargo_status = CargoStatus::Damaged;
        }
        Ok(p.collisions)
    }

    /// Finish the active task successfully. `landing_accuracy` is in [0, 1].
    pub fn complete_task(&mut self, landing_accuracy: f32) -> Result<TaskResult, MissionError> {
        let mut active = self.active.take().ok_or(MissionError::NoActiveTask)?;
        active.progress.status = TaskStatus::Completed;
        let (task, p) = (&active.task, &active.progress);

        let elapsed_s = p.elapsed.as_secs_f32();
        let efficiency = if p.distance > 0.0 {
            (task.planned_distance() / p.distance).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let scores = ScoreBreakdown {
            height: share(p.altitude_ok, p.cruise_samples, 10.0),
            heading: (efficiency * 10.0).round() as u32,
            speed: share(p.speed_ok, p.cruise_samples, 15.0),
            obstacle: 15u32.saturating_sub(5 * p.collisions),
            time: time_score(elapsed_s, task.time_limit_or_default()),
            landing: (landing_accuracy.clamp(0.0, 1.0) * 15.0).round() as u32,
            cargo: match p.cargo_status {
                CargoStatus::Safe => 15,
                CargoStatus::Damaged => 8,
                CargoStatus::Lost => 0,
            },
        };
        let total = scores.total();
        let result = TaskResult {
            task_id: task.id.clone(),
            success: total >= 60,
            status: TaskStatus::Completed,
            scores,
            total_score: total,
            stars: stars_for(total),
            elapsed_secs: elapsed_s,
            flight_distance_km: p.distance / 1000.0,
            collisions: p.collisions,
            cargo_status: p.cargo_status,
            failure_reason: None,
        };
        info!(task = %result.task_id, total, stars = result.stars, "task completed");
        self.history.push(result.clone());
        Ok(result)
    }

    pub fn fail_task(&mut self, reason: &str) -> Result<TaskResult, MissionError> {
        let active = self.active.take().ok_or(MissionError::NoActiveTask)?;
        let p = active.progress;
        let result = TaskResult {
            task_id: active.task.id,
            success: false,
            status: TaskStatus::Failed,
            scores: ScoreBreakdown::default(),
            total_score: 0,
            stars: 1,
            elapsed_secs: p.elapsed.as_secs_f32(),
            flight_distance_km: p.distance / 1000.0,
            collisions: p.collisions,
            cargo_status: p.cargo_status,
            failure_reason: Some(reason.to_string()),
        };
        info!(task = %result.task_id, reason, "task failed");
        self.history.push(result.clone());
        Ok(result)
    }

    /// Drop the active task without recording a result.
    pub fn cancel_task(&mut self) -> Option<DeliveryTask> {
        self.active.take().map(|a| a.task)
    }
}

/// 1 at the centre of the pad, 0 at `tolerance` metres or further.
pub fn landing_accuracy(landed_at: Vec3f, destination: Vec3f, tolerance: f32) -> f32 {
    1.0 - (horizontal_distance(landed_at, destination) / tolerance.max(f32::EPSILON)).min(1.0)
}
