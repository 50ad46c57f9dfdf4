use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bevy_ecs::prelude::Resource;
use clap::Parser;
use flight::{CollisionConfig, FlightPhysicsConfig, NavigatorConfig, Vec3f};
use serde::{Deserialize, Serialize};

use crate::autopilot::{PilotConfig, PilotMode};
use crate::mission::DeliveryTask;
use crate::tasks;
use crate::traffic::TrafficConfig;

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "drone-sim", about = "Headless drone delivery simulation")]
pub struct Args {
    /// TOML config; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Fly a built-in task by id (city_easy, city_multi, emergency, mountain)
    #[arg(long)]
    pub task: Option<String>,
    /// Replay the configured manual input instead of flying the route
    #[arg(long, default_value_t = false)]
    pub manual: bool,
    /// Sleep between ticks to run at wall-clock speed
    #[arg(long, default_value_t = false)]
    pub realtime: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct Config {
    pub tick_hz: f32,
    pub max_ticks: u64,
    /// Ticks between telemetry log lines; 0 disables them.
    pub telemetry_every: u64,
    pub home: Vec3f,
    /// Fly back and land at `home` after a successful drop-off.
    pub return_home: bool,
    /// Horizontal miss, in metres, that scores zero landing accuracy.
    pub landing_tolerance: f32,
    pub physics: FlightPhysicsConfig,
    pub navigation: NavigatorConfig,
    pub collision: CollisionConfig,
    pub pilot: PilotConfig,
    pub traffic: TrafficConfig,
    pub task: DeliveryTask,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            max_ticks: 60 * 900,
            telemetry_every: 60,
            home: Vec3f::ZERO,
            return_home: false,
            landing_tolerance: 10.0,
            physics: FlightPhysicsConfig::default(),
            navigation: NavigatorConfig::default(),
            collision: CollisionConfig::default(),
            pilot: PilotConfig::default(),
            traffic: TrafficConfig::default(),
            task: tasks::city_easy(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            bail!("tick_hz must be a positive number, got {}", self.tick_hz);
        }
        if self.physics.mass <= 0.0 {
            bail!("physics.mass must be positive, got {}", self.physics.mass);
        }
        if self.task.cruise_altitude > self.physics.max_altitude {
            bail!(
                "task {} cruises at {} m, above the {} m ceiling",
                self.task.id,
                self.task.cruise_altitude,
                self.physics.max_altitude
            );
        }
        Ok(())
    }

    /// Fold command-line overrides into the loaded config.
    pub fn apply_args(&mut self, args: &Args) -> Result<()> {
        if let Some(ticks) = args.ticks {
            self.max_ticks = ticks;
        }
        if let Some(id) = &args.task {
            let Some(task) = tasks::by_id(id) else {
                let known: Vec<_> = tasks::all().into_iter().map(|t| t.id).collect();
                bail!("unknown task {id:?}; known tasks: {}", known.join(", "));
            };
            self.task = task;
        }
        if args.manual {
            self.pilot.mode = PilotMode::Manual;
        }
        self.validate()
    }

    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let cfg: Config = toml::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validating config file {}", path.display()))?;
    Ok(cfg)
}
