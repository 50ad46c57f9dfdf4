use std::time::Duration;

use anyhow::Result;
use bevy_app::ScheduleRunnerPlugin;
use clap::Parser;
use tracing::info;

use sim::{build_sim_app, load_config, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(args.config.as_deref())?;
    cfg.apply_args(&args)?;
    info!(?cfg, "Sim config loaded");

    let wait = if args.realtime { Duration::from_secs_f32(cfg.dt()) } else { Duration::ZERO };
    let mut app = build_sim_app(cfg);
    app.add_plugins(ScheduleRunnerPlugin::run_loop(wait));
    app.insert_resource(args);
    app.run();
    Ok(())
}
