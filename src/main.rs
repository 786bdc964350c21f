//! Headless runner for tile collision scenarios.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use log::info;
use tilebound::scenario::Scenario;
use tilebound::{init_logging, Hitbox, KinematicBody, KinematicsPlugin, KinematicsSet};

/// Runs a tile collision scenario and logs where every body ends up
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file in JSON
    #[arg(short, long)]
    scenario: PathBuf,
    /// Number of ticks to run instead of the scenario's own count
    #[arg(short, long)]
    ticks: Option<u32>,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Resource, Debug, Clone, Copy)]
struct Gravity {
    acceleration: f32,
    max_fall: f32,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn apply_gravity(gravity: Res<Gravity>, mut bodies: Query<&mut KinematicBody>) {
    for mut body in &mut bodies {
        body.accel_y(gravity.acceleration, gravity.max_fall);
    }
}

fn report(world: &mut World) {
    let mut bodies = world.query::<(&Name, &Hitbox, &KinematicBody)>();
    for (name, hitbox, body) in bodies.iter(world) {
        info!(
            "{name}: at ({:.2}, {:.2}) moving ({:.2}, {:.2}) {:?}",
            hitbox.x, hitbox.y, body.velocity.x, body.velocity.y, body.flags
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let json = fs::read_to_string(&args.scenario)
        .with_context(|| format!("failed to read {}", args.scenario.display()))?;
    let scenario = Scenario::from_json(&json)
        .with_context(|| format!("failed to parse {}", args.scenario.display()))?;
    let grid = scenario.grid().context("invalid tile legend")?;
    info!(
        "loaded {}x{} grid with {} bodies",
        grid.width(),
        grid.height(),
        scenario.bodies.len()
    );

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(KinematicsPlugin)
        .insert_resource(grid)
        .insert_resource(Gravity {
            acceleration: scenario.gravity,
            max_fall: scenario.max_fall,
        })
        .add_systems(Update, apply_gravity.before(KinematicsSet));
    for body in &scenario.bodies {
        app.world_mut().spawn(body.bundle());
    }

    let ticks = args.ticks.unwrap_or(scenario.ticks);
    for _ in 0..ticks {
        app.update();
    }
    info!("ran {ticks} ticks");
    report(app.world_mut());
    Ok(())
}
