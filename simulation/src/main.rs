//! Techburg Simulation Driver
//!
//! Seeds a population, runs the configured number of steps and narrates
//! the events. Pass a JSON config path as the first argument to override
//! the defaults.

use anyhow::Context;
use techburg::{SimEvent, SimulationConfig, SimulationWorld};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            SimulationConfig::from_json(&json).with_context(|| format!("parsing config {}", path))?
        }
        None => SimulationConfig::default(),
    };

    info!(
        size = config.grid_size,
        seed = config.seed,
        steps = config.steps,
        "Techburg simulation starting..."
    );

    let mut world = SimulationWorld::from_config(config)?;
    let steps = world.config.steps;

    for _ in 0..steps {
        let report = world.tick()?;
        for event in &report.events {
            match event {
                SimEvent::Deactivated { entity, x, y } => {
                    info!(tick = report.tick, "{:?} at ({}, {}) is deactivated.", entity, x, y)
                }
                SimEvent::Attack { attacker, defender, energy } => info!(
                    tick = report.tick,
                    "{:?} attacked {:?}, energy left {:.1}",
                    attacker,
                    defender,
                    energy
                ),
            }
        }
        if world.grid.active().is_empty() {
            info!(tick = report.tick, "No active entities left");
            break;
        }
    }

    let census = world.census();
    info!(
        ticks = world.current_tick(),
        gatherers = census.gatherers,
        predators = census.predators,
        swarms = census.swarms,
        "Simulation complete"
    );

    Ok(())
}
