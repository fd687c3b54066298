//! Gatherer System
//!
//! Bots burn energy every tick and forage for spare parts within vision.

use hecs::Entity;
use rand::Rng;
use tracing::info;

use crate::components::{EntityKind, Gatherer};
use crate::error::GridError;
use crate::events::{SimEvent, TickReport};
use crate::grid::Grid;

/// Energy spent per activation
const TICK_COST: f32 = 5.0;

pub fn gatherer_system<R: Rng>(
    grid: &mut Grid<R>,
    entity: Entity,
    report: &mut TickReport,
) -> Result<(), GridError> {
    let energy = grid.drain_energy(entity, TICK_COST)?;
    if energy.is_exhausted() {
        let pos = grid.remove(entity)?;
        info!(x = pos.x, y = pos.y, "bot deactivated");
        report.push(SimEvent::Deactivated {
            entity,
            x: pos.x,
            y: pos.y,
        });
        return Ok(());
    }

    let bot: Gatherer = grid.component(entity, "Gatherer")?;
    let origin = grid.position(entity)?;
    match grid.scan_first(origin, bot.vision, is_forage) {
        Some((offset, _part)) => grid.step(entity, offset.step(bot.speed))?,
        None => grid.random_step(entity)?,
    };
    Ok(())
}

fn is_forage(kind: EntityKind) -> bool {
    match kind {
        EntityKind::Resource => true,
        EntityKind::Station | EntityKind::Gatherer | EntityKind::Predator | EntityKind::Swarm => false,
    }
}
