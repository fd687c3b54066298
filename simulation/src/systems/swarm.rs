//! Swarm System
//!
//! Swarms sting every bot and drone around them, then drift one cell.

use hecs::Entity;
use rand::Rng;
use tracing::debug;

use crate::components::EntityKind;
use crate::error::GridError;
use crate::events::{SimEvent, TickReport};
use crate::grid::Grid;

const STING_DAMAGE: f32 = 3.0;

const STING_RADIUS: u32 = 1;

pub fn swarm_system<R: Rng>(
    grid: &mut Grid<R>,
    entity: Entity,
    report: &mut TickReport,
) -> Result<(), GridError> {
    let origin = grid.position(entity)?;

    // No floor clamp here; a bot pushed below zero deactivates on its own turn
    for target in grid.scan_all(origin, STING_RADIUS, is_stung) {
        let left = grid.drain_energy(target, STING_DAMAGE)?;
        debug!(attacker = ?entity, defender = ?target, energy = left.0, "swarm sting");
        report.push(SimEvent::Attack {
            attacker: entity,
            defender: target,
            energy: left.0,
        });
    }

    grid.random_step(entity)?;
    Ok(())
}

fn is_stung(kind: EntityKind) -> bool {
    match kind {
        EntityKind::Gatherer | EntityKind::Predator => true,
        EntityKind::Resource | EntityKind::Station | EntityKind::Swarm => false,
    }
}
