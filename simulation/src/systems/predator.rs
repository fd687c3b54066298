//! Predator System
//!
//! Drones rest until they have energy to spare, then hunt the first bot
//! they can see and bite it on contact.

use hecs::Entity;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::components::{Energy, EntityKind};
use crate::error::GridError;
use crate::events::{SimEvent, TickReport};
use crate::grid::Grid;

/// At or below this a drone regenerates instead of hunting
const REST_THRESHOLD: f32 = 20.0;

const REGEN_PER_TICK: f32 = 10.0;

const HUNT_RADIUS: u32 = 3;

/// Energy taken from a caught bot
const BITE_DAMAGE: f32 = 20.0;

pub fn predator_system<R: Rng>(
    grid: &mut Grid<R>,
    entity: Entity,
    report: &mut TickReport,
) -> Result<(), GridError> {
    let energy: Energy = grid.component(entity, "Energy")?;
    // Stings can leave a drone drained; it shuts down before it can rest
    if energy.is_exhausted() {
        let pos = grid.remove(entity)?;
        info!(x = pos.x, y = pos.y, "drone deactivated");
        report.push(SimEvent::Deactivated {
            entity,
            x: pos.x,
            y: pos.y,
        });
        return Ok(());
    }

    if energy.0 <= REST_THRESHOLD {
        let rested = grid.restore_energy(entity, REGEN_PER_TICK)?;
        trace!(?entity, energy = rested.0, "drone resting");
        return Ok(());
    }

    let origin = grid.position(entity)?;
    let Some((offset, prey)) = grid.scan_first(origin, HUNT_RADIUS, is_prey) else {
        return Ok(());
    };

    let landed = grid.step(entity, offset.step(1))?;
    if grid.position(prey)? == landed {
        let left = grid.drain_energy(prey, BITE_DAMAGE)?;
        debug!(attacker = ?entity, defender = ?prey, energy = left.0, "drone attack");
        report.push(SimEvent::Attack {
            attacker: entity,
            defender: prey,
            energy: left.0,
        });
    }
    Ok(())
}

fn is_prey(kind: EntityKind) -> bool {
    match kind {
        EntityKind::Gatherer => true,
        EntityKind::Resource | EntityKind::Station | EntityKind::Predator | EntityKind::Swarm => false,
    }
}
