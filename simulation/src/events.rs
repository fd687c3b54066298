//! Tick events surfaced to the host

use hecs::Entity;

/// Something a host may want to narrate or react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A bot or drone ran out of energy and was removed at this cell.
    Deactivated { entity: Entity, x: usize, y: usize },
    /// `attacker` damaged `defender`, leaving it at `energy`.
    Attack {
        attacker: Entity,
        defender: Entity,
        energy: f32,
    },
}

/// Outcome of one `Grid::tick`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Roster entries visited this tick.
    pub activations: u32,
    pub events: Vec<SimEvent>,
}

impl TickReport {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn deactivations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Deactivated { .. }))
            .count()
    }

    pub fn attacks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Attack { .. }))
            .count()
    }
}
