//! Read-only grid snapshots for hosts
//!
//! Flattens the ECS world into plain serde structs a renderer or test
//! harness can consume. There is no import path; snapshots are views.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::grid::Grid;

// ============================================================================
// Snapshot Data Structures
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub version: u8, // Schema version for forward compatibility
    pub tick: u64,
    pub size: usize,
    /// Roster in activation order, as entity ids
    pub active: Vec<u64>,
    /// Every placed entity, cell by cell
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntitySnapshot {
    pub id: u64,
    pub kind: EntityKind,
    pub x: usize,
    pub y: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f32>,
    /// Spare part lying on the grid, or carried by a bot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<Resource>,
    /// Parts queued in a station
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_parts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_size: Option<u32>,
}

impl GridSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

// ============================================================================
// Snapshot Implementation
// ============================================================================

impl<R: Rng> Grid<R> {
    pub fn snapshot(&self) -> GridSnapshot {
        let mut entities = Vec::new();

        for bucket in self.cells() {
            for &entity in bucket {
                let (Ok(kind), Ok(pos)) = (self.kind(entity), self.position(entity)) else {
                    continue;
                };

                let part = match kind {
                    EntityKind::Resource => self.world.get::<&Resource>(entity).ok().map(|r| *r),
                    EntityKind::Gatherer => self
                        .world
                        .get::<&Gatherer>(entity)
                        .ok()
                        .and_then(|g| g.carrying),
                    EntityKind::Station | EntityKind::Predator | EntityKind::Swarm => None,
                };

                entities.push(EntitySnapshot {
                    id: entity.to_bits().get(),
                    kind,
                    x: pos.x,
                    y: pos.y,
                    energy: self.energy(entity),
                    part,
                    stored_parts: self.world.get::<&Station>(entity).ok().map(|s| s.parts.len()),
                    swarm_size: self.world.get::<&Swarm>(entity).ok().map(|s| s.size),
                });
            }
        }

        GridSnapshot {
            version: 1,
            tick: self.tick_count(),
            size: self.size(),
            active: self.active().iter().map(|e| e.to_bits().get()).collect(),
            entities,
        }
    }
}
