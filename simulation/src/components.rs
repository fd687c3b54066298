//! ECS Components for Techburg entities
//!
//! Every placed entity carries an [`EntityKind`] tag and a [`Position`];
//! kind-specific state lives in the components below.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub use crate::coords::Position;

/// Energy ceiling shared by every powered entity.
pub const MAX_ENERGY: f32 = 100.0;

// ============================================================================
// Kind Tag
// ============================================================================

/// Closed set of entity kinds. Roster membership and every scan predicate
/// match on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Resource,
    Station,
    Gatherer,
    Predator,
    Swarm,
}

impl EntityKind {
    /// Whether entities of this kind act once per tick.
    pub fn is_active(self) -> bool {
        match self {
            EntityKind::Gatherer | EntityKind::Predator | EntityKind::Swarm => true,
            EntityKind::Resource | EntityKind::Station => false,
        }
    }
}

// ============================================================================
// Shared Components
// ============================================================================

/// Remaining charge. Not floor-clamped: swarm damage can push it negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Energy(pub f32);

impl Energy {
    /// Add `amount`, capped at [`MAX_ENERGY`].
    pub fn restore(&mut self, amount: f32) {
        self.0 = (self.0 + amount).min(MAX_ENERGY);
    }

    pub fn drain(&mut self, amount: f32) {
        self.0 -= amount;
    }

    pub fn is_full(&self) -> bool {
        self.0 >= MAX_ENERGY
    }

    pub fn is_exhausted(&self) -> bool {
        self.0 <= 0.0
    }
}

// ============================================================================
// Resources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceSize {
    Small,
    Medium,
    Large,
}

impl ResourceSize {
    pub const ALL: [ResourceSize; 3] = [ResourceSize::Small, ResourceSize::Medium, ResourceSize::Large];

    /// Energy a fresh part of this size restores at a station.
    pub fn enhancement(self) -> f32 {
        match self {
            ResourceSize::Small => 3.0,
            ResourceSize::Medium => 5.0,
            ResourceSize::Large => 7.0,
        }
    }
}

/// A spare part lying on the grid or queued in a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub size: ResourceSize,
    pub enhancement: f32,
    pub decay_rate: f32,
}

impl Resource {
    pub const DEFAULT_DECAY_RATE: f32 = 0.1;

    pub fn new(size: ResourceSize) -> Self {
        Self {
            size,
            enhancement: size.enhancement(),
            decay_rate: Self::DEFAULT_DECAY_RATE,
        }
    }

    /// Lose `decay_rate` of enhancement, never dropping below zero.
    pub fn decay(&mut self) {
        self.enhancement = (self.enhancement - self.decay_rate).max(0.0);
    }
}

// ============================================================================
// Stations
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub parts: VecDeque<Resource>,
}

impl Station {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_part(&mut self, part: Resource) {
        self.parts.push_back(part);
    }

    /// Consume the oldest stored part into `energy`.
    /// Returns false without touching the queue when there is nothing to
    /// store from or the bot is already full.
    pub fn recharge(&mut self, energy: &mut Energy) -> bool {
        if energy.is_full() {
            return false;
        }
        match self.parts.pop_front() {
            Some(part) => {
                energy.restore(part.enhancement);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Active Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gatherer {
    pub carrying: Option<Resource>,
    pub speed: u32,
    pub vision: u32,
}

impl Default for Gatherer {
    fn default() -> Self {
        Self {
            carrying: None,
            speed: 1,
            vision: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swarm {
    /// Number of clustered units.
    pub size: u32,
}

// ============================================================================
// Spawn Templates
// ============================================================================

/// Everything needed to spawn one entity of a given kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Resource(Resource),
    Station(Station),
    Gatherer { state: Gatherer, energy: Energy },
    Predator { energy: Energy },
    Swarm(Swarm),
}

impl Body {
    pub fn resource(size: ResourceSize) -> Self {
        Body::Resource(Resource::new(size))
    }

    pub fn station() -> Self {
        Body::Station(Station::new())
    }

    pub fn gatherer(energy: f32) -> Self {
        Body::Gatherer {
            state: Gatherer::default(),
            energy: Energy(energy),
        }
    }

    pub fn predator(energy: f32) -> Self {
        Body::Predator { energy: Energy(energy) }
    }

    pub fn swarm(size: u32) -> Self {
        Body::Swarm(Swarm { size })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Body::Resource(_) => EntityKind::Resource,
            Body::Station(_) => EntityKind::Station,
            Body::Gatherer { .. } => EntityKind::Gatherer,
            Body::Predator { .. } => EntityKind::Predator,
            Body::Swarm(_) => EntityKind::Swarm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhancement_by_size() {
        assert_eq!(Resource::new(ResourceSize::Small).enhancement, 3.0);
        assert_eq!(Resource::new(ResourceSize::Medium).enhancement, 5.0);
        assert_eq!(Resource::new(ResourceSize::Large).enhancement, 7.0);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut part = Resource::new(ResourceSize::Small);
        part.decay();
        assert!((part.enhancement - 2.9).abs() < 1e-5);

        part.decay_rate = 10.0;
        part.decay();
        assert_eq!(part.enhancement, 0.0);
    }

    #[test]
    fn test_recharge_is_fifo_and_capped() {
        let mut station = Station::new();
        station.store_part(Resource::new(ResourceSize::Large));
        station.store_part(Resource::new(ResourceSize::Small));

        let mut energy = Energy(96.0);
        assert!(station.recharge(&mut energy));
        assert_eq!(energy, Energy(MAX_ENERGY));
        assert_eq!(station.parts.len(), 1);
        assert_eq!(station.parts[0].size, ResourceSize::Small);
    }

    #[test]
    fn test_recharge_noops() {
        let mut station = Station::new();
        let mut energy = Energy(50.0);
        // Empty queue
        assert!(!station.recharge(&mut energy));
        assert_eq!(energy, Energy(50.0));

        // Full bot keeps the queue intact
        station.store_part(Resource::new(ResourceSize::Medium));
        let mut full = Energy(MAX_ENERGY);
        assert!(!station.recharge(&mut full));
        assert_eq!(station.parts.len(), 1);
    }

    #[test]
    fn test_only_mobile_kinds_are_active() {
        assert!(EntityKind::Gatherer.is_active());
        assert!(EntityKind::Predator.is_active());
        assert!(EntityKind::Swarm.is_active());
        assert!(!EntityKind::Resource.is_active());
        assert!(!EntityKind::Station.is_active());
    }
}
