//! Simulation World - driver-facing orchestrator
//!
//! Seeds the initial population from a [`SimulationConfig`] and forwards
//! ticks to the grid.

use serde::Serialize;
use tracing::info;

use crate::components::*;
use crate::config::SimulationConfig;
use crate::error::GridError;
use crate::events::TickReport;
use crate::grid::Grid;

/// Live entity counts by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Census {
    pub gatherers: u32,
    pub predators: u32,
    pub swarms: u32,
    pub resources: u32,
    pub stations: u32,
}

pub struct SimulationWorld {
    pub grid: Grid,
    pub config: SimulationConfig,
}

impl SimulationWorld {
    /// Empty grid sized and seeded from `config`.
    pub fn new(config: SimulationConfig) -> Result<Self, GridError> {
        config.validate()?;
        let grid = Grid::new(config.grid_size, config.seed)?;
        Ok(Self { grid, config })
    }

    /// Grid populated with everything `config.population` asks for.
    pub fn from_config(config: SimulationConfig) -> Result<Self, GridError> {
        let mut world = Self::new(config)?;
        world.seed_population()?;
        Ok(world)
    }

    /// Place the configured population at random cells. Passive kinds go
    /// first so the roster holds bots, then drones, then swarms.
    pub fn seed_population(&mut self) -> Result<(), GridError> {
        let pop = self.config.population.clone();

        for i in 0..pop.resources {
            let size = ResourceSize::ALL[i as usize % ResourceSize::ALL.len()];
            self.place_randomly(Body::resource(size))?;
        }
        for _ in 0..pop.stations {
            let mut station = Station::new();
            for i in 0..pop.parts_per_station {
                let size = ResourceSize::ALL[i as usize % ResourceSize::ALL.len()];
                station.store_part(Resource::new(size));
            }
            self.place_randomly(Body::Station(station))?;
        }
        for _ in 0..pop.gatherers {
            self.place_randomly(Body::gatherer(pop.gatherer_energy))?;
        }
        for _ in 0..pop.predators {
            self.place_randomly(Body::predator(pop.predator_energy))?;
        }
        for _ in 0..pop.swarms {
            self.place_randomly(Body::swarm(pop.swarm_size))?;
        }

        info!(
            entities = self.grid.entity_count(),
            active = self.grid.active().len(),
            "population seeded"
        );
        Ok(())
    }

    fn place_randomly(&mut self, body: Body) -> Result<hecs::Entity, GridError> {
        let pos = self.grid.random_position();
        self.grid.spawn_at(body, pos.x as i64, pos.y as i64)
    }

    /// Run one simulation tick.
    pub fn tick(&mut self) -> Result<TickReport, GridError> {
        self.grid.tick()
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for (_, kind) in self.grid.world().query::<&EntityKind>().iter() {
            match kind {
                EntityKind::Gatherer => census.gatherers += 1,
                EntityKind::Predator => census.predators += 1,
                EntityKind::Swarm => census.swarms += 1,
                EntityKind::Resource => census.resources += 1,
                EntityKind::Station => census.stations += 1,
            }
        }
        census
    }

    /// Get current tick number
    pub fn current_tick(&self) -> u64 {
        self.grid.tick_count()
    }
}
