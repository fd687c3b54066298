//! Driver settings
//!
//! Grid size, seed, and the initial population the driver places. Every
//! field has a default so a partial JSON file is enough.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::MAX_GRID_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid_size: usize,
    pub seed: u64,
    /// Steps the binary runs before exiting
    pub steps: u32,
    pub population: PopulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub gatherers: u32,
    pub predators: u32,
    pub swarms: u32,
    pub resources: u32,
    pub stations: u32,
    /// Parts each station starts with, sizes cycling small/medium/large
    pub parts_per_station: u32,
    pub gatherer_energy: f32,
    pub predator_energy: f32,
    pub swarm_size: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            seed: 12345,
            steps: 100,
            population: PopulationConfig::default(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            gatherers: 5,
            predators: 1,
            swarms: 1,
            resources: 10,
            stations: 2,
            parts_per_station: 3,
            gatherer_energy: 100.0,
            predator_energy: 100.0,
            swarm_size: 10,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.grid_size == 0 {
            return Err(GridError::InvalidConfig("grid_size must be positive".into()));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(GridError::InvalidConfig(format!(
                "grid_size {} exceeds the maximum of {}",
                self.grid_size, MAX_GRID_SIZE
            )));
        }
        let p = &self.population;
        if !(p.gatherer_energy.is_finite() && p.predator_energy.is_finite()) {
            return Err(GridError::InvalidConfig("starting energies must be finite".into()));
        }
        Ok(())
    }
}
