//! Techburg Simulation Engine
//!
//! Discrete-time multi-agent simulation on a toroidal grid. Bots forage for
//! spare parts, drones hunt bots, swarms sting whatever is nearby; the
//! engine owns the spatial index and runs every active entity once per tick.

pub mod components;
pub mod config;
pub mod coords;
pub mod error;
pub mod events;
pub mod grid;
pub mod snapshot;
pub mod systems;
pub mod world;

pub use components::*;
pub use config::{PopulationConfig, SimulationConfig};
pub use coords::{Offset, Torus};
pub use error::GridError;
pub use events::{SimEvent, TickReport};
pub use grid::Grid;
pub use snapshot::{EntitySnapshot, GridSnapshot};
pub use world::{Census, SimulationWorld};
