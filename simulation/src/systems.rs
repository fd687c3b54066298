//! Behavior systems - one activation function per active kind
//!
//! Each runs cost, terminal check, perceive, decide, act for a single
//! entity, called by `Grid::tick` in roster order.

pub mod gatherer;
pub mod predator;
pub mod swarm;

pub use gatherer::gatherer_system;
pub use predator::predator_system;
pub use swarm::swarm_system;
