//! Engine errors
//!
//! Every variant other than `InvalidConfig` is a caller bug: the engine
//! refuses the operation instead of corrupting bucket membership.

use hecs::Entity;
use thiserror::Error;

use crate::components::EntityKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid config: {0}")]
    InvalidConfig(String),

    #[error("entity {0:?} is not resident where its position says it is")]
    StaleEntityReference(Entity),

    #[error("entity {0:?} is already placed on the grid")]
    DoublePlacement(Entity),

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity:?} is not a {expected:?}")]
    WrongKind { entity: Entity, expected: EntityKind },
}
