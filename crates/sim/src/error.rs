//! Simulation error types.

use crate::entity::{CellId, EntityId};
use thiserror::Error;

/// Errors surfaced by the simulation library.
///
/// Overlapping centers and out-of-bounds positions are not errors: the
/// collision resolver skips such pairs and every positional update clamps.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("No candidate cell in query set")]
    EmptyQuerySet,

    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
