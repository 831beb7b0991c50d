//! Entities and their cells.
//!
//! An entity owns one or more cells and steers them towards a shared
//! destination. Cells live in the population arena and refer back to their
//! owner by id.

mod agent;
mod cell;
mod player;

pub use agent::{Behavior, Entity, EntityId, Frame, PlayerState};
pub use cell::{Cell, CellId, MassChange, point_count_for, radius_for, speed_for};
