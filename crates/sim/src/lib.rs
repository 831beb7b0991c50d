//! Cell growth simulation library.
//!
//! Entities steer groups of circular cells around a bounded world. Cells
//! live in a population kept ordered by mass, which the spatial classifier
//! reads to answer predator/prey queries.

pub mod ai;
pub mod clock;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod level;
pub mod population;
pub mod spatial;
pub mod world;

// Re-export commonly used types
pub use clock::FrameClock;
pub use config::Config;
pub use entity::{Behavior, Cell, CellId, Entity, EntityId};
pub use error::SimError;
pub use level::{FrameReport, Simulation, Status};
pub use population::{Absorption, Population};
pub use world::WorldBounds;
