//! Entity: an agent steering a group of sibling cells.

use super::{CellId, player};
use crate::ai::{self, AutonomousState};
use crate::collision;
use crate::error::SimError;
use crate::population::{Absorption, Population};
use crate::world::WorldBounds;
use glam::Vec2;
use std::fmt;
use surface::{Color, PointerSource};
use tracing::debug;

/// Stable entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Per-frame inputs shared by every entity update.
pub struct Frame<'a> {
    /// Elapsed time for this frame, in seconds.
    pub dt: f32,
    pub bounds: WorldBounds,
    pub pointer: &'a dyn PointerSource,
}

/// Player bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// Cells absorbed so far.
    pub absorbed: u32,
    /// Mass gained through absorption.
    pub absorbed_mass: u64,
}

/// How an entity picks its destination.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Follows the pointer and eats smaller cells it covers.
    Player(PlayerState),
    /// Flees larger cells nearby, otherwise chases the heaviest prey in range.
    Autonomous(AutonomousState),
}

/// An agent owning one or more cells.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    /// Owned cell ids, in creation order.
    pub(crate) cells: Vec<CellId>,
    pub(crate) destination: Vec2,
    color: Color,
    pub(crate) behavior: Behavior,
}

impl Entity {
    /// Create an entity with no cells whose destination is its spawn point.
    pub(crate) fn new(id: EntityId, behavior: Behavior, position: Vec2, color: Color) -> Self {
        Self {
            id,
            cells: Vec::new(),
            destination: position,
            color,
            behavior,
        }
    }

    /// Register `count` cells of `mass` at `position + (i, i)`.
    pub(crate) fn spawn_cells(
        &mut self,
        population: &mut Population,
        bounds: &WorldBounds,
        position: Vec2,
        count: usize,
        mass: u32,
    ) {
        for i in 0..count {
            let at = bounds.clamp(position + Vec2::splat(i as f32));
            let id = population.spawn(self.id, at, self.color, mass);
            self.cells.push(id);
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    #[inline]
    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.behavior, Behavior::Player(_))
    }

    /// Combined mass of the entity's live cells.
    pub fn total_mass(&self, population: &Population) -> u64 {
        self.cells.iter().map(|&id| population.mass_of(id) as u64).sum()
    }

    /// Mean center of the entity's live cells.
    pub fn centroid(&self, population: &Population) -> Option<Vec2> {
        let (sum, count) = self
            .cells
            .iter()
            .filter_map(|&id| population.get(id))
            .fold((Vec2::ZERO, 0usize), |(sum, n), cell| (sum + cell.position(), n + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Shift the destination by `direction * coefficient`, clamped to the world.
    pub fn add_direction(&mut self, direction: Vec2, coefficient: f32, bounds: &WorldBounds) {
        self.destination = bounds.clamp(self.destination + direction * coefficient);
    }

    /// Forget cells that no longer exist (absorbed or depleted).
    pub(crate) fn prune(&mut self, population: &Population) {
        self.cells.retain(|&id| population.contains(id));
    }

    /// One frame: move every cell, run the behavior, separate siblings.
    pub fn update(&mut self, population: &mut Population, frame: &Frame<'_>) -> Vec<Absorption> {
        self.prune(population);

        for &id in &self.cells {
            if let Some(cell) = population.get_mut(id) {
                cell.update(self.destination, frame.dt, &frame.bounds);
            }
        }

        let absorptions = match self.behavior {
            Behavior::Player(_) => player::update(self, population, frame),
            Behavior::Autonomous(_) => {
                ai::steer(self, population, &frame.bounds);
                Vec::new()
            }
        };

        collision::push_away(&self.cells, population, &frame.bounds);
        absorptions
    }

    /// Halve every cell heavy enough to split while under `max_cells`.
    ///
    /// Each child takes half the parent's mass (rounded down) and starts one
    /// unit from the parent towards the destination.
    pub(crate) fn split(
        &mut self,
        population: &mut Population,
        bounds: &WorldBounds,
        max_cells: usize,
        min_split_mass: u32,
    ) -> Result<Vec<CellId>, SimError> {
        self.prune(population);
        let mut created = Vec::new();
        let parents = self.cells.clone();

        for parent in parents {
            if self.cells.len() >= max_cells {
                break;
            }
            let Some(cell) = population.get(parent) else {
                continue;
            };
            if cell.mass() < min_split_mass.saturating_mul(2) {
                continue;
            }

            let half = cell.mass() / 2;
            let position = cell.position();
            let mut heading = (self.destination - position).normalize_or_zero();
            // The collision resolver cannot separate cells stacked on the same x.
            if heading.x == 0.0 {
                heading = Vec2::ONE.normalize();
            }

            let mut spot = bounds.clamp(position + heading);
            // Against a wall the clamp can fold the child back onto the parent's x.
            if spot.x == position.x {
                spot = bounds.clamp(position - heading);
            }

            population.change_mass(parent, -(half as i64))?;
            let child = population.spawn(self.id, spot, self.color, half);
            self.cells.push(child);
            created.push(child);
        }

        if !created.is_empty() {
            debug!("{} split into {} cells", self.id, self.cells.len());
        }
        Ok(created)
    }
}
