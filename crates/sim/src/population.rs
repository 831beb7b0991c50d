//! Population container.
//!
//! Owns every live cell in an id-keyed arena and keeps a second index of
//! the same ids ordered by ascending mass. Every insertion, removal and mass
//! change repositions the affected id immediately, so the order is never
//! stale when the classifier reads it.

use crate::entity::{Cell, CellId, EntityId, MassChange};
use crate::error::SimError;
use crate::spatial::Classifier;
use crate::world::WorldBounds;
use glam::Vec2;
use std::collections::HashMap;
use surface::Color;

/// Mass transfer performed by `Population::absorb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
    pub predator: CellId,
    pub prey: CellId,
    pub prey_owner: EntityId,
    /// Mass moved from prey to predator.
    pub mass: u32,
}

/// All live cells, ordered by mass.
#[derive(Debug, Default)]
pub struct Population {
    /// Next cell ID to assign.
    next_cell_id: u32,
    cells: HashMap<CellId, Cell>,
    /// Ids sorted by ascending mass; ties keep insertion order.
    by_mass: Vec<CellId>,
}

impl Population {
    pub fn new() -> Self {
        Self {
            next_cell_id: 1,
            cells: HashMap::with_capacity(64),
            by_mass: Vec::with_capacity(64),
        }
    }

    fn next_id(&mut self) -> CellId {
        let id = self.next_cell_id.max(1);
        self.next_cell_id = id.wrapping_add(1);
        CellId(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_mass.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_mass.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Mutable access for positional updates. Mass changes must go through
    /// `change_mass` / `absorb` so the order stays valid.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    /// Mass of a live cell, or 0 if the id is unknown.
    #[inline]
    pub fn mass_of(&self, id: CellId) -> u32 {
        self.cells.get(&id).map_or(0, Cell::mass)
    }

    /// Ids in ascending mass order.
    #[inline]
    pub fn ids_by_mass(&self) -> &[CellId] {
        &self.by_mass
    }

    /// Cells in ascending mass order.
    pub fn iter_by_mass(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.by_mass.iter().filter_map(|id| self.cells.get(id))
    }

    /// Whether the mass index is non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.by_mass
            .windows(2)
            .all(|pair| self.mass_of(pair[0]) <= self.mass_of(pair[1]))
    }

    /// Predator/prey queries over the current order.
    #[inline]
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(self)
    }

    /// Create a cell and register it.
    pub fn spawn(&mut self, owner: EntityId, position: Vec2, color: Color, mass: u32) -> CellId {
        let id = self.next_id();
        let cell = Cell::new(id, owner, position, color, mass);
        let mass = cell.mass();
        self.cells.insert(id, cell);
        self.insert_ordered(id, mass);
        id
    }

    /// Remove a cell and return it.
    pub fn remove(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.cells.remove(&id)?;
        self.unlink(id);
        Some(cell)
    }

    /// Grow or shrink a cell. A cell that would drop below mass 1 is removed.
    pub fn change_mass(&mut self, id: CellId, delta: i64) -> Result<MassChange, SimError> {
        let change = self
            .cells
            .get_mut(&id)
            .ok_or(SimError::UnknownCell(id))?
            .grow_or_shrink(delta);

        match change {
            MassChange::Resized { to, .. } => {
                self.unlink(id);
                self.insert_ordered(id, to);
            }
            MassChange::Depleted => {
                self.remove(id);
            }
        }
        Ok(change)
    }

    /// Move all of `prey`'s mass into `predator` and destroy `prey`.
    pub fn absorb(&mut self, predator: CellId, prey: CellId) -> Result<Absorption, SimError> {
        if !self.contains(predator) {
            return Err(SimError::UnknownCell(predator));
        }
        let eaten = self.remove(prey).ok_or(SimError::UnknownCell(prey))?;
        self.change_mass(predator, eaten.mass() as i64)?;
        Ok(Absorption {
            predator,
            prey,
            prey_owner: eaten.owner(),
            mass: eaten.mass(),
        })
    }

    /// Shift a cell and its outline, then clamp its center into the world.
    pub(crate) fn nudge(&mut self, id: CellId, offset: Vec2, bounds: &WorldBounds) {
        if let Some(cell) = self.cells.get_mut(&id) {
            cell.translate(offset);
            cell.clamp_to(bounds);
        }
    }

    fn insert_ordered(&mut self, id: CellId, mass: u32) {
        let cells = &self.cells;
        let at = self
            .by_mass
            .partition_point(|other| cells.get(other).map_or(0, Cell::mass) <= mass);
        self.by_mass.insert(at, id);
    }

    fn unlink(&mut self, id: CellId) {
        if let Some(pos) = self.by_mass.iter().position(|&other| other == id) {
            self.by_mass.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: EntityId = EntityId(1);

    fn spawn(population: &mut Population, mass: u32) -> CellId {
        population.spawn(OWNER, Vec2::new(100.0, 100.0), Color::WHITE, mass)
    }

    fn masses(population: &Population) -> Vec<u32> {
        population.iter_by_mass().map(Cell::mass).collect()
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut population = Population::new();
        for mass in [512, 16, 4096, 512, 100] {
            spawn(&mut population, mass);
        }
        assert_eq!(masses(&population), vec![16, 100, 512, 512, 4096]);
        assert!(population.is_sorted());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut population = Population::new();
        let a = spawn(&mut population, 10);
        let b = spawn(&mut population, 10);
        population.remove(a);
        let c = spawn(&mut population, 10);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_mass_change_reorders() {
        let mut population = Population::new();
        let small = spawn(&mut population, 16);
        spawn(&mut population, 512);
        spawn(&mut population, 1024);

        population.change_mass(small, 2000).unwrap();
        assert_eq!(masses(&population), vec![512, 1024, 2016]);
        assert_eq!(*population.ids_by_mass().last().unwrap(), small);
    }

    #[test]
    fn test_mixed_sequence_stays_sorted() {
        let mut population = Population::new();
        let ids: Vec<CellId> = (1..=20).map(|i| spawn(&mut population, (i * 37) % 200 + 1)).collect();
        for (n, &id) in ids.iter().enumerate() {
            match n % 4 {
                0 => {
                    population.remove(id);
                }
                1 => {
                    population.change_mass(id, 150).unwrap();
                }
                2 => {
                    population.change_mass(id, -10).unwrap();
                }
                _ => {
                    spawn(&mut population, (n as u32 * 13) % 300 + 1);
                }
            }
            assert!(population.is_sorted());
        }
        assert_eq!(population.len(), population.iter_by_mass().count());
    }

    #[test]
    fn test_depleted_cell_is_removed() {
        let mut population = Population::new();
        let id = spawn(&mut population, 30);
        assert_eq!(population.change_mass(id, -30).unwrap(), MassChange::Depleted);
        assert!(!population.contains(id));
        assert!(population.is_empty());
    }

    #[test]
    fn test_absorb_transfers_mass() {
        let mut population = Population::new();
        let predator = spawn(&mut population, 1000);
        let prey = population.spawn(EntityId(2), Vec2::ZERO, Color::BLACK, 500);

        let absorption = population.absorb(predator, prey).unwrap();
        assert_eq!(absorption.mass, 500);
        assert_eq!(absorption.prey_owner, EntityId(2));
        assert_eq!(population.mass_of(predator), 1500);
        assert!(!population.contains(prey));
        assert_eq!(population.len(), 1);
    }

    #[test]
    fn test_unknown_cells() {
        let mut population = Population::new();
        let id = spawn(&mut population, 30);
        assert!(matches!(
            population.change_mass(CellId(999), 1),
            Err(SimError::UnknownCell(CellId(999)))
        ));
        assert!(population.absorb(id, CellId(999)).is_err());
        assert!(population.absorb(CellId(999), id).is_err());
        assert!(population.contains(id));
    }
}
