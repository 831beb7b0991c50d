//! Predator/prey classification.
//!
//! All queries read the population's ascending mass index, so the predator
//! and prey sets are a suffix and a prefix of it. Boundaries are found by
//! binary search; only the distance filters walk the candidates.

use crate::entity::{CellId, radius_for};
use crate::error::SimError;
use crate::population::Population;
use glam::Vec2;

/// Mass band separating predators from prey.
pub const PREDATOR_MARGIN: u32 = 1024;
/// Squared multiplier on a radius giving the awareness range (4x the radius).
pub const AWARENESS: f32 = 16.0;
/// A player cell eats cells whose `mass * ABSORB_RATIO` is below its own.
pub const ABSORB_RATIO: f64 = 1.125;

/// Read-only query view over a population.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    population: &'a Population,
}

impl<'a> Classifier<'a> {
    pub fn new(population: &'a Population) -> Self {
        Self { population }
    }

    /// Cells with `mass > mass + PREDATOR_MARGIN`.
    pub fn predators_of(&self, mass: u32) -> &'a [CellId] {
        let population = self.population;
        let ids = population.ids_by_mass();
        let threshold = mass.saturating_add(PREDATOR_MARGIN);
        let start = ids.partition_point(|&id| population.mass_of(id) <= threshold);
        &ids[start..]
    }

    /// Cells with `mass < mass - PREDATOR_MARGIN`.
    pub fn preys_of(&self, mass: u32) -> &'a [CellId] {
        let population = self.population;
        let ids = population.ids_by_mass();
        let end = ids.partition_point(|&id| population.mass_of(id).saturating_add(PREDATOR_MARGIN) < mass);
        &ids[..end]
    }

    /// Predators whose awareness range (4x their own radius) covers `position`.
    pub fn near_predators_of(&self, mass: u32, position: Vec2) -> Vec<CellId> {
        self.predators_of(mass)
            .iter()
            .copied()
            .filter(|&id| {
                self.population.get(id).is_some_and(|predator| {
                    position.distance_squared(predator.position()) <= predator.sqr_radius() * AWARENESS
                })
            })
            .collect()
    }

    /// Prey within 4x the radius a cell of `mass` would have.
    pub fn near_preys_of(&self, mass: u32, position: Vec2) -> Vec<CellId> {
        let radius = radius_for(mass);
        let reach = radius * radius * AWARENESS;
        self.preys_of(mass)
            .iter()
            .copied()
            .filter(|&id| {
                self.population
                    .get(id)
                    .is_some_and(|prey| position.distance_squared(prey.position()) <= reach)
            })
            .collect()
    }

    /// Closest prey anywhere in the world.
    pub fn nearest_prey(&self, mass: u32, position: Vec2) -> Result<CellId, SimError> {
        self.nearest(self.preys_of(mass), position)
    }

    /// Heaviest prey in range.
    pub fn most_perspective_prey(&self, mass: u32, position: Vec2) -> Result<CellId, SimError> {
        self.heaviest(&self.near_preys_of(mass, position))
    }

    /// Cells a player cell of `mass` may absorb.
    pub fn absorbable_by(&self, mass: u32) -> &'a [CellId] {
        let population = self.population;
        let ids = population.ids_by_mass();
        let end = ids.partition_point(|&id| population.mass_of(id) as f64 * ABSORB_RATIO < mass as f64);
        &ids[..end]
    }

    /// Member of `candidates` closest to `position`.
    pub fn nearest(&self, candidates: &[CellId], position: Vec2) -> Result<CellId, SimError> {
        candidates
            .iter()
            .filter_map(|&id| self.population.get(id))
            .min_by(|a, b| {
                position
                    .distance_squared(a.position())
                    .total_cmp(&position.distance_squared(b.position()))
            })
            .map(|cell| cell.id())
            .ok_or(SimError::EmptyQuerySet)
    }

    /// Member of `candidates` with the largest mass.
    pub fn heaviest(&self, candidates: &[CellId]) -> Result<CellId, SimError> {
        candidates
            .iter()
            .filter_map(|&id| self.population.get(id))
            .max_by_key(|cell| cell.mass())
            .map(|cell| cell.id())
            .ok_or(SimError::EmptyQuerySet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use surface::Color;

    fn population_with(cells: &[(u32, Vec2)]) -> (Population, Vec<CellId>) {
        let mut population = Population::new();
        let ids = cells
            .iter()
            .enumerate()
            .map(|(n, &(mass, position))| population.spawn(EntityId(n as u32), position, Color::WHITE, mass))
            .collect();
        (population, ids)
    }

    fn sorted(mut ids: Vec<CellId>) -> Vec<CellId> {
        ids.sort();
        ids
    }

    #[test]
    fn test_bands_match_filters() {
        let mut rng = StdRng::seed_from_u64(42);
        let cells: Vec<(u32, Vec2)> = (0..60)
            .map(|_| (rng.random_range(1..6000), Vec2::new(rng.random_range(0.0..720.0), 0.0)))
            .collect();
        let (population, ids) = population_with(&cells);
        let classifier = population.classifier();

        for &(mass, _) in &cells {
            let predators = sorted(classifier.predators_of(mass).to_vec());
            let preys = sorted(classifier.preys_of(mass).to_vec());

            let expected_predators: Vec<CellId> = ids
                .iter()
                .copied()
                .filter(|&id| population.mass_of(id) > mass + PREDATOR_MARGIN)
                .collect();
            let expected_preys: Vec<CellId> = ids
                .iter()
                .copied()
                .filter(|&id| population.mass_of(id) + PREDATOR_MARGIN < mass)
                .collect();

            assert_eq!(predators, sorted(expected_predators));
            assert_eq!(preys, sorted(expected_preys));
            assert!(predators.iter().all(|id| !preys.contains(id)));
        }
    }

    #[test]
    fn test_query_excludes_self() {
        let (population, ids) = population_with(&[(512, Vec2::ZERO), (4096, Vec2::ZERO)]);
        let classifier = population.classifier();
        assert!(!classifier.predators_of(512).contains(&ids[0]));
        assert!(!classifier.preys_of(512).contains(&ids[0]));
        assert_eq!(classifier.predators_of(512), &[ids[1]]);
        assert_eq!(classifier.preys_of(4096), &[ids[0]]);
    }

    #[test]
    fn test_margin_is_strict() {
        let (population, _) = population_with(&[(1000, Vec2::ZERO), (2024, Vec2::ZERO), (2025, Vec2::ZERO)]);
        let classifier = population.classifier();
        assert_eq!(classifier.predators_of(1000).len(), 1);
        assert_eq!(classifier.preys_of(2024).len(), 0);
        assert_eq!(classifier.preys_of(2025).len(), 1);
    }

    #[test]
    fn test_near_predators_use_predator_radius() {
        // radius(4096) ~= 36.1, awareness ~= 144.4
        let (population, ids) = population_with(&[
            (4096, Vec2::new(100.0, 100.0)),
            (4096, Vec2::new(400.0, 100.0)),
        ]);
        let classifier = population.classifier();
        let near = classifier.near_predators_of(512, Vec2::new(200.0, 100.0));
        assert_eq!(near, vec![ids[0]]);
        assert!(classifier.near_predators_of(512, Vec2::new(250.0, 100.0)).is_empty());
    }

    #[test]
    fn test_near_preys_use_querying_radius() {
        // radius(4096) ~= 36.1, reach ~= 144.4 regardless of prey size
        let (population, ids) = population_with(&[
            (16, Vec2::new(140.0, 0.0)),
            (16, Vec2::new(150.0, 0.0)),
            (2000, Vec2::new(10.0, 0.0)),
        ]);
        let classifier = population.classifier();
        let near = classifier.near_preys_of(4096, Vec2::ZERO);
        assert_eq!(sorted(near), sorted(vec![ids[0], ids[2]]));
        assert_eq!(classifier.most_perspective_prey(4096, Vec2::ZERO).unwrap(), ids[2]);
        assert_eq!(classifier.nearest_prey(4096, Vec2::new(150.0, 0.0)).unwrap(), ids[1]);
    }

    #[test]
    fn test_reductions_fail_on_empty_sets() {
        let (population, _) = population_with(&[(512, Vec2::ZERO)]);
        let classifier = population.classifier();
        assert!(matches!(classifier.nearest_prey(512, Vec2::ZERO), Err(SimError::EmptyQuerySet)));
        assert!(matches!(
            classifier.most_perspective_prey(100_000, Vec2::new(700.0, 700.0)),
            Err(SimError::EmptyQuerySet)
        ));

        let empty = Population::new();
        let classifier = empty.classifier();
        assert!(classifier.predators_of(1).is_empty());
        assert!(classifier.preys_of(u32::MAX).is_empty());
        assert!(classifier.heaviest(&[]).is_err());
    }

    #[test]
    fn test_absorbable_margin() {
        let (population, ids) = population_with(&[(500, Vec2::ZERO), (888, Vec2::ZERO), (889, Vec2::ZERO)]);
        let classifier = population.classifier();
        // 888 * 1.125 = 999 < 1000, 889 * 1.125 = 1000.125
        assert_eq!(classifier.absorbable_by(1000), &[ids[0], ids[1]]);
        assert!(classifier.absorbable_by(500).is_empty());
    }
}
