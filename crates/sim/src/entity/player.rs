//! Pointer-driven behavior with prey absorption.

use super::{Behavior, CellId, Entity, Frame};
use crate::population::{Absorption, Population};
use tracing::{debug, warn};

/// Follow the pointer, then let every owned cell eat the nearest smaller
/// cell whose center lies within half of its radius.
///
/// Sibling cells are never eaten, so the candidate set is every cell with
/// `mass * 1.125 < own mass` minus the entity's own cells. At most one
/// absorption happens per owned cell per frame.
pub(super) fn update(entity: &mut Entity, population: &mut Population, frame: &Frame<'_>) -> Vec<Absorption> {
    entity.destination = frame.bounds.clamp(frame.pointer.pointer_position());

    let mut absorptions = Vec::new();
    for i in 0..entity.cells.len() {
        let id = entity.cells[i];
        let Some(cell) = population.get(id) else {
            continue;
        };
        let (mass, position, sqr_radius) = (cell.mass(), cell.position(), cell.sqr_radius());

        let classifier = population.classifier();
        let candidates: Vec<CellId> = classifier
            .absorbable_by(mass)
            .iter()
            .copied()
            .filter(|&other| population.get(other).is_some_and(|c| c.owner() != entity.id()))
            .collect();
        let Ok(prey) = classifier.nearest(&candidates, position) else {
            continue;
        };
        let reachable = population
            .get(prey)
            .is_some_and(|p| p.position().distance_squared(position) <= sqr_radius / 4.0);
        if !reachable {
            continue;
        }

        match population.absorb(id, prey) {
            Ok(absorption) => {
                debug!(
                    "{} absorbed {} (+{} mass, now {})",
                    id,
                    prey,
                    absorption.mass,
                    population.mass_of(id)
                );
                absorptions.push(absorption);
            }
            Err(e) => warn!("Absorption of {} by {} failed: {}", prey, id, e),
        }
    }

    if let Behavior::Player(state) = &mut entity.behavior {
        state.absorbed += absorptions.len() as u32;
        state.absorbed_mass += absorptions.iter().map(|a| a.mass as u64).sum::<u64>();
    }
    absorptions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, PlayerState};
    use crate::world::WorldBounds;
    use glam::Vec2;
    use surface::{Color, FixedPointer};

    const BOUNDS: WorldBounds = WorldBounds {
        width: 720.0,
        height: 720.0,
    };

    fn setup(predator_mass: u32, prey_mass: u32, offset: Vec2) -> (Population, Entity, CellId, CellId) {
        let mut population = Population::new();
        let position = Vec2::new(300.0, 300.0);
        let mut entity = Entity::new(
            EntityId(1),
            Behavior::Player(PlayerState::default()),
            position,
            Color::new(255, 0, 0),
        );
        entity.spawn_cells(&mut population, &BOUNDS, position, 1, predator_mass);
        let prey = population.spawn(EntityId(2), position + offset, Color::WHITE, prey_mass);
        let predator = entity.cells()[0];
        (population, entity, predator, prey)
    }

    fn frame(pointer: &FixedPointer) -> Frame<'_> {
        Frame {
            dt: 1.0 / 144.0,
            bounds: BOUNDS,
            pointer,
        }
    }

    #[test]
    fn test_absorbs_prey_in_inner_zone() {
        let (mut population, mut entity, predator, prey) = setup(1000, 500, Vec2::new(3.0, 0.0));
        let pointer = FixedPointer(Vec2::new(300.0, 300.0));

        let absorbed = update(&mut entity, &mut population, &frame(&pointer));
        assert_eq!(absorbed.len(), 1);
        assert_eq!(population.mass_of(predator), 1500);
        assert!(!population.contains(prey));
        assert!(population.is_sorted());
        assert_eq!(
            entity.behavior(),
            &Behavior::Player(PlayerState {
                absorbed: 1,
                absorbed_mass: 500
            })
        );
    }

    #[test]
    fn test_prey_outside_inner_zone_survives() {
        // radius(1000) ~= 17.8, inner zone ~= 8.9
        let (mut population, mut entity, predator, prey) = setup(1000, 500, Vec2::new(12.0, 0.0));
        let pointer = FixedPointer(Vec2::new(300.0, 300.0));
        assert!(update(&mut entity, &mut population, &frame(&pointer)).is_empty());
        assert_eq!(population.mass_of(predator), 1000);
        assert!(population.contains(prey));
    }

    #[test]
    fn test_near_equal_mass_is_not_absorbed() {
        let (mut population, mut entity, _, prey) = setup(1000, 900, Vec2::new(1.0, 0.0));
        let pointer = FixedPointer(Vec2::new(300.0, 300.0));
        assert!(update(&mut entity, &mut population, &frame(&pointer)).is_empty());
        assert!(population.contains(prey));
    }

    #[test]
    fn test_siblings_are_not_absorbed() {
        let mut population = Population::new();
        let position = Vec2::new(300.0, 300.0);
        let mut entity = Entity::new(
            EntityId(1),
            Behavior::Player(PlayerState::default()),
            position,
            Color::new(255, 0, 0),
        );
        entity.spawn_cells(&mut population, &BOUNDS, position, 1, 4000);
        let small = population.spawn(entity.id(), position + Vec2::new(1.0, 0.0), Color::WHITE, 100);
        entity.cells.push(small);

        let pointer = FixedPointer(position);
        assert!(update(&mut entity, &mut population, &frame(&pointer)).is_empty());
        assert!(population.contains(small));
    }

    #[test]
    fn test_nearest_prey_is_chosen() {
        let (mut population, mut entity, predator, far) = setup(4096, 100, Vec2::new(8.0, 0.0));
        let near = population.spawn(EntityId(3), Vec2::new(302.0, 300.0), Color::WHITE, 200);
        let pointer = FixedPointer(Vec2::new(300.0, 300.0));

        let absorbed = update(&mut entity, &mut population, &frame(&pointer));
        assert_eq!(absorbed.len(), 1);
        assert_eq!(absorbed[0].prey, near);
        assert!(population.contains(far));
        assert_eq!(population.mass_of(predator), 4296);
    }
}
