//! Predator avoidance and prey pursuit.

use crate::entity::{Behavior, Cell, CellId, Entity};
use crate::population::Population;
use crate::world::WorldBounds;
use glam::Vec2;
use tracing::trace;

/// Weight of the repulsion vector when a predator is in range.
pub const FLEE_WEIGHT: f32 = 2.0;
/// Weight of the pull towards prey, divided among the entity's cells.
pub const PURSUIT_WEIGHT: f32 = 2.0;

/// What the entity decided on its last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Intent {
    /// Nothing in range; keep heading for the previous destination.
    #[default]
    Drift,
    /// At least one cell saw a predator.
    Flee,
    /// Chasing this prey.
    Pursue(CellId),
}

/// Autonomous bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutonomousState {
    pub intent: Intent,
}

/// Adjust the destination of an autonomous entity.
///
/// Per cell: if any predator is aware of it, push the destination by the
/// negated sum of the predators' positions and skip to the next cell.
/// Otherwise pull the destination towards the heaviest prey in range,
/// diluted by the entity's cell count. Cells with neither leave the
/// destination alone.
pub fn steer(entity: &mut Entity, population: &Population, bounds: &WorldBounds) {
    let classifier = population.classifier();
    let cell_count = entity.cells.len().max(1) as f32;
    let mut intent = Intent::Drift;

    for i in 0..entity.cells.len() {
        let Some(cell) = population.get(entity.cells[i]) else {
            continue;
        };
        let (mass, position) = (cell.mass(), cell.position());

        let predators = classifier.near_predators_of(mass, position);
        if !predators.is_empty() {
            let repulsion = -predators
                .iter()
                .filter_map(|&id| population.get(id))
                .map(Cell::position)
                .sum::<Vec2>();
            entity.add_direction(repulsion, FLEE_WEIGHT, bounds);
            intent = Intent::Flee;
            continue;
        }

        let preys = classifier.near_preys_of(mass, position);
        if preys.is_empty() {
            continue;
        }
        if let Ok(prey) = classifier.heaviest(&preys) {
            if let Some(target) = population.get(prey) {
                entity.add_direction(target.position(), PURSUIT_WEIGHT / cell_count, bounds);
                if intent != Intent::Flee {
                    intent = Intent::Pursue(prey);
                }
            }
        }
    }

    let id = entity.id();
    if let Behavior::Autonomous(state) = &mut entity.behavior {
        if state.intent != intent {
            trace!("{} intent {:?} -> {:?}", id, state.intent, intent);
            state.intent = intent;
        }
    }
}
