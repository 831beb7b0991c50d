//! Collision detection and resolution between sibling cells.
//!
//! Only cells of the same entity are separated. Cells of different entities
//! may overlap freely; predation is handled by the player behavior.

use crate::entity::CellId;
use crate::population::Population;
use crate::world::WorldBounds;
use glam::Vec2;
use tracing::trace;

/// Result of checking overlap between two circles.
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    /// Vector from the first center to the second.
    pub delta: Vec2,
    /// Combined radius of both cells.
    pub reach: f32,
    /// Actual distance
    pub distance: f32,
    /// Squared distance
    pub squared: f32,
}

impl Overlap {
    /// Check if the circles actually overlap.
    #[inline]
    pub fn is_colliding(&self) -> bool {
        self.squared < self.reach * self.reach
    }

    /// Penetration depth.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.reach - self.distance
    }

    /// Zero separation, or a vertical one: skipped rather than normalized.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.delta == Vec2::ZERO || self.delta.x == 0.0
    }
}

/// Check overlap between two circles.
#[inline]
pub fn check_overlap(pos: Vec2, radius: f32, other_pos: Vec2, other_radius: f32) -> Overlap {
    let delta = other_pos - pos;
    let squared = delta.length_squared();
    Overlap {
        delta,
        reach: radius + other_radius,
        distance: squared.sqrt(),
        squared,
    }
}

/// Push overlapping sibling cells apart.
///
/// Every unordered pair is checked once, reading positions updated by
/// earlier pairs. Each cell of a colliding pair moves away from the other by
/// the penetration depth times the *other* cell's share of the combined mass,
/// so the lighter cell moves further and the pair ends up just touching.
/// Returns the number of pairs resolved.
pub fn push_away(cells: &[CellId], population: &mut Population, bounds: &WorldBounds) -> usize {
    if cells.len() < 2 {
        return 0;
    }

    let mut resolved = 0;
    for (i, &first) in cells.iter().enumerate() {
        for &second in &cells[i + 1..] {
            let (Some(a), Some(b)) = (population.get(first), population.get(second)) else {
                continue;
            };
            let overlap = check_overlap(a.position(), a.radius(), b.position(), b.radius());
            if !overlap.is_colliding() {
                continue;
            }
            if overlap.is_degenerate() {
                trace!("Skipping degenerate pair {} / {}", first, second);
                continue;
            }

            let (first_mass, second_mass) = (a.mass() as f32, b.mass() as f32);
            let total = first_mass + second_mass;
            let push = overlap.delta / overlap.distance * overlap.depth();

            population.nudge(first, -push * (second_mass / total), bounds);
            population.nudge(second, push * (first_mass / total), bounds);
            resolved += 1;
        }
    }
    resolved
}
