//! Cell: a single growable circular mass unit.

use super::EntityId;
use crate::world::WorldBounds;
use glam::Vec2;
use std::f32::consts::{PI, TAU};
use std::fmt;
use surface::{Color, RenderSink};

/// Distance between neighbouring outline points on the circumference.
const POINT_SPACING: f32 = 10.0;
/// Outline points every cell has regardless of size.
const BASE_POINTS: f32 = 8.0;
/// `speed = SPEED_FACTOR / sqrt(mass)`.
const SPEED_FACTOR: f32 = 1024.0;
const BORDER_DARKEN: f32 = 0.25;
/// Outline points close `min(OUTLINE_RATE * dt, 1)` of the gap per frame.
const OUTLINE_RATE: f32 = 2.0;

/// Stable cell identifier, unique for the lifetime of a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// Radius of a cell with the given mass: `sqrt(mass / pi)`.
#[inline]
pub fn radius_for(mass: u32) -> f32 {
    (mass as f32 / PI).sqrt()
}

/// Outline resolution for a radius: `round(2 pi r / 10 + 8)`.
#[inline]
pub fn point_count_for(radius: f32) -> usize {
    (TAU * radius / POINT_SPACING + BASE_POINTS).round() as usize
}

/// Movement speed in world units per second: `1024 / sqrt(mass)`.
#[inline]
pub fn speed_for(mass: u32) -> f32 {
    SPEED_FACTOR / (mass as f32).sqrt()
}

/// Result of applying a mass delta to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassChange {
    Resized { from: u32, to: u32 },
    /// The delta would leave the cell with no mass; the cell is left untouched
    /// and must be destroyed by its population.
    Depleted,
}

/// A circular mass unit with a polygon outline that chases its radius.
#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    owner: EntityId,
    position: Vec2,
    mass: u32,
    radius: f32,
    sqr_radius: f32,
    point_count: usize,
    points: Vec<Vec2>,
    speed: f32,
    color: Color,
    border_color: Color,
}

impl Cell {
    /// Create a cell with every outline point collapsed onto its center.
    pub(crate) fn new(id: CellId, owner: EntityId, position: Vec2, color: Color, mass: u32) -> Self {
        let mass = mass.max(1);
        let radius = radius_for(mass);
        let point_count = point_count_for(radius);
        Self {
            id,
            owner,
            position,
            mass,
            radius,
            sqr_radius: radius * radius,
            point_count,
            points: vec![position; point_count],
            speed: speed_for(mass),
            color,
            border_color: color.darken(BORDER_DARKEN),
        }
    }

    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn mass(&self) -> u32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn sqr_radius(&self) -> f32 {
        self.sqr_radius
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Outline points. May hold more than `point_count` entries after the
    /// cell has shrunk.
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn border_color(&self) -> Color {
        self.border_color
    }

    /// Circle-circle overlap.
    #[inline]
    pub fn intersects(&self, other: &Cell) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }

    /// Apply a mass delta and recompute derived geometry.
    ///
    /// Only the owning population calls this, since it must reposition the
    /// cell in mass order afterwards.
    pub(crate) fn grow_or_shrink(&mut self, delta: i64) -> MassChange {
        let from = self.mass;
        let to = from as i64 + delta;
        if to < 1 {
            return MassChange::Depleted;
        }
        self.mass = u32::try_from(to).unwrap_or(u32::MAX);
        self.update_values();
        MassChange::Resized { from, to: self.mass }
    }

    fn update_values(&mut self) {
        self.radius = radius_for(self.mass);
        self.sqr_radius = self.radius * self.radius;
        self.point_count = point_count_for(self.radius);
        // New points start on top of the last one so the outline never jumps.
        if let Some(&last) = self.points.last() {
            while self.points.len() < self.point_count {
                self.points.push(last);
            }
        }
        self.speed = speed_for(self.mass);
    }

    /// Step towards `destination` by at most `speed * dt`.
    pub fn move_toward(&mut self, destination: Vec2, dt: f32) {
        if self.position == destination {
            return;
        }
        let step = (destination - self.position).clamp_length_max(self.speed * dt);
        self.translate(step);
    }

    /// Rigidly shift the center and every outline point.
    #[inline]
    pub(crate) fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        for point in &mut self.points {
            *point += offset;
        }
    }

    #[inline]
    pub(crate) fn clamp_to(&mut self, bounds: &WorldBounds) {
        self.position = bounds.clamp(self.position);
    }

    /// Ease every outline point towards its slot on the current circle.
    pub fn relax_outline(&mut self, dt: f32, bounds: &WorldBounds) {
        let t = (dt * OUTLINE_RATE).min(1.0);
        let slots = self.point_count as f32;
        let half_radius = self.radius / 2.0;

        for (n, point) in self.points.iter_mut().enumerate() {
            let angle = n as f32 / slots * TAU;
            let mut target = bounds.clamp(Vec2::from_angle(angle) * self.radius + self.position);

            // A wall flattened this slot into the inner half of the circle.
            let offset = target - self.position;
            let sqr = offset.length_squared();
            if sqr > 0.0 && sqr <= self.sqr_radius / 4.0 {
                target = offset / sqr.sqrt() * half_radius + self.position;
            }

            *point = point.lerp(target, t);
        }
    }

    /// Per-frame step: move, clamp, reshape.
    pub fn update(&mut self, destination: Vec2, dt: f32, bounds: &WorldBounds) {
        self.move_toward(destination, dt);
        self.clamp_to(bounds);
        self.relax_outline(dt, bounds);
    }

    pub fn draw(&self, sink: &mut dyn RenderSink, outline_width: f32, label_min_mass: u32) {
        sink.fill_polygon(&self.points, self.color);
        sink.outline_polygon(&self.points, self.border_color, outline_width);
        if self.mass >= label_min_mass {
            sink.draw_text(&self.mass.to_string(), self.position, self.color.inverted());
        }
    }
}
