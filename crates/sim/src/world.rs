//! World bounds and spawn helpers.

use glam::Vec2;
use rand::Rng;
use surface::Color;

/// World rectangle `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point into the world.
    #[inline]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Random whole-unit position inside the world.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(0..=self.width as u32) as f32,
            rng.random_range(0..=self.height as u32) as f32,
        )
    }
}

/// Generate a random color.
#[inline]
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::new(rng.random(), rng.random(), rng.random())
}
