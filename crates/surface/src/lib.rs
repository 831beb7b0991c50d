//! Presentation boundary for the cell growth simulation.
//!
//! This crate contains:
//! - Shared types (Color, Position)
//! - The render sink the simulation draws into
//! - The pointer source and input events the simulation consumes

mod draw;
mod input;

pub use draw::{DrawCommand, FrameRecorder, RenderSink};
pub use input::{FixedPointer, InputEvent, PointerSource};

use serde::{Deserialize, Serialize};

/// RGB color used for cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Blend towards black by `amount`.
    #[inline]
    pub fn darken(self, amount: f32) -> Color {
        self.lerp(Color::BLACK, amount)
    }

    /// Channel-wise complement, used for text drawn on top of a cell.
    #[inline]
    pub fn inverted(self) -> Color {
        Color::new(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

/// Represents a 2D position using glam's Vec2.
pub type Position = glam::Vec2;
