//! Draw commands and render sinks.

use crate::{Color, Position};

/// A single primitive issued by the simulation's draw pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled polygon.
    FillPolygon { points: Vec<Position>, color: Color },
    /// Polygon outline with a stroke width.
    OutlinePolygon {
        points: Vec<Position>,
        color: Color,
        width: f32,
    },
    /// Text centered on a position.
    Text {
        text: String,
        center: Position,
        color: Color,
    },
}

/// Receiver for draw primitives.
///
/// Implementations sit on top of whatever presentation library the frontend
/// uses; the simulation only ever calls these three methods.
pub trait RenderSink {
    fn fill_polygon(&mut self, points: &[Position], color: Color);

    fn outline_polygon(&mut self, points: &[Position], color: Color, width: f32);

    fn draw_text(&mut self, text: &str, center: Position, color: Color);
}

/// Sink that keeps every command it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last `clear`.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping the allocation for the next frame.
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of filled polygons, i.e. cells drawn.
    pub fn polygon_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPolygon { .. }))
            .count()
    }

    pub fn text_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count()
    }
}

impl RenderSink for FrameRecorder {
    fn fill_polygon(&mut self, points: &[Position], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn outline_polygon(&mut self, points: &[Position], color: Color, width: f32) {
        self.commands.push(DrawCommand::OutlinePolygon {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn draw_text(&mut self, text: &str, center: Position, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_order() {
        let mut recorder = FrameRecorder::new();
        let square = [
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
        ];
        recorder.fill_polygon(&square, Color::WHITE);
        recorder.outline_polygon(&square, Color::BLACK, 4.0);
        recorder.draw_text("1024", Position::new(0.5, 0.5), Color::BLACK);

        assert_eq!(recorder.commands().len(), 3);
        assert_eq!(recorder.polygon_count(), 1);
        assert_eq!(recorder.text_count(), 1);
        assert!(matches!(
            recorder.commands()[1],
            DrawCommand::OutlinePolygon { width, .. } if width == 4.0
        ));

        recorder.clear();
        assert!(recorder.commands().is_empty());
    }
}
