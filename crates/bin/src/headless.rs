//! Stand-ins for the window, pointer and keyboard.

use glam::Vec2;
use sim::WorldBounds;
use surface::{InputEvent, PointerSource};
use tokio::sync::mpsc;
use tracing::error;

/// Radians per second.
const ORBIT_SPEED: f32 = 0.5;

/// Pointer circling the world center.
#[derive(Debug, Clone)]
pub struct OrbitPointer {
    center: Vec2,
    radius: f32,
    angle: f32,
}

impl OrbitPointer {
    pub fn new(bounds: WorldBounds) -> Self {
        Self {
            center: bounds.center(),
            radius: bounds.width.min(bounds.height) * 0.35,
            angle: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + ORBIT_SPEED * dt) % std::f32::consts::TAU;
    }
}

impl PointerSource for OrbitPointer {
    fn pointer_position(&self) -> Vec2 {
        self.center + Vec2::from_angle(self.angle) * self.radius
    }
}

/// Input events raised by process signals.
pub struct SignalInput {
    rx: mpsc::UnboundedReceiver<InputEvent>,
}

impl SignalInput {
    /// Start listening for Ctrl-C.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {}", e);
                    return;
                }
                if tx.send(InputEvent::Quit).is_err() {
                    return;
                }
            }
        });
        Self { rx }
    }

    /// Drain the events received since the last poll.
    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_stays_inside_world() {
        let bounds = WorldBounds::new(720.0, 720.0);
        let mut pointer = OrbitPointer::new(bounds);
        for _ in 0..1000 {
            pointer.advance(0.05);
            assert!(bounds.contains(pointer.pointer_position()));
        }
        assert!(pointer.angle < std::f32::consts::TAU);
    }
}
