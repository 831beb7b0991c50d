//! Pointer and input event collaborators.

use crate::Position;

/// Discrete input the simulation reacts to, polled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close / process exit requested.
    Quit,
    /// Hand control back to the menu layer.
    Escape,
    /// Split the player's cells.
    Split,
}

/// Read-only view of the pointer.
pub trait PointerSource {
    /// Current pointer position in world coordinates.
    fn pointer_position(&self) -> Position;
}

/// Pointer that never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPointer(pub Position);

impl PointerSource for FixedPointer {
    #[inline]
    fn pointer_position(&self) -> Position {
        self.0
    }
}
