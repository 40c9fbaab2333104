//! Pointer input: the events the shell feeds in and the controller that
//! turns them into document changes.

mod controller;

pub use controller::{Brush, InteractionController, InteractionState};

use egui::Pos2;

/// A pointer event with its position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { position: Pos2 },
    /// Pointer moved, with or without the button held
    PointerMove { position: Pos2 },
    /// Primary button was released
    PointerUp { position: Pos2 },
    /// Pointer left the surface
    PointerLeave,
}
