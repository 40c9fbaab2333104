use egui::{Pos2, Vec2};

use crate::element::StickerId;

/// Transient state of a pointer-driven move, alive between pointer down
/// and pointer up/leave.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    None,
    /// `offset` is the grab point relative to the background's top-left
    DraggingBackground { offset: Vec2 },
    DraggingSticker { id: StickerId, last_pointer: Pos2 },
}
