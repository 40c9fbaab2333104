use egui::{Pos2, Rect};

/// Inclusive bounds test: points on any edge count as inside.
///
/// Used for both sticker and background hit testing.
pub fn rect_contains(rect: Rect, point: Pos2) -> bool {
    rect.min.x <= point.x
        && point.x <= rect.max.x
        && rect.min.y <= point.y
        && point.y <= rect.max.y
}
