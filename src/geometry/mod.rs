//! Pure geometry helpers: contain-fit placement, rectangle hit tests and
//! segment distances used by the rasterizer.

mod fit;
pub mod hit_testing;

pub use fit::{ContainFit, compute_contain_fit};
pub use hit_testing::rect_contains;

use egui::Pos2;

/// Distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}
