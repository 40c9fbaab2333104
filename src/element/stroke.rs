use egui::{Color32, Pos2, Rect};

/// One straight piece of a freehand path.
///
/// A path is stored as the ordered run of its segments; each carries its
/// own colour and width so replay never depends on brush state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub p1: Pos2,
    pub p2: Pos2,
    pub color: Color32,
    pub width: f32,
}

impl Stroke {
    pub fn new(p1: Pos2, p2: Pos2, color: Color32, width: f32) -> Self {
        Self { p1, p2, color, width }
    }

    /// Bounding box including the round caps
    pub fn bounds(&self) -> Rect {
        Rect::from_two_pos(self.p1, self.p2).expand(self.width / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_bounds_cover_caps() {
        let stroke = Stroke::new(pos2(10.0, 20.0), pos2(0.0, 0.0), Color32::RED, 4.0);
        let bounds = stroke.bounds();

        assert_eq!(bounds.min, pos2(-2.0, -2.0));
        assert_eq!(bounds.max, pos2(12.0, 22.0));
    }
}
