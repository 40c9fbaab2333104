use egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::error::{Result, validate_dimensions};

/// Uniform scale and top-left offset that place an image inside a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainFit {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

impl ContainFit {
    pub fn origin(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    /// The fitted rectangle for an image of the given natural size
    pub fn rect(&self, image_size: Vec2) -> Rect {
        Rect::from_min_size(self.origin(), image_size * self.scale)
    }
}

/// Scales an image to fit entirely inside the viewport, preserving aspect
/// ratio, and centers it.
///
/// Fails with `InvalidDimension` if any size is zero, negative or not finite.
pub fn compute_contain_fit(
    viewport_w: f32,
    viewport_h: f32,
    image_w: f32,
    image_h: f32,
) -> Result<ContainFit> {
    validate_dimensions(viewport_w, viewport_h)?;
    validate_dimensions(image_w, image_h)?;

    let scale = (viewport_w / image_w).min(viewport_h / image_h);
    let scaled = vec2(image_w, image_h) * scale;

    Ok(ContainFit {
        scale,
        x: (viewport_w - scaled.x) / 2.0,
        y: (viewport_h - scaled.y) / 2.0,
    })
}
